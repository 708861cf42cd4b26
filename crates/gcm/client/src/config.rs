//! Gateway configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::eyre::{WrapErr as _, eyre};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::RetryPolicy;

/// Production GCM endpoint.
pub const GATEWAY: &str = "https://android.googleapis.com/gcm/send";

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "GCM_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read gateway config: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse gateway config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("no config file at {0}")]
    NotFound(PathBuf),
}

/// On-disk gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_gateway")]
    pub gateway: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_registration_ids")]
    pub max_registration_ids: usize,
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_gateway() -> String {
    GATEWAY.to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_registration_ids() -> usize {
    gcm_core::MAX_REGISTRATION_IDS
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    1_024_000
}

fn default_max_attempts() -> u32 {
    1
}

impl GatewayConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Read(e),
        })?;
        Self::parse(&content)
    }

    /// Parse from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the API key, preferring [`API_KEY_ENV`].
    pub fn api_key(&self) -> Option<String> {
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }

    /// A non-blank `env_key` wins over the file key.
    fn resolve_api_key(&self, env_key: Option<String>) -> Option<String> {
        env_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }

    pub fn retry_policy(&self) -> Option<RetryPolicy> {
        self.retry.as_ref().map(|retry| RetryPolicy {
            initial_delay: Duration::from_millis(retry.initial_delay_ms),
            max_delay: Duration::from_millis(retry.max_delay_ms),
            max_attempts: retry.max_attempts.max(1),
        })
    }

    /// Build the client construction settings.
    pub fn client_config(&self) -> color_eyre::eyre::Result<ClientConfig> {
        self.client_config_with_key(self.api_key())
    }

    fn client_config_with_key(
        &self,
        api_key: Option<String>,
    ) -> color_eyre::eyre::Result<ClientConfig> {
        let api_key =
            api_key.ok_or_else(|| eyre!("no API key configured (set api_key or {API_KEY_ENV})"))?;

        let mut config = ClientConfig::new(api_key, &self.gateway)?;
        config.max_registration_ids = self.max_registration_ids;
        Ok(config)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            gateway: default_gateway(),
            timeout_ms: default_timeout_ms(),
            max_registration_ids: default_max_registration_ids(),
            retry: None,
        }
    }
}

/// Settings a client is constructed with.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub gateway: Url,
    /// Batch limit used when encoding messages.
    pub max_registration_ids: usize,
}

impl ClientConfig {
    /// Create settings for a gateway URL.
    pub fn new(api_key: impl Into<String>, gateway: &str) -> color_eyre::eyre::Result<Self> {
        let gateway =
            Url::parse(gateway).wrap_err_with(|| format!("invalid gateway URL: {gateway}"))?;

        Ok(Self {
            api_key: api_key.into(),
            gateway,
            max_registration_ids: gcm_core::MAX_REGISTRATION_IDS,
        })
    }

    /// Create settings for the production gateway.
    pub fn production(api_key: impl Into<String>) -> color_eyre::eyre::Result<Self> {
        Self::new(api_key, GATEWAY)
    }

    /// Value of the `Authorization` header.
    pub(crate) fn authorization(&self) -> String {
        format!("key={}", self.api_key)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("gateway", &self.gateway.as_str())
            .field("max_registration_ids", &self.max_registration_ids)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::parse("api_key = \"k\"").unwrap();
        assert_eq!(config.gateway, GATEWAY);
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.max_registration_ids, 1000);
        assert!(config.retry_policy().is_none());
    }

    #[test]
    fn test_retry_table() {
        let config = GatewayConfig::parse(
            r#"
            gateway = "http://localhost:9000/send"

            [retry]
            max_attempts = 4
            "#,
        )
        .unwrap();

        let policy = config.retry_policy().unwrap();
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.initial_delay, Duration::from_millis(1000));
        assert_eq!(policy.max_delay, Duration::from_millis(1_024_000));
    }

    #[test]
    fn test_invalid_gateway_rejected() {
        assert!(ClientConfig::new("k", "not a url").is_err());
    }

    #[test]
    fn test_authorization_header() {
        let config = ClientConfig::production("secret").unwrap();
        assert_eq!(config.authorization(), "key=secret");
        assert!(!format!("{config:?}").contains("secret"));
    }

    #[test]
    fn test_env_key_overrides_file() {
        let config = GatewayConfig::parse("api_key = \"file-key\"").unwrap();
        assert_eq!(
            config.resolve_api_key(Some("env-key".into())).as_deref(),
            Some("env-key")
        );
        assert_eq!(config.resolve_api_key(None).as_deref(), Some("file-key"));
    }

    #[test]
    fn test_blank_env_key_falls_back_to_file() {
        let config = GatewayConfig::parse("api_key = \"file-key\"").unwrap();
        assert_eq!(
            config.resolve_api_key(Some("  ".into())).as_deref(),
            Some("file-key")
        );
    }

    #[test]
    fn test_missing_api_key() {
        let config = GatewayConfig::default();
        let key = config.resolve_api_key(Some(String::new()));
        assert!(key.is_none());

        let err = config.client_config_with_key(key).unwrap_err();
        assert!(err.to_string().contains("no API key configured"));

        let client = config.client_config_with_key(Some("k".into())).unwrap();
        assert_eq!(client.authorization(), "key=k");
        assert_eq!(client.max_registration_ids, 1000);
    }

    #[test]
    fn test_missing_file() {
        let err = GatewayConfig::load(Path::new("/nonexistent/gcm.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
