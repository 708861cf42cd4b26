//! gcm-send - deliver a downstream message file through the GCM gateway.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr as _;
use gcm_client::{GatewayConfig, GcmClient};
use gcm_core::Message;

#[derive(Parser)]
#[command(name = "gcm-send")]
#[command(about = "Send a push message through the GCM HTTP gateway", long_about = None)]
struct Cli {
    /// Gateway config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the gateway URL
    #[arg(long)]
    gateway: Option<String>,

    /// Ask the gateway to validate without delivering
    #[arg(long)]
    dry_run: bool,

    /// Message file in downstream JSON format
    message: PathBuf,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded settings.
    fn apply_overrides(&self, config: &mut GatewayConfig, message: &mut Message) {
        if let Some(gateway) = &self.gateway {
            config.gateway = gateway.clone();
        }
        if self.dry_run {
            message.options.dry_run = Some(true);
        }
    }
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GatewayConfig::load(path)
            .wrap_err_with(|| format!("failed to load config from {}", path.display()))?,
        None => GatewayConfig::default(),
    };

    let content = std::fs::read_to_string(&cli.message)
        .wrap_err_with(|| format!("failed to read {}", cli.message.display()))?;
    let mut message: Message =
        serde_json::from_str(&content).wrap_err("failed to parse message")?;
    cli.apply_overrides(&mut config, &mut message);

    let client = GcmClient::from_config(&config)?;

    tracing::info!(
        gateway = %client.config().gateway,
        recipients = message.registration_ids.len(),
        "sending message"
    );

    let responses = client.send_message(&message).await;

    println!(
        "{}",
        serde_json::to_string_pretty(&responses).wrap_err("failed to format responses")?
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_applied() {
        let cli = Cli::parse_from([
            "gcm-send",
            "--gateway",
            "http://localhost:9000/send",
            "--dry-run",
            "message.json",
        ]);
        let mut config = GatewayConfig::default();
        let mut message = Message::new(["a"]);

        cli.apply_overrides(&mut config, &mut message);

        assert_eq!(config.gateway, "http://localhost:9000/send");
        assert_eq!(message.options.dry_run, Some(true));
    }

    #[test]
    fn test_no_overrides_keeps_settings() {
        let cli = Cli::parse_from(["gcm-send", "message.json"]);
        let mut config = GatewayConfig::default();
        let mut message = Message::new(["a"]);

        cli.apply_overrides(&mut config, &mut message);

        assert_eq!(config.gateway, gcm_client::GATEWAY);
        assert_eq!(message.options.dry_run, None);
        assert_eq!(cli.message, PathBuf::from("message.json"));
    }
}
