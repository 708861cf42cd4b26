//! Per-recipient error classification.

/// Why delivery to a recipient failed.
///
/// Kinds reported by the gateway keep their wire spelling; strings this crate
/// does not know are kept verbatim in [`ErrorKind::Other`]. The first four
/// kinds are produced locally when no usable gateway answer exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorKind {
    /// No response was obtained from the transport.
    Timeout,
    /// The gateway answered 401.
    AuthenticationError,
    /// The gateway answered 200 with a body that does not match the schema.
    InvalidJson,
    /// The request body could not be serialized.
    EncodingError,
    /// Any other non-200 answer, or a per-recipient internal error.
    InternalServerError,
    MissingRegistration,
    InvalidRegistration,
    NotRegistered,
    InvalidPackageName,
    MismatchSenderId,
    MessageTooBig,
    InvalidDataKey,
    InvalidTtl,
    Unavailable,
    DeviceMessageRateExceeded,
    TopicsMessageRateExceeded,
    InvalidApnsCredential,
    /// An error string not listed above.
    Other(String),
}

impl ErrorKind {
    /// Wire spelling of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Timeout => "Timeout",
            Self::AuthenticationError => "AuthenticationError",
            Self::InvalidJson => "InvalidJSON",
            Self::EncodingError => "EncodingError",
            Self::InternalServerError => "InternalServerError",
            Self::MissingRegistration => "MissingRegistration",
            Self::InvalidRegistration => "InvalidRegistration",
            Self::NotRegistered => "NotRegistered",
            Self::InvalidPackageName => "InvalidPackageName",
            Self::MismatchSenderId => "MismatchSenderId",
            Self::MessageTooBig => "MessageTooBig",
            Self::InvalidDataKey => "InvalidDataKey",
            Self::InvalidTtl => "InvalidTtl",
            Self::Unavailable => "Unavailable",
            Self::DeviceMessageRateExceeded => "DeviceMessageRateExceeded",
            Self::TopicsMessageRateExceeded => "TopicsMessageRateExceeded",
            Self::InvalidApnsCredential => "InvalidApnsCredential",
            Self::Other(s) => s,
        }
    }

    /// Whether sending the same message again later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::Unavailable | Self::InternalServerError
        )
    }

    /// Whether the registration ID is dead and should be removed.
    pub fn is_unregistered(&self) -> bool {
        matches!(
            self,
            Self::NotRegistered | Self::InvalidRegistration | Self::MissingRegistration
        )
    }
}

impl From<String> for ErrorKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Timeout" => Self::Timeout,
            "AuthenticationError" => Self::AuthenticationError,
            "InvalidJSON" => Self::InvalidJson,
            "EncodingError" => Self::EncodingError,
            "InternalServerError" => Self::InternalServerError,
            "MissingRegistration" => Self::MissingRegistration,
            "InvalidRegistration" => Self::InvalidRegistration,
            "NotRegistered" => Self::NotRegistered,
            "InvalidPackageName" => Self::InvalidPackageName,
            "MismatchSenderId" => Self::MismatchSenderId,
            "MessageTooBig" => Self::MessageTooBig,
            "InvalidDataKey" => Self::InvalidDataKey,
            "InvalidTtl" => Self::InvalidTtl,
            "Unavailable" => Self::Unavailable,
            "DeviceMessageRateExceeded" => Self::DeviceMessageRateExceeded,
            "TopicsMessageRateExceeded" => Self::TopicsMessageRateExceeded,
            "InvalidApnsCredential" => Self::InvalidApnsCredential,
            _ => Self::Other(s),
        }
    }
}

impl From<ErrorKind> for String {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_parsing() {
        let kind: ErrorKind = serde_json::from_str(r#""NotRegistered""#).unwrap();
        assert_eq!(kind, ErrorKind::NotRegistered);
        assert!(kind.is_unregistered());
        assert!(!kind.is_retryable());
    }

    #[test]
    fn test_unknown_error_kept_verbatim() {
        let kind: ErrorKind = serde_json::from_str(r#""QuotaExceeded""#).unwrap();
        assert_eq!(kind, ErrorKind::Other("QuotaExceeded".into()));
        assert_eq!(kind.to_string(), "QuotaExceeded");
        assert_eq!(serde_json::to_string(&kind).unwrap(), r#""QuotaExceeded""#);
    }

    #[test]
    fn test_invalid_json_spelling() {
        assert_eq!(ErrorKind::InvalidJson.as_str(), "InvalidJSON");
        assert_eq!(ErrorKind::from("InvalidJSON".to_string()), ErrorKind::InvalidJson);
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(ErrorKind::Timeout.is_retryable());
        assert!(ErrorKind::Unavailable.is_retryable());
        assert!(ErrorKind::InternalServerError.is_retryable());
        assert!(!ErrorKind::AuthenticationError.is_retryable());
        assert!(!ErrorKind::InvalidJson.is_retryable());
    }
}
