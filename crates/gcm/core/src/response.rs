//! Gateway response types.

use crate::ErrorKind;

/// Multicast ID of a response that was not returned by the gateway.
pub const SYNTHETIC_MULTICAST_ID: i64 = -1;

/// Outcome of delivering to a single recipient.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeliveryResult {
    /// ID assigned to the delivered message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// Replacement registration ID the sender should switch to.
    #[serde(default, rename = "registration_id", skip_serializing_if = "Option::is_none")]
    pub canonical_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,

    /// The registration ID this result belongs to.
    ///
    /// The gateway correlates results by position only, so the client fills
    /// this in from the request.
    #[serde(default, rename = "recipient")]
    pub registration_id: String,
}

impl DeliveryResult {
    /// Create a failed result for a recipient.
    pub fn failure(registration_id: impl Into<String>, error: ErrorKind) -> Self {
        Self {
            error: Some(error),
            registration_id: registration_id.into(),
            ..Default::default()
        }
    }

    /// Check if the message was delivered.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.message_id.is_some()
    }
}

/// Outcome of delivering one wire message.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Response {
    pub multicast_id: i64,
    pub success: usize,
    pub failure: usize,
    pub canonical_ids: usize,
    /// One entry per recipient, in request order.
    #[serde(default)]
    pub results: Vec<DeliveryResult>,
}

impl Response {
    /// Build a response failing every recipient with the same error.
    pub fn failure<S: AsRef<str>>(registration_ids: &[S], error: ErrorKind) -> Self {
        Self {
            multicast_id: SYNTHETIC_MULTICAST_ID,
            success: 0,
            failure: registration_ids.len(),
            canonical_ids: 0,
            results: registration_ids
                .iter()
                .map(|id| DeliveryResult::failure(id.as_ref(), error.clone()))
                .collect(),
        }
    }

    /// Whether this response was built locally instead of returned by the gateway.
    pub fn is_synthetic(&self) -> bool {
        self.multicast_id == SYNTHETIC_MULTICAST_ID
    }

    /// The error shared by every recipient of a synthetic response.
    pub fn synthetic_error(&self) -> Option<&ErrorKind> {
        if !self.is_synthetic() {
            return None;
        }
        self.results.first().and_then(|r| r.error.as_ref())
    }

    /// Results that carry an error.
    pub fn failures(&self) -> impl Iterator<Item = &DeliveryResult> {
        self.results.iter().filter(|r| r.error.is_some())
    }

    /// Pairs of (submitted ID, canonical ID) for recipients whose
    /// registration ID has changed.
    pub fn canonical_updates(&self) -> impl Iterator<Item = (&str, &str)> {
        self.results.iter().filter_map(|r| {
            r.canonical_id
                .as_deref()
                .map(|canonical| (r.registration_id.as_str(), canonical))
        })
    }
}
