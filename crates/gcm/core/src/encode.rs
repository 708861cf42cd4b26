//! Splitting a message into provider-sized batches.

use crate::{Message, Options, Payload};

/// Maximum number of registration IDs the gateway accepts per request.
pub const MAX_REGISTRATION_IDS: usize = 1000;

/// One request-sized batch of a [`Message`].
///
/// Borrows its recipients and content from the message it was encoded from.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct WireMessage<'a> {
    pub registration_ids: &'a [String],

    #[serde(flatten)]
    pub payload: &'a Payload,

    #[serde(flatten)]
    pub options: &'a Options,
}

impl WireMessage<'_> {
    /// Number of recipients in this batch.
    pub fn len(&self) -> usize {
        self.registration_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registration_ids.is_empty()
    }
}

impl Message {
    /// Split into batches of at most [`MAX_REGISTRATION_IDS`] recipients.
    pub fn encode(&self) -> Vec<WireMessage<'_>> {
        self.encode_with_limit(MAX_REGISTRATION_IDS)
    }

    /// Split into batches of at most `limit` recipients.
    ///
    /// Batches keep the original recipient order and together cover every
    /// recipient exactly once. No recipients means no batches. A `limit` of
    /// zero is treated as one.
    pub fn encode_with_limit(&self, limit: usize) -> Vec<WireMessage<'_>> {
        self.registration_ids
            .chunks(limit.max(1))
            .map(|registration_ids| WireMessage {
                registration_ids,
                payload: &self.payload,
                options: &self.options,
            })
            .collect()
    }
}
