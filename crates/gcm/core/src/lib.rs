//! GCM Core Types
//!
//! Message model, batching and response types for the GCM downstream HTTP
//! protocol.
//! See <https://developers.google.com/cloud-messaging/http-server-ref>.

mod encode;
mod error;
mod message;
mod response;

pub use encode::*;
pub use error::*;
pub use message::*;
pub use response::*;
