//! GCM Delivery Client
//!
//! Sends batched downstream messages to the GCM HTTP gateway and maps every
//! outcome to per-recipient results.

mod client;
mod config;
mod retry;
mod transport;

pub use client::*;
pub use config::*;
pub use retry::*;
pub use transport::*;

// Re-export for convenience
pub use gcm_core;
