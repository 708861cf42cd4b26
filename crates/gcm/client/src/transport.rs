//! HTTP transport seam.

use reqwest::Url;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

/// Failure to obtain a response from the gateway.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

/// A fully received gateway reply.
#[derive(Debug)]
pub struct Reply {
    /// HTTP status code.
    pub status: u16,
    /// Response body, or the error hit while reading it.
    pub body: Result<Vec<u8>, TransportError>,
}

/// Sends a JSON POST to the gateway.
///
/// Implementations must read the body to completion before returning so the
/// underlying connection can be reused.
#[trait_variant::make(Send)]
pub trait Transport: Send + Sync {
    /// POST `body` to `url` with the given `Authorization` header value.
    async fn post_json(
        &self,
        url: &Url,
        authorization: &str,
        body: Vec<u8>,
    ) -> Result<Reply, TransportError>;
}

impl Transport for reqwest::Client {
    async fn post_json(
        &self,
        url: &Url,
        authorization: &str,
        body: Vec<u8>,
    ) -> Result<Reply, TransportError> {
        let response = self
            .post(url.clone())
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(TransportError::from);

        Ok(Reply { status, body })
    }
}
