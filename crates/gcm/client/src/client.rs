//! GCM delivery client.

use color_eyre::eyre::WrapErr as _;
use gcm_core::{DeliveryResult, ErrorKind, Message, Response, WireMessage};

use crate::{ClientConfig, GatewayConfig, Reply, RetryPolicy, Transport, TransportError};

/// HTTP status the gateway uses for a processed request.
const STATUS_OK: u16 = 200;

/// HTTP status for a rejected API key.
const STATUS_UNAUTHORIZED: u16 = 401;

/// 200 body as sent by the gateway.
#[derive(serde::Deserialize)]
struct GatewayBody {
    multicast_id: i64,
    success: usize,
    failure: usize,
    canonical_ids: usize,
    #[serde(default)]
    results: Vec<GatewayResult>,
}

/// One entry of [`GatewayBody::results`]; carries no recipient.
#[derive(serde::Deserialize)]
struct GatewayResult {
    #[serde(default)]
    message_id: Option<String>,
    #[serde(default)]
    registration_id: Option<String>,
    #[serde(default)]
    error: Option<ErrorKind>,
}

/// Client for the GCM downstream HTTP gateway.
///
/// Holds no mutable state, so one client can serve concurrent callers as long
/// as its transport can.
pub struct GcmClient<T = reqwest::Client> {
    config: ClientConfig,
    transport: T,
    retry: Option<RetryPolicy>,
}

impl GcmClient {
    /// Create a client for the production gateway.
    pub fn new(api_key: impl Into<String>) -> color_eyre::eyre::Result<Self> {
        let transport = reqwest::Client::builder()
            .build()
            .wrap_err("failed to create HTTP client")?;

        Ok(Self::with_transport(
            ClientConfig::production(api_key)?,
            transport,
        ))
    }

    /// Create a client from loaded settings.
    pub fn from_config(config: &GatewayConfig) -> color_eyre::eyre::Result<Self> {
        let transport = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .wrap_err("failed to create HTTP client")?;

        let mut client = Self::with_transport(config.client_config()?, transport);
        client.retry = config.retry_policy();
        Ok(client)
    }
}

impl<T> GcmClient<T> {
    /// Create a client with a custom transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            retry: None,
        }
    }

    /// Re-send whole-batch failures according to `policy`.
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl<T: Transport> GcmClient<T> {
    /// Deliver a message, one response per batch in batch order.
    ///
    /// A message without recipients yields no responses and makes no request.
    /// Failed batches never stop later batches from being sent.
    pub async fn send_message(&self, message: &Message) -> Vec<Response> {
        let batches = message.encode_with_limit(self.config.max_registration_ids);
        let mut responses = Vec::with_capacity(batches.len());

        for batch in &batches {
            responses.push(self.send_with_retry(batch).await);
        }

        tracing::info!(
            recipients = message.registration_ids.len(),
            batches = batches.len(),
            success = responses.iter().map(|r| r.success).sum::<usize>(),
            failure = responses.iter().map(|r| r.failure).sum::<usize>(),
            "message sent"
        );

        responses
    }

    /// Send one batch exactly once.
    pub async fn send(&self, message: &WireMessage<'_>) -> Response {
        let body = match serde_json::to_vec(message) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode message");
                return Response::failure(message.registration_ids, ErrorKind::EncodingError);
            }
        };

        tracing::debug!(
            gateway = %self.config.gateway,
            recipients = message.len(),
            "sending batch"
        );

        let reply = self
            .transport
            .post_json(&self.config.gateway, &self.config.authorization(), body)
            .await;

        interpret(message, reply)
    }

    async fn send_with_retry(&self, message: &WireMessage<'_>) -> Response {
        let mut response = self.send(message).await;

        let Some(policy) = self.retry else {
            return response;
        };

        let mut attempt = 1;
        while policy.should_retry(&response, attempt) {
            let delay = policy.delay(attempt - 1);
            tracing::info!(
                attempt,
                ?delay,
                error = ?response.synthetic_error(),
                "retrying batch"
            );
            tokio::time::sleep(delay).await;

            response = self.send(message).await;
            attempt += 1;
        }

        response
    }
}

/// Map a transport outcome to per-recipient results.
fn interpret(message: &WireMessage<'_>, reply: Result<Reply, TransportError>) -> Response {
    let ids = message.registration_ids;

    let reply = match reply {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, "no response from gateway");
            return Response::failure(ids, ErrorKind::Timeout);
        }
    };

    if reply.status != STATUS_OK {
        let kind = if reply.status == STATUS_UNAUTHORIZED {
            ErrorKind::AuthenticationError
        } else {
            ErrorKind::InternalServerError
        };
        tracing::warn!(status = reply.status, error = %kind, "gateway rejected request");
        return Response::failure(ids, kind);
    }

    let body = match reply.body {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read gateway response");
            return Response::failure(ids, ErrorKind::InvalidJson);
        }
    };

    let gateway: GatewayBody = match serde_json::from_slice(&body) {
        Ok(gateway) => gateway,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse gateway response");
            return Response::failure(ids, ErrorKind::InvalidJson);
        }
    };

    if gateway.results.len() != ids.len() {
        tracing::warn!(
            expected = ids.len(),
            actual = gateway.results.len(),
            "gateway returned wrong number of results"
        );
        return Response::failure(ids, ErrorKind::InvalidJson);
    }

    // Results are positional; the body does not say which ID each belongs to.
    let results = gateway
        .results
        .into_iter()
        .zip(ids)
        .map(|(result, id)| DeliveryResult {
            message_id: result.message_id,
            canonical_id: result.registration_id,
            error: result.error,
            registration_id: id.clone(),
        })
        .collect();

    Response {
        multicast_id: gateway.multicast_id,
        success: gateway.success,
        failure: gateway.failure,
        canonical_ids: gateway.canonical_ids,
        results,
    }
}
