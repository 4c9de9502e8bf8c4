//! Generic HTTP transport
//!
//! One fixed JSON endpoint, POST-only. The trait exists so state machines and
//! tests can inject scripted replies; the reqwest implementation is what a
//! real console session uses.

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::{RpcError, RpcResult};

const LOG_BODY_LIMIT: usize = 2048;

/// Raw reply from the transport: HTTP status plus unparsed body text.
#[derive(Debug, Clone)]
pub struct Reply {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

/// Transport abstraction for the JSON endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST one serialized request body and return the raw reply.
    ///
    /// # Returns
    /// * `Ok(Reply)` - any reply with an HTTP status line, success or not
    /// * `Err(RpcError::Network)` - the round trip itself failed
    async fn send(&self, body: &Value) -> RpcResult<Reply>;
}

/// reqwest-backed transport POSTing to a fixed endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a transport for the given JSON endpoint.
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Create a transport reusing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    /// The configured endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, body: &Value) -> RpcResult<Reply> {
        log::debug!("POST {}", self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RpcError::Network {
                        detail: format!("request timeout: {e}"),
                    }
                } else {
                    RpcError::Network {
                        detail: e.to_string(),
                    }
                }
            })?;

        let status = response.status().as_u16();
        log::debug!("Response Status: {status}");

        let body = response.text().await.map_err(|e| RpcError::Network {
            detail: format!("Failed to read response body: {e}"),
        })?;

        log::debug!("Response Body: {}", truncate_for_log(&body));

        Ok(Reply { status, body })
    }
}

/// Truncate a response body for debug logging.
pub(crate) fn truncate_for_log(text: &str) -> String {
    if text.len() <= LOG_BODY_LIMIT {
        text.to_string()
    } else {
        let cut = text
            .char_indices()
            .take_while(|(i, _)| *i <= LOG_BODY_LIMIT)
            .last()
            .map_or(0, |(i, _)| i);
        format!("{}... ({} bytes total)", &text[..cut], text.len())
    }
}
