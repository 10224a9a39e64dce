//! HTTP transport client for the Yo! API.
//!
//! One POST per operation, bounded by a hard timeout, no retries. Failure
//! classification happens here for everything visible at the HTTP layer;
//! provider-level business rejections are classified by the adapter after
//! the envelope is decoded, where the parsed status code is available.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::GatewayName;
use crate::ports::{GatewayError, TransportErrorCode};

/// Upper bound for a single provider call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The single outbound call the Yo adapter needs.
///
/// A trait seam so tests can substitute a scripted transport and assert
/// on call counts.
#[async_trait]
pub trait YoTransport: Send + Sync {
    /// POST an AutoCreate request body, returning the raw response body.
    async fn exchange(&self, body: String) -> Result<String, GatewayError>;
}

/// Production transport speaking HTTPS to the configured endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl YoTransport for HttpTransport {
    async fn exchange(&self, body: String) -> Result<String, GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .timeout(REQUEST_TIMEOUT)
            .body(body)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            GatewayError::transport(
                GatewayName::Yo,
                TransportErrorCode::Connection,
                format!("failed to read response body: {e}"),
                None,
            )
        })?;

        if !status.is_success() {
            tracing::warn!(
                provider = %GatewayName::Yo,
                status = status.as_u16(),
                "provider returned non-success HTTP status"
            );
            return Err(GatewayError::transport(
                GatewayName::Yo,
                TransportErrorCode::HttpStatus,
                format!("HTTP {status}"),
                Some(text),
            ));
        }

        Ok(text)
    }
}

fn classify_send_error(e: reqwest::Error) -> GatewayError {
    let code = if e.is_timeout() {
        TransportErrorCode::Timeout
    } else {
        TransportErrorCode::Connection
    };
    GatewayError::transport(GatewayName::Yo, code, e.to_string(), None)
}
