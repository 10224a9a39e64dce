//! Payment gateway port: the unified provider contract.
//!
//! Both provider adapters implement this trait. Callers obtain an
//! implementation from the registry and never touch provider wire formats
//! directly.
//!
//! # Design
//!
//! - **Stateless**: adapters hold credentials and clients, never
//!   transaction state; the caller tracks lifecycles by the references
//!   this contract returns.
//! - **Capability gating**: `withdraw` and `balance` are optional
//!   capabilities; a provider that cannot offer them fails fast with
//!   [`GatewayError::UnsupportedOperation`] instead of attempting I/O.
//! - **Webhooks**: verification returns a boolean and parsing never
//!   fails; callers must verify before trusting parsed content.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    BalanceResult, DepositRequest, GatewayName, TransactionResult, WebhookPayload, WithdrawRequest,
};

/// Unified contract over heterogeneous mobile-money providers.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Initiate a collection from the payer's mobile-money account.
    ///
    /// The returned result reflects the provider's synchronous
    /// acknowledgment; final settlement may arrive later via webhook.
    async fn deposit(&self, request: DepositRequest) -> Result<TransactionResult, GatewayError>;

    /// Initiate a disbursement to a recipient's mobile-money account.
    ///
    /// Providers that structurally cannot disburse return
    /// [`GatewayError::UnsupportedOperation`] without network I/O.
    async fn withdraw(&self, request: WithdrawRequest) -> Result<TransactionResult, GatewayError>;

    /// Re-query a previously issued transaction by the provider's own
    /// reference.
    ///
    /// A provider-side "not found" is a successful `Indeterminate` result
    /// with an empty gateway reference, not an error - the transaction may
    /// still be propagating.
    async fn check_status(&self, reference: &str) -> Result<TransactionResult, GatewayError>;

    /// Current wallet float(s). Multi-currency wallets return one entry
    /// per currency; unsupported providers fail fast.
    async fn balance(&self) -> Result<Vec<BalanceResult>, GatewayError>;

    /// Authenticate an inbound webhook payload. Pure and side-effect-free.
    ///
    /// `signature` carries a detached signature where the provider sends
    /// one out-of-band; providers embedding the signature in the payload
    /// ignore it.
    fn verify_webhook(&self, payload: &serde_json::Value, signature: Option<&str>) -> bool;

    /// Normalize an inbound webhook payload. Pure, infallible, and
    /// independent of verification - callers choose the ordering, but
    /// correct usage always verifies before trusting parsed content.
    fn parse_webhook(&self, payload: &serde_json::Value) -> WebhookPayload;

    /// Which provider this adapter speaks to.
    fn name(&self) -> GatewayName;
}

impl std::fmt::Debug for dyn PaymentGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentGateway")
            .field("name", &self.name())
            .finish()
    }
}

/// Machine-readable classification of a transport failure.
///
/// Callers branch on this code to decide retry policy without string
/// matching; the gateway layer itself never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorCode {
    /// Provider answered with a non-2xx HTTP status.
    HttpStatus,

    /// The call exceeded the transport's hard timeout.
    Timeout,

    /// Provider accepted the call but reported a business-level rejection.
    ProviderRejected,

    /// Connection-level or otherwise unclassified transport failure.
    Connection,
}

impl TransportErrorCode {
    /// Whether a caller-level retry is typically sensible.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportErrorCode::Timeout | TransportErrorCode::Connection
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportErrorCode::HttpStatus => "http_status",
            TransportErrorCode::Timeout => "timeout",
            TransportErrorCode::ProviderRejected => "provider_rejected",
            TransportErrorCode::Connection => "connection",
        }
    }
}

impl std::fmt::Display for TransportErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by the gateway layer.
///
/// Nothing here is ever swallowed into a success result; the one deliberate
/// exception is a status-check "not found", which is modeled as a
/// successful `Indeterminate` result because it is expected and actionable.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required credential or setting was missing or invalid at adapter
    /// construction. Fatal; surfaced on first registry access.
    #[error("{provider} gateway configuration error: {message}")]
    Configuration {
        provider: GatewayName,
        message: String,
    },

    /// The operation is not offered by this provider. Never retried.
    #[error("{operation} is not supported by the {provider} gateway")]
    UnsupportedOperation {
        provider: GatewayName,
        operation: &'static str,
    },

    /// The provider's response body could not be parsed. Carries the raw
    /// body for diagnostics.
    #[error("{provider} protocol error: {message}")]
    Protocol {
        provider: GatewayName,
        message: String,
        raw: Option<String>,
    },

    /// HTTP failure, timeout, or provider-reported business failure.
    #[error("{provider} transport error ({code}): {message}")]
    Transport {
        provider: GatewayName,
        code: TransportErrorCode,
        message: String,
        raw: Option<String>,
    },
}

impl GatewayError {
    pub fn configuration(provider: GatewayName, message: impl Into<String>) -> Self {
        GatewayError::Configuration {
            provider,
            message: message.into(),
        }
    }

    pub fn unsupported(provider: GatewayName, operation: &'static str) -> Self {
        GatewayError::UnsupportedOperation {
            provider,
            operation,
        }
    }

    pub fn protocol(provider: GatewayName, message: impl Into<String>, raw: Option<String>) -> Self {
        GatewayError::Protocol {
            provider,
            message: message.into(),
            raw,
        }
    }

    pub fn transport(
        provider: GatewayName,
        code: TransportErrorCode,
        message: impl Into<String>,
        raw: Option<String>,
    ) -> Self {
        GatewayError::Transport {
            provider,
            code,
            message: message.into(),
            raw,
        }
    }

    /// Whether a caller-level retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Transport { code, .. } => code.is_retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }

    #[test]
    fn unsupported_operation_names_operation_and_provider() {
        let err = GatewayError::unsupported(GatewayName::Yo, "withdraw");
        let text = err.to_string();
        assert!(text.contains("withdraw"));
        assert!(text.contains("yo"));
    }

    #[test]
    fn retryability_follows_transport_code() {
        let timeout = GatewayError::transport(
            GatewayName::Yo,
            TransportErrorCode::Timeout,
            "deadline exceeded",
            None,
        );
        assert!(timeout.is_retryable());

        let rejected = GatewayError::transport(
            GatewayName::Yo,
            TransportErrorCode::ProviderRejected,
            "insufficient float",
            None,
        );
        assert!(!rejected.is_retryable());

        assert!(!GatewayError::unsupported(GatewayName::Iotec, "balance").is_retryable());
        assert!(!GatewayError::configuration(GatewayName::Yo, "missing username").is_retryable());
    }

    #[test]
    fn transport_code_display_is_machine_readable() {
        assert_eq!(TransportErrorCode::Timeout.to_string(), "timeout");
        assert_eq!(
            TransportErrorCode::ProviderRejected.to_string(),
            "provider_rejected"
        );
    }
}
