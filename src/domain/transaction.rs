//! Transaction requests, results and the canonical status vocabulary.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical transaction status across all providers.
///
/// Providers report wildly different vocabularies; the normalizers map
/// each of them onto this closed set. `Indeterminate` means the response
/// could not be confidently classified - callers must follow up with a
/// status check and never treat it as terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Accepted by the provider, awaiting payer action or settlement.
    Pending,

    /// In flight on the provider's side.
    Processing,

    /// Settled successfully.
    Succeeded,

    /// Terminally failed.
    Failed,

    /// Response could not be classified; requires a follow-up status check.
    Indeterminate,
}

impl TransactionStatus {
    /// Whether this status is terminal (no further transitions expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Succeeded | TransactionStatus::Failed)
    }

    /// Whether callers should schedule a follow-up status check.
    pub fn needs_followup(&self) -> bool {
        !self.is_terminal()
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Processing => "processing",
            TransactionStatus::Succeeded => "succeeded",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Indeterminate => "indeterminate",
        };
        f.write_str(s)
    }
}

/// Request to collect funds from a payer's mobile-money account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositRequest {
    /// Caller-assigned idempotency/correlation key. Round-tripped
    /// unchanged through the result so callers can match async outcomes.
    pub external_reference: String,

    /// Payer phone number, any input format; adapters normalize.
    pub phone_number: String,

    /// Amount to collect. Units are the provider's convention (UGX major
    /// units for both providers wired here).
    pub amount: Decimal,

    /// Human-readable transaction description.
    pub narrative: String,

    /// Optional URL the provider should notify on success.
    pub success_callback_url: Option<String>,

    /// Optional URL the provider should notify on failure.
    pub failure_callback_url: Option<String>,

    /// Opaque caller metadata, passed through where the provider allows.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Request to disburse funds to a recipient's mobile-money account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawRequest {
    /// Caller-assigned idempotency/correlation key.
    pub external_reference: String,

    /// Recipient phone number, any input format; adapters normalize.
    pub phone_number: String,

    /// Amount to disburse, in the provider's unit convention.
    pub amount: Decimal,

    /// Human-readable transaction description.
    pub narrative: String,

    /// Optional URL the provider should notify on success.
    pub success_callback_url: Option<String>,

    /// Optional URL the provider should notify on failure.
    pub failure_callback_url: Option<String>,

    /// Opaque caller metadata, passed through where the provider allows.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Normalized outcome of a deposit, withdrawal or status check.
///
/// Invariant: `success` is true iff `status != Failed`. `gateway_reference`
/// is non-empty once the provider has accepted the request; it is empty
/// only when a status lookup found nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResult {
    /// Derived flag: the transaction has not terminally failed.
    pub success: bool,

    /// Canonical status.
    pub status: TransactionStatus,

    /// The provider's own transaction identifier.
    pub gateway_reference: String,

    /// The caller's reference, echoed back when supplied.
    pub external_reference: Option<String>,

    /// Mobile-network-operator reference, when the provider reports one.
    pub mno_reference: Option<String>,

    /// Transaction amount as reported by the provider.
    pub amount: Option<Decimal>,

    /// ISO currency code as reported by the provider.
    pub currency: Option<String>,

    /// Free-text status message from the provider.
    pub message: Option<String>,

    /// Raw provider response, for diagnostics and reconciliation.
    pub raw_response: Option<serde_json::Value>,
}

impl TransactionResult {
    /// Build a result with the success flag derived from the status.
    pub fn new(status: TransactionStatus, gateway_reference: impl Into<String>) -> Self {
        Self {
            success: status != TransactionStatus::Failed,
            status,
            gateway_reference: gateway_reference.into(),
            external_reference: None,
            mno_reference: None,
            amount: None,
            currency: None,
            message: None,
            raw_response: None,
        }
    }

    /// Result for a status lookup that found no matching transaction.
    ///
    /// Deliberately a successful `Indeterminate`, not an error: a reference
    /// held by a caller may point at a transaction still propagating.
    pub fn not_found(message: impl Into<String>) -> Self {
        let mut result = Self::new(TransactionStatus::Indeterminate, "");
        result.message = Some(message.into());
        result
    }
}

/// A single-currency balance entry. An adapter may return zero, one or
/// several of these for multi-currency wallets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResult {
    /// ISO currency code, e.g. `UGX`.
    pub currency: String,

    /// Current float in that currency.
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_flag_derived_from_status() {
        assert!(TransactionResult::new(TransactionStatus::Pending, "r").success);
        assert!(TransactionResult::new(TransactionStatus::Succeeded, "r").success);
        assert!(TransactionResult::new(TransactionStatus::Indeterminate, "r").success);
        assert!(!TransactionResult::new(TransactionStatus::Failed, "r").success);
    }

    #[test]
    fn not_found_is_indeterminate_with_empty_reference() {
        let result = TransactionResult::not_found("no such transaction");
        assert!(result.success);
        assert_eq!(result.status, TransactionStatus::Indeterminate);
        assert!(result.gateway_reference.is_empty());
        assert_eq!(result.message.as_deref(), Some("no such transaction"));
    }

    #[test]
    fn terminal_statuses() {
        assert!(TransactionStatus::Succeeded.is_terminal());
        assert!(TransactionStatus::Failed.is_terminal());
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(!TransactionStatus::Processing.is_terminal());
        assert!(!TransactionStatus::Indeterminate.is_terminal());
        assert!(TransactionStatus::Indeterminate.needs_followup());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&TransactionStatus::Indeterminate).unwrap();
        assert_eq!(json, "\"indeterminate\"");
    }

    #[test]
    fn balance_result_holds_decimal_amounts() {
        let balance = BalanceResult {
            currency: "UGX".to_string(),
            amount: Decimal::from(150_000),
        };
        assert_eq!(balance.amount.to_string(), "150000");
    }
}
