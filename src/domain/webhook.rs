//! Normalized inbound payment notifications (IPNs).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a notification reports settlement or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookKind {
    /// The transaction settled.
    Success,

    /// The transaction terminally failed.
    Failure,
}

/// Canonical view of a provider webhook, produced by `parse_webhook`.
///
/// Parsing is independent of verification; correct callers verify first
/// and only then trust these fields. Every extractable field is optional
/// because the two providers' payloads carry different subsets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Success or failure notification.
    pub kind: WebhookKind,

    /// The caller's own reference, when the provider echoes it.
    pub external_reference: Option<String>,

    /// The provider's transaction identifier.
    pub gateway_reference: Option<String>,

    /// Mobile-network-operator reference.
    pub mno_reference: Option<String>,

    /// Amount as reported in the notification.
    pub amount: Option<Decimal>,

    /// Payer phone number as reported in the notification.
    pub phone_number: Option<String>,

    /// Provider timestamp, verbatim (formats differ per provider).
    pub timestamp: Option<String>,

    /// The raw payload, untouched, for auditing and reprocessing.
    pub raw: serde_json::Value,
}

impl WebhookPayload {
    /// An empty failure-typed payload wrapping an unrecognized body.
    ///
    /// Returned when a payload matches no known notification shape, so
    /// callers still get the raw body back for logging.
    pub fn unrecognized(raw: serde_json::Value) -> Self {
        Self {
            kind: WebhookKind::Failure,
            external_reference: None,
            gateway_reference: None,
            mno_reference: None,
            amount: None,
            phone_number: None,
            timestamp: None,
            raw,
        }
    }
}
