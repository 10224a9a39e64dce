//! IoTec wire types and normalization.
//!
//! IoTec speaks plain JSON; the codec here is key renaming between the
//! canonical model and IoTec's camelCase vocabulary, plus status
//! normalization.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{TransactionResult, TransactionStatus, WebhookKind, WebhookPayload};

/// Channel category for mobile-money transactions.
pub const CATEGORY_MOBILE_MONEY: &str = "MobileMoney";

/// Collection (deposit) request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRequest {
    pub category: &'static str,
    pub currency: String,
    pub wallet_id: String,
    pub external_id: String,
    pub payer: String,
    pub amount: Decimal,
    pub payer_note: String,
    pub payee_note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_callback_url: Option<String>,
}

/// Disbursement (withdrawal) request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisbursementRequest {
    pub category: &'static str,
    pub currency: String,
    pub wallet_id: String,
    pub external_id: String,
    pub payee: String,
    pub amount: Decimal,
    pub payer_note: String,
    pub payee_note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_callback_url: Option<String>,
}

/// Transaction view returned by collect, disburse and status lookups.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IotecTransaction {
    /// IoTec's transaction id.
    pub id: String,

    /// Our external id, echoed back.
    #[serde(default)]
    pub external_id: Option<String>,

    /// Status literal: `Success`, `Failed`, `Pending` (any casing).
    #[serde(default)]
    pub status: Option<String>,

    /// Free-text elaboration.
    #[serde(default)]
    pub status_message: Option<String>,

    /// The MNO's transaction id.
    #[serde(default)]
    pub vendor_transaction_id: Option<String>,

    #[serde(default)]
    pub amount: Option<Decimal>,

    #[serde(default)]
    pub currency: Option<String>,

    /// Fee charged by IoTec, surfaced for reconciliation.
    #[serde(default)]
    pub transaction_charge: Option<Decimal>,
}

/// Wallet view for balance queries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub available_balance: Option<Decimal>,
}

/// Client-credentials token grant response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Map an IoTec status literal onto the canonical vocabulary.
///
/// Anything outside the three documented literals (including IoTec's
/// transient `Sent`) is indeterminate and needs a follow-up check.
pub fn normalize_status(status: Option<&str>) -> TransactionStatus {
    match status.map(|s| s.to_ascii_lowercase()).as_deref() {
        Some("success") => TransactionStatus::Succeeded,
        Some("failed") => TransactionStatus::Failed,
        Some("pending") => TransactionStatus::Pending,
        _ => TransactionStatus::Indeterminate,
    }
}

impl IotecTransaction {
    /// Build the canonical result, attaching the raw response body.
    pub fn into_result(self, raw: Value) -> TransactionResult {
        let status = normalize_status(self.status.as_deref());
        let mut result = TransactionResult::new(status, self.id);
        result.external_reference = self.external_id;
        result.mno_reference = self.vendor_transaction_id;
        result.amount = self.amount;
        result.currency = self.currency;
        result.message = self.status_message;
        result.raw_response = Some(raw);
        result
    }
}

/// Normalize an IoTec status notification.
///
/// IoTec does not sign its webhooks; parsing extracts what the payload
/// carries and the status literal decides success versus failure.
pub fn parse_webhook(payload: &Value) -> WebhookPayload {
    let status = text_field(payload, "status").unwrap_or_default();
    let kind = if status.eq_ignore_ascii_case("success") {
        WebhookKind::Success
    } else {
        WebhookKind::Failure
    };

    WebhookPayload {
        kind,
        external_reference: text_field(payload, "externalId"),
        gateway_reference: text_field(payload, "id"),
        mno_reference: text_field(payload, "vendorTransactionId"),
        amount: text_field(payload, "amount").and_then(|a| a.parse().ok()),
        phone_number: text_field(payload, "payer"),
        timestamp: text_field(payload, "createdAt"),
        raw: payload.clone(),
    }
}

fn text_field(payload: &Value, name: &str) -> Option<String> {
    match payload.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
