//! Status normalization for Yo! responses.
//!
//! Yo! reports transaction state across three fields that do not always
//! agree, so resolution order matters. In particular the envelope can say
//! `OK`/code 0 overall while the transaction itself is still pending.

use crate::domain::TransactionStatus;

use super::envelope::YoResponse;

/// Status code Yo! uses for a transaction that is still in progress.
pub const PENDING_STATUS_CODE: i64 = 1;

/// Resolve the canonical status for a parsed response.
///
/// Precedence:
/// 1. the pending sentinel status code, regardless of any other field;
/// 2. the `TransactionStatus` literal, case-insensitively;
/// 3. the overall success sentinel (`OK` with code 0);
/// 4. otherwise indeterminate.
pub fn normalize(response: &YoResponse) -> TransactionStatus {
    if response.status_code == Some(PENDING_STATUS_CODE) {
        return TransactionStatus::Pending;
    }

    if let Some(literal) = &response.transaction_status {
        match literal.to_ascii_uppercase().as_str() {
            "SUCCEEDED" => return TransactionStatus::Succeeded,
            "FAILED" => return TransactionStatus::Failed,
            "PENDING" => return TransactionStatus::Pending,
            "INDETERMINATE" => return TransactionStatus::Indeterminate,
            _ => {}
        }
    }

    let overall_ok = response.status.as_deref().map(str::to_ascii_uppercase) == Some("OK".into())
        && response.status_code == Some(0);
    if overall_ok {
        TransactionStatus::Succeeded
    } else {
        TransactionStatus::Indeterminate
    }
}
