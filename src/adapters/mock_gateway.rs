//! Mock payment gateway for testing.
//!
//! A configurable in-memory implementation of `PaymentGateway` for unit
//! and integration tests in consuming services. Supports:
//! - Pre-configured results
//! - Error injection
//! - Call tracking
//! - Webhook verification modes

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{
    BalanceResult, DepositRequest, GatewayName, TransactionResult, TransactionStatus,
    WebhookPayload, WithdrawRequest,
};
use crate::ports::{GatewayError, PaymentGateway};

/// Mock gateway for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockGateway::new(GatewayName::Yo);
/// mock.set_deposit_result(TransactionResult::new(TransactionStatus::Pending, "ref-1"));
/// let result = mock.deposit(request).await?;
/// assert_eq!(mock.calls("deposit"), 1);
/// ```
pub struct MockGateway {
    name: GatewayName,
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Result to return on the next `deposit` call.
    next_deposit: Option<TransactionResult>,

    /// Result to return on the next `withdraw` call.
    next_withdraw: Option<TransactionResult>,

    /// Result to return on the next `check_status` call.
    next_status: Option<TransactionResult>,

    /// Balances to return from `balance`.
    balances: Vec<BalanceResult>,

    /// Error to return from the next async operation.
    next_error: Option<GatewayError>,

    /// Recorded method names, in call order.
    call_log: Vec<String>,

    /// Whether `verify_webhook` accepts payloads.
    verify_result: bool,
}

impl MockGateway {
    /// Create a mock that reports the given provider name and accepts
    /// all webhooks.
    pub fn new(name: GatewayName) -> Self {
        Self {
            name,
            inner: Arc::new(Mutex::new(MockState {
                verify_result: true,
                ..Default::default()
            })),
        }
    }

    /// Create a mock that fails all webhook verifications.
    pub fn rejecting_webhooks(name: GatewayName) -> Self {
        let mock = Self::new(name);
        mock.inner.lock().unwrap().verify_result = false;
        mock
    }

    pub fn set_deposit_result(&self, result: TransactionResult) {
        self.inner.lock().unwrap().next_deposit = Some(result);
    }

    pub fn set_withdraw_result(&self, result: TransactionResult) {
        self.inner.lock().unwrap().next_withdraw = Some(result);
    }

    pub fn set_status_result(&self, result: TransactionResult) {
        self.inner.lock().unwrap().next_status = Some(result);
    }

    pub fn set_balances(&self, balances: Vec<BalanceResult>) {
        self.inner.lock().unwrap().balances = balances;
    }

    /// Inject an error for the next async operation.
    pub fn set_error(&self, error: GatewayError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// How many times the named method was called.
    pub fn calls(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|m| m.as_str() == method)
            .count()
    }

    fn record(&self, method: &str) -> Option<GatewayError> {
        let mut state = self.inner.lock().unwrap();
        state.call_log.push(method.to_string());
        state.next_error.take()
    }

    fn default_result(reference: &str) -> TransactionResult {
        TransactionResult::new(TransactionStatus::Pending, reference)
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn deposit(&self, request: DepositRequest) -> Result<TransactionResult, GatewayError> {
        if let Some(error) = self.record("deposit") {
            return Err(error);
        }
        let mut result = self
            .inner
            .lock()
            .unwrap()
            .next_deposit
            .take()
            .unwrap_or_else(|| Self::default_result("mock-deposit"));
        result.external_reference = Some(request.external_reference);
        Ok(result)
    }

    async fn withdraw(&self, request: WithdrawRequest) -> Result<TransactionResult, GatewayError> {
        if let Some(error) = self.record("withdraw") {
            return Err(error);
        }
        let mut result = self
            .inner
            .lock()
            .unwrap()
            .next_withdraw
            .take()
            .unwrap_or_else(|| Self::default_result("mock-withdraw"));
        result.external_reference = Some(request.external_reference);
        Ok(result)
    }

    async fn check_status(&self, reference: &str) -> Result<TransactionResult, GatewayError> {
        if let Some(error) = self.record("check_status") {
            return Err(error);
        }
        Ok(self
            .inner
            .lock()
            .unwrap()
            .next_status
            .take()
            .unwrap_or_else(|| Self::default_result(reference)))
    }

    async fn balance(&self) -> Result<Vec<BalanceResult>, GatewayError> {
        if let Some(error) = self.record("balance") {
            return Err(error);
        }
        Ok(self.inner.lock().unwrap().balances.clone())
    }

    fn verify_webhook(&self, _payload: &Value, _signature: Option<&str>) -> bool {
        let mut state = self.inner.lock().unwrap();
        state.call_log.push("verify_webhook".to_string());
        state.verify_result
    }

    fn parse_webhook(&self, payload: &Value) -> WebhookPayload {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .push("parse_webhook".to_string());
        WebhookPayload::unrecognized(payload.clone())
    }

    fn name(&self) -> GatewayName {
        self.name
    }
}
