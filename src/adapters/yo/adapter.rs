//! Yo! Payments gateway adapter.
//!
//! Composes the envelope codec, status normalizer, msisdn normalizer, IPN
//! verifier and HTTP transport into the unified gateway contract.
//!
//! Yo! is wired deposit-only here: `withdraw` and `balance` fail fast
//! with an unsupported-operation error and never touch the transport.
//!
//! Amounts are passed through in UGX major units; confirm the unit
//! convention against live Yo! documentation before moving real money.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};

use crate::config::YoConfig;
use crate::domain::{
    BalanceResult, DepositRequest, GatewayName, TransactionResult, WebhookPayload, WithdrawRequest,
};
use crate::ports::{GatewayError, PaymentGateway, TransportErrorCode};

use super::envelope::{self, YoResponse};
use super::ipn::IpnVerifier;
use super::msisdn;
use super::status;
use super::transport::{HttpTransport, YoTransport};

/// Method name for a non-blocking collection.
const METHOD_DEPOSIT: &str = "acdepositfunds";

/// Method name for re-querying a transaction.
const METHOD_CHECK_STATUS: &str = "actransactioncheckstatus";

/// `PaymentGateway` implementation for Yo! Payments.
pub struct YoGateway {
    api_username: String,
    api_password: SecretString,
    transport: Arc<dyn YoTransport>,
    verifier: IpnVerifier,
}

impl std::fmt::Debug for YoGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoGateway")
            .field("api_username", &self.api_username)
            .finish_non_exhaustive()
    }
}

impl YoGateway {
    /// Construct from validated configuration, with the production HTTP
    /// transport.
    pub fn new(config: &YoConfig) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::configuration(GatewayName::Yo, e.to_string()))?;
        let transport = Arc::new(HttpTransport::new(config.endpoint()));
        Ok(Self::with_transport(config, transport))
    }

    /// Construct with an explicit transport (tests, stubs).
    pub fn with_transport(config: &YoConfig, transport: Arc<dyn YoTransport>) -> Self {
        Self {
            api_username: config.api_username.clone(),
            api_password: SecretString::new(config.api_password.clone()),
            transport,
            verifier: IpnVerifier::from_key_file(config.public_key_path.as_deref()),
        }
    }

    async fn call(
        &self,
        method: &str,
        params: &[(&str, Option<String>)],
    ) -> Result<(YoResponse, String), GatewayError> {
        let body = envelope::build_request(
            &self.api_username,
            self.api_password.expose_secret(),
            method,
            params,
        );
        let raw = self.transport.exchange(body).await?;
        let response = envelope::parse_response(&raw)
            .map_err(|e| GatewayError::protocol(GatewayName::Yo, e.to_string(), Some(raw.clone())))?;
        Ok((response, raw))
    }

    /// Surface a provider-level rejection as a transport error.
    fn check_provider_rejection(response: &YoResponse, raw: &str) -> Result<(), GatewayError> {
        let negative_code = response.status_code.is_some_and(|code| code < 0);
        let error_status = response
            .status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("ERROR"));

        if negative_code || error_status {
            let message = response
                .status_message
                .clone()
                .unwrap_or_else(|| "provider rejected the request".to_string());
            return Err(GatewayError::transport(
                GatewayName::Yo,
                TransportErrorCode::ProviderRejected,
                message,
                Some(raw.to_string()),
            ));
        }
        Ok(())
    }

    fn to_result(
        response: YoResponse,
        raw: String,
        external_reference: Option<String>,
        fallback_amount: Option<Decimal>,
    ) -> TransactionResult {
        let status = status::normalize(&response);
        let mut result = TransactionResult::new(
            status,
            response.transaction_reference.unwrap_or_default(),
        );
        result.external_reference = external_reference;
        result.mno_reference = response.mno_reference;
        result.amount = response.amount.or(fallback_amount);
        result.currency = response.currency;
        result.message = response.status_message;
        result.raw_response = Some(serde_json::Value::String(raw));
        result
    }
}

#[async_trait]
impl PaymentGateway for YoGateway {
    async fn deposit(&self, request: DepositRequest) -> Result<TransactionResult, GatewayError> {
        let account = msisdn::normalize(&request.phone_number);
        tracing::info!(
            provider = %GatewayName::Yo,
            external_reference = %request.external_reference,
            amount = %request.amount,
            "initiating collection"
        );

        let params = [
            ("NonBlocking", Some("TRUE".to_string())),
            ("Amount", Some(request.amount.to_string())),
            ("Account", Some(account)),
            ("Narrative", Some(request.narrative.clone())),
            (
                "ExternalReference",
                Some(request.external_reference.clone()),
            ),
            ("InstantNotificationUrl", request.success_callback_url),
            ("FailureNotificationUrl", request.failure_callback_url),
        ];

        let (response, raw) = self.call(METHOD_DEPOSIT, &params).await?;
        Self::check_provider_rejection(&response, &raw)?;

        let result = Self::to_result(
            response,
            raw,
            Some(request.external_reference),
            Some(request.amount),
        );
        tracing::info!(
            provider = %GatewayName::Yo,
            gateway_reference = %result.gateway_reference,
            status = %result.status,
            "collection acknowledged"
        );
        Ok(result)
    }

    async fn withdraw(&self, _request: WithdrawRequest) -> Result<TransactionResult, GatewayError> {
        Err(GatewayError::unsupported(GatewayName::Yo, "withdraw"))
    }

    async fn check_status(&self, reference: &str) -> Result<TransactionResult, GatewayError> {
        let params = [("TransactionReference", Some(reference.to_string()))];
        let (response, raw) = self.call(METHOD_CHECK_STATUS, &params).await?;

        // An unknown reference is an expected outcome while a transaction
        // is still propagating, not an error.
        if let Err(rejection) = Self::check_provider_rejection(&response, &raw) {
            let message = response
                .status_message
                .clone()
                .unwrap_or_default();
            if message.to_ascii_lowercase().contains("not found") {
                return Ok(TransactionResult::not_found(message));
            }
            return Err(rejection);
        }

        Ok(Self::to_result(response, raw, None, None))
    }

    async fn balance(&self) -> Result<Vec<BalanceResult>, GatewayError> {
        Err(GatewayError::unsupported(GatewayName::Yo, "balance"))
    }

    fn verify_webhook(&self, payload: &serde_json::Value, signature: Option<&str>) -> bool {
        self.verifier.verify(payload, signature)
    }

    fn parse_webhook(&self, payload: &serde_json::Value) -> WebhookPayload {
        self.verifier.parse(payload)
    }

    fn name(&self) -> GatewayName {
        GatewayName::Yo
    }
}
