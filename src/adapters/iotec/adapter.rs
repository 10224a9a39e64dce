//! IoTec Pay gateway adapter.
//!
//! IoTec exposes a conventional JSON API with OAuth client-credentials
//! authentication. The adapter supports collections, disbursements,
//! status lookups and wallet balance queries.
//!
//! Tokens are fetched per call so the adapter stays stateless; callers
//! wanting fewer token round-trips can front it with their own policy.
//!
//! Amounts are passed through in UGX major units; confirm the unit
//! convention against live IoTec documentation before moving real money.
//!
//! # Webhook authenticity
//!
//! IoTec notifications carry no signature, so `verify_webhook` accepts
//! every payload. That is a real gap in the provider's scheme, preserved
//! deliberately rather than papered over: deployments must restrict the
//! webhook endpoint at the network level to IoTec's published sources.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;

use crate::config::IotecConfig;
use crate::domain::{
    BalanceResult, DepositRequest, GatewayName, TransactionResult, WebhookPayload, WithdrawRequest,
};
use crate::ports::{GatewayError, PaymentGateway, TransportErrorCode};

use super::msisdn;
use super::types::{
    self, CollectionRequest, DisbursementRequest, IotecTransaction, TokenResponse, Wallet,
    CATEGORY_MOBILE_MONEY,
};

/// Upper bound for a single provider call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Currency the configured wallet transacts in.
const WALLET_CURRENCY: &str = "UGX";

/// `PaymentGateway` implementation for IoTec Pay.
#[derive(Debug)]
pub struct IotecGateway {
    client: reqwest::Client,
    api_base: String,
    auth_endpoint: String,
    client_id: String,
    client_secret: SecretString,
    wallet_id: String,
}

impl IotecGateway {
    /// Construct from validated configuration.
    pub fn new(config: &IotecConfig) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::configuration(GatewayName::Iotec, e.to_string()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_base: config.api_base().trim_end_matches('/').to_string(),
            auth_endpoint: config.auth_endpoint().to_string(),
            client_id: config.client_id.clone(),
            client_secret: SecretString::new(config.client_secret.clone()),
            wallet_id: config.wallet_id.clone(),
        })
    }

    /// Obtain a bearer token via the client-credentials grant.
    async fn access_token(&self) -> Result<String, GatewayError> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret().as_str()),
        ];

        let response = self
            .client
            .post(&self.auth_endpoint)
            .form(&params)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(classify_send_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                provider = %GatewayName::Iotec,
                status = status.as_u16(),
                "token request rejected"
            );
            return Err(GatewayError::transport(
                GatewayName::Iotec,
                TransportErrorCode::HttpStatus,
                format!("token request failed with HTTP {status}"),
                Some(body),
            ));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            GatewayError::protocol(
                GatewayName::Iotec,
                format!("invalid token response: {e}"),
                None,
            )
        })?;
        Ok(token.access_token)
    }

    async fn post_json<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Value, GatewayError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .post(format!("{}{path}", self.api_base))
            .bearer_auth(token)
            .json(body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(classify_send_error)?;

        Self::read_json(response).await
    }

    /// GET a resource; `Ok(None)` means the provider reported not-found.
    async fn get_json(&self, path: &str) -> Result<Option<Value>, GatewayError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .get(format!("{}{path}", self.api_base))
            .bearer_auth(token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(classify_send_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::read_json(response).await.map(Some)
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, GatewayError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            GatewayError::transport(
                GatewayName::Iotec,
                TransportErrorCode::Connection,
                format!("failed to read response body: {e}"),
                None,
            )
        })?;

        if !status.is_success() {
            tracing::warn!(
                provider = %GatewayName::Iotec,
                status = status.as_u16(),
                "provider returned non-success HTTP status"
            );
            return Err(GatewayError::transport(
                GatewayName::Iotec,
                TransportErrorCode::HttpStatus,
                format!("HTTP {status}"),
                Some(body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            GatewayError::protocol(
                GatewayName::Iotec,
                format!("invalid JSON response: {e}"),
                Some(body),
            )
        })
    }

    fn transaction_from(raw: Value) -> Result<IotecTransaction, GatewayError> {
        serde_json::from_value(raw.clone()).map_err(|e| {
            GatewayError::protocol(
                GatewayName::Iotec,
                format!("unexpected transaction shape: {e}"),
                Some(raw.to_string()),
            )
        })
    }
}

#[async_trait]
impl PaymentGateway for IotecGateway {
    async fn deposit(&self, request: DepositRequest) -> Result<TransactionResult, GatewayError> {
        let payer = msisdn::normalize(&request.phone_number);
        tracing::info!(
            provider = %GatewayName::Iotec,
            external_reference = %request.external_reference,
            amount = %request.amount,
            "initiating collection"
        );

        let body = CollectionRequest {
            category: CATEGORY_MOBILE_MONEY,
            currency: WALLET_CURRENCY.to_string(),
            wallet_id: self.wallet_id.clone(),
            external_id: request.external_reference.clone(),
            payer,
            amount: request.amount,
            payer_note: request.narrative.clone(),
            payee_note: request.narrative,
            success_callback_url: request.success_callback_url,
            failure_callback_url: request.failure_callback_url,
        };

        let raw = self.post_json("/api/collections/collect", &body).await?;
        let transaction = Self::transaction_from(raw.clone())?;
        let mut result = transaction.into_result(raw);
        // The ack may omit the echo; the caller's reference is authoritative.
        result.external_reference = Some(request.external_reference);

        tracing::info!(
            provider = %GatewayName::Iotec,
            gateway_reference = %result.gateway_reference,
            status = %result.status,
            "collection acknowledged"
        );
        Ok(result)
    }

    async fn withdraw(&self, request: WithdrawRequest) -> Result<TransactionResult, GatewayError> {
        let payee = msisdn::normalize(&request.phone_number);
        tracing::info!(
            provider = %GatewayName::Iotec,
            external_reference = %request.external_reference,
            amount = %request.amount,
            "initiating disbursement"
        );

        let body = DisbursementRequest {
            category: CATEGORY_MOBILE_MONEY,
            currency: WALLET_CURRENCY.to_string(),
            wallet_id: self.wallet_id.clone(),
            external_id: request.external_reference.clone(),
            payee,
            amount: request.amount,
            payer_note: request.narrative.clone(),
            payee_note: request.narrative,
            success_callback_url: request.success_callback_url,
            failure_callback_url: request.failure_callback_url,
        };

        let raw = self
            .post_json("/api/disbursements/disburse", &body)
            .await?;
        let transaction = Self::transaction_from(raw.clone())?;
        let mut result = transaction.into_result(raw);
        result.external_reference = Some(request.external_reference);
        Ok(result)
    }

    async fn check_status(&self, reference: &str) -> Result<TransactionResult, GatewayError> {
        let path = format!("/api/collections/status/{reference}");
        match self.get_json(&path).await? {
            Some(raw) => {
                let transaction = Self::transaction_from(raw.clone())?;
                Ok(transaction.into_result(raw))
            }
            None => Ok(TransactionResult::not_found(format!(
                "no transaction with reference {reference}"
            ))),
        }
    }

    async fn balance(&self) -> Result<Vec<BalanceResult>, GatewayError> {
        let path = format!("/api/wallets/{}", self.wallet_id);
        let Some(raw) = self.get_json(&path).await? else {
            return Ok(Vec::new());
        };

        let wallet: Wallet = serde_json::from_value(raw.clone()).map_err(|e| {
            GatewayError::protocol(
                GatewayName::Iotec,
                format!("unexpected wallet shape: {e}"),
                Some(raw.to_string()),
            )
        })?;

        Ok(wallet
            .available_balance
            .map(|amount| BalanceResult {
                currency: wallet.currency.unwrap_or_else(|| WALLET_CURRENCY.to_string()),
                amount,
            })
            .into_iter()
            .collect())
    }

    fn verify_webhook(&self, _payload: &Value, _signature: Option<&str>) -> bool {
        // IoTec offers nothing to verify. Accepting everything is the
        // provider's documented behavior; restrict the endpoint at the
        // network level.
        tracing::warn!(
            provider = %GatewayName::Iotec,
            "accepting webhook without authentication; provider sends none"
        );
        true
    }

    fn parse_webhook(&self, payload: &Value) -> WebhookPayload {
        types::parse_webhook(payload)
    }

    fn name(&self) -> GatewayName {
        GatewayName::Iotec
    }
}

fn classify_send_error(e: reqwest::Error) -> GatewayError {
    let code = if e.is_timeout() {
        TransportErrorCode::Timeout
    } else {
        TransportErrorCode::Connection
    };
    GatewayError::transport(GatewayName::Iotec, code, e.to_string(), None)
}
