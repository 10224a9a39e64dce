//! IoTec Pay configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Production API base.
pub const IOTEC_PRODUCTION_URL: &str = "https://pay.iotec.io";

/// Sandbox API base.
pub const IOTEC_SANDBOX_URL: &str = "https://sandbox.pay.iotec.io";

/// Token endpoint (client-credentials grant).
pub const IOTEC_AUTH_URL: &str = "https://id.iotec.io/connect/token";

/// IoTec Pay gateway configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IotecConfig {
    /// Whether this provider may be resolved from the registry.
    #[serde(default)]
    pub enabled: bool,

    /// Route calls to the sandbox environment.
    #[serde(default)]
    pub use_sandbox: bool,

    /// OAuth client id.
    #[serde(default)]
    pub client_id: String,

    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: String,

    /// Wallet the collections and disbursements run against.
    #[serde(default)]
    pub wallet_id: String,

    /// Override for the API base (testing against a local stub).
    pub api_url: Option<String>,

    /// Override for the token endpoint.
    pub auth_url: Option<String>,
}

impl IotecConfig {
    /// The API base this configuration points at.
    pub fn api_base(&self) -> &str {
        match &self.api_url {
            Some(url) => url,
            None if self.use_sandbox => IOTEC_SANDBOX_URL,
            None => IOTEC_PRODUCTION_URL,
        }
    }

    /// The token endpoint this configuration points at.
    pub fn auth_endpoint(&self) -> &str {
        self.auth_url.as_deref().unwrap_or(IOTEC_AUTH_URL)
    }

    /// Validate required credentials for an enabled provider.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.enabled {
            return Err(ValidationError::ProviderDisabled("iotec"));
        }
        if self.client_id.is_empty() {
            return Err(ValidationError::MissingRequired(
                "MOMO_GATEWAY__IOTEC__CLIENT_ID",
            ));
        }
        if self.client_secret.is_empty() {
            return Err(ValidationError::MissingRequired(
                "MOMO_GATEWAY__IOTEC__CLIENT_SECRET",
            ));
        }
        if self.wallet_id.is_empty() {
            return Err(ValidationError::MissingRequired(
                "MOMO_GATEWAY__IOTEC__WALLET_ID",
            ));
        }
        for url in [&self.api_url, &self.auth_url].into_iter().flatten() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidApiUrl);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> IotecConfig {
        IotecConfig {
            enabled: true,
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            wallet_id: "wallet-1".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn api_base_selects_environment() {
        let mut config = valid();
        assert_eq!(config.api_base(), IOTEC_PRODUCTION_URL);

        config.use_sandbox = true;
        assert_eq!(config.api_base(), IOTEC_SANDBOX_URL);

        config.api_url = Some("http://localhost:9100".to_string());
        assert_eq!(config.api_base(), "http://localhost:9100");
    }

    #[test]
    fn validation_requires_all_credentials() {
        assert!(valid().validate().is_ok());

        let cases: [fn(&mut IotecConfig); 3] = [
            |c| c.client_id.clear(),
            |c| c.client_secret.clear(),
            |c| c.wallet_id.clear(),
        ];
        for clear in cases {
            let mut config = valid();
            clear(&mut config);
            assert!(matches!(
                config.validate(),
                Err(ValidationError::MissingRequired(_))
            ));
        }
    }

    #[test]
    fn validation_rejects_disabled_provider() {
        let mut config = valid();
        config.enabled = false;
        assert_eq!(
            config.validate(),
            Err(ValidationError::ProviderDisabled("iotec"))
        );
    }
}
