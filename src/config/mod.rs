//! Gateway configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `MOMO_GATEWAY`
//! prefix and `__` (double underscore) as the nesting separator:
//!
//! - `MOMO_GATEWAY__DEFAULT_PROVIDER=yo`
//! - `MOMO_GATEWAY__YO__API_USERNAME=100200`
//! - `MOMO_GATEWAY__IOTEC__CLIENT_SECRET=...`
//!
//! Each provider section validates independently: a broken IoTec section
//! does not prevent resolving the Yo adapter, and vice versa. Credentials
//! are never logged.

mod error;
mod iotec;
mod yo;

pub use error::{ConfigError, ValidationError};
pub use iotec::{IotecConfig, IOTEC_AUTH_URL, IOTEC_PRODUCTION_URL, IOTEC_SANDBOX_URL};
pub use yo::{YoConfig, YO_PRODUCTION_URL, YO_SANDBOX_URL};

use serde::Deserialize;

use crate::domain::GatewayName;

/// Root configuration for the payment gateway layer.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentsConfig {
    /// Provider used when callers do not name one explicitly.
    #[serde(default = "default_provider")]
    pub default_provider: GatewayName,

    /// Yo! Payments section.
    #[serde(default)]
    pub yo: YoConfig,

    /// IoTec Pay section.
    #[serde(default)]
    pub iotec: IotecConfig,
}

fn default_provider() -> GatewayName {
    GatewayName::Yo
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            yo: YoConfig::default(),
            iotec: IotecConfig::default(),
        }
    }
}

impl PaymentsConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file first when present (development), then reads
    /// `MOMO_GATEWAY`-prefixed variables into the typed sections.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MOMO_GATEWAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate the section for one provider.
    ///
    /// Called by the registry on first access so a misconfigured provider
    /// fails with a descriptive error before any transaction is attempted.
    pub fn validate_provider(&self, name: GatewayName) -> Result<(), ValidationError> {
        match name {
            GatewayName::Yo => self.yo.validate(),
            GatewayName::Iotec => self.iotec.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_provider_is_yo() {
        let config = PaymentsConfig::default();
        assert_eq!(config.default_provider, GatewayName::Yo);
    }

    #[test]
    fn provider_sections_validate_independently() {
        let config = PaymentsConfig {
            yo: YoConfig {
                enabled: true,
                api_username: "100200".to_string(),
                api_password: "pw".to_string(),
                ..Default::default()
            },
            // IoTec left unconfigured on purpose.
            ..Default::default()
        };

        assert!(config.validate_provider(GatewayName::Yo).is_ok());
        assert!(config.validate_provider(GatewayName::Iotec).is_err());
    }
}
