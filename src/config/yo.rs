//! Yo! Payments configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Production AutoCreate endpoint.
pub const YO_PRODUCTION_URL: &str = "https://paymentsapi1.yo.co.ug/ybs/task.php";

/// Sandbox AutoCreate endpoint.
pub const YO_SANDBOX_URL: &str = "https://sandbox.yo.co.ug/services/yopaymentsdev/task.php";

/// Yo! Payments gateway configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YoConfig {
    /// Whether this provider may be resolved from the registry.
    #[serde(default)]
    pub enabled: bool,

    /// Route calls to the sandbox environment.
    #[serde(default)]
    pub use_sandbox: bool,

    /// API username issued by Yo! (a numeric account code).
    #[serde(default)]
    pub api_username: String,

    /// API password issued by Yo!.
    #[serde(default)]
    pub api_password: String,

    /// Override for the AutoCreate endpoint (testing against a local stub).
    pub api_url: Option<String>,

    /// Path to Yo!'s IPN verification public key (PEM). When absent,
    /// webhook verification degrades to always-true - acceptable only in
    /// development.
    pub public_key_path: Option<String>,
}

impl YoConfig {
    /// The AutoCreate endpoint this configuration points at.
    pub fn endpoint(&self) -> &str {
        match &self.api_url {
            Some(url) => url,
            None if self.use_sandbox => YO_SANDBOX_URL,
            None => YO_PRODUCTION_URL,
        }
    }

    /// Validate required credentials for an enabled provider.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.enabled {
            return Err(ValidationError::ProviderDisabled("yo"));
        }
        if self.api_username.is_empty() {
            return Err(ValidationError::MissingRequired(
                "MOMO_GATEWAY__YO__API_USERNAME",
            ));
        }
        if self.api_password.is_empty() {
            return Err(ValidationError::MissingRequired(
                "MOMO_GATEWAY__YO__API_PASSWORD",
            ));
        }
        if let Some(url) = &self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidApiUrl);
            }
        }
        if let Some(path) = &self.public_key_path {
            if !std::path::Path::new(path).exists() {
                return Err(ValidationError::PublicKeyFileMissing(path.clone()));
            }
        }
        Ok(())
    }
}
