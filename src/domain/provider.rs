//! Gateway provider identifiers.

use serde::{Deserialize, Serialize};

/// The closed set of supported payment providers.
///
/// Adapter dispatch is over this enum rather than free-form strings so an
/// unknown provider is a parse error at the edge, not a runtime surprise
/// mid-transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayName {
    /// Yo! Payments (XML AutoCreate API).
    Yo,

    /// IoTec Pay (JSON API).
    Iotec,
}

impl GatewayName {
    /// All known providers, in registry iteration order.
    pub const ALL: [GatewayName; 2] = [GatewayName::Yo, GatewayName::Iotec];

    /// Canonical lowercase name used in configuration and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayName::Yo => "yo",
            GatewayName::Iotec => "iotec",
        }
    }
}

impl std::fmt::Display for GatewayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GatewayName {
    type Err = UnknownGateway;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yo" => Ok(GatewayName::Yo),
            "iotec" => Ok(GatewayName::Iotec),
            _ => Err(UnknownGateway(s.to_string())),
        }
    }
}

/// Error returned when a provider name does not match any known gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment gateway: {0}")]
pub struct UnknownGateway(pub String);
