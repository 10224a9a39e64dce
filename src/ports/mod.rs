//! Ports - Contracts between the gateway layer and its consumers.
//!
//! Following hexagonal architecture, the port defines what a payment
//! provider must offer; adapters implement it per provider.

mod payment_gateway;

pub use payment_gateway::{GatewayError, PaymentGateway, TransportErrorCode};
