//! Adapters - Provider implementations of the gateway port.
//!
//! - `yo` - Yo! Payments (XML envelope, RSA-signed IPNs, deposit-only)
//! - `iotec` - IoTec Pay (JSON, unauthenticated webhooks, full capability)
//! - `mock_gateway` - configurable in-memory implementation for tests

pub mod iotec;
mod mock_gateway;
pub mod yo;

pub use iotec::IotecGateway;
pub use mock_gateway::MockGateway;
pub use yo::YoGateway;
