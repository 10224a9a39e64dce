//! Yo! Payments adapter.
//!
//! Yo! speaks an XML `AutoCreate` envelope over HTTPS, reports status in
//! three partially-overlapping fields, expects national-format phone
//! numbers and signs its instant payment notifications with RSA/SHA-1.
//! This adapter is wired deposit-only: disbursements and balance queries
//! fail fast as unsupported.

mod adapter;
pub mod envelope;
pub mod ipn;
pub mod msisdn;
pub mod status;
mod transport;

pub use adapter::YoGateway;
pub use transport::{HttpTransport, YoTransport, REQUEST_TIMEOUT};
