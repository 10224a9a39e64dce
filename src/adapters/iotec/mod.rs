//! IoTec Pay adapter.
//!
//! IoTec speaks JSON over HTTPS with OAuth client-credentials auth,
//! expects international-format phone numbers, and supports collections,
//! disbursements, status lookups and wallet balances. Its webhooks carry
//! no signature; see the adapter docs for the implications.

mod adapter;
pub mod msisdn;
pub mod types;

pub use adapter::IotecGateway;
