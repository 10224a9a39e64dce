//! Momo Gateway - Unified mobile-money payment layer
//!
//! This crate provides one provider-agnostic contract (deposit, withdraw,
//! status check, balance query, webhook verification/parsing) over two
//! Ugandan mobile-money providers: Yo! Payments and IoTec Pay. Adapters
//! translate between the canonical domain model and each provider's wire
//! protocol; the registry resolves a configured provider name to a cached
//! adapter instance.
//!
//! Persistence, HTTP routing, retries and webhook deduplication are the
//! calling service's responsibility. This layer is a stateless translator.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod registry;
