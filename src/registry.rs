//! Gateway registry: configured provider name to cached adapter instance.
//!
//! Adapters are constructed lazily on first lookup; construction runs the
//! provider's configuration validation, so a misconfigured provider fails
//! the first access with a descriptive error instead of failing mid-call.
//! The cache is the one piece of shared mutable state in this layer and
//! carries no business data, only object identity.
//!
//! Concurrency: lookups take a read lock; a cache miss constructs outside
//! the write lock, so two concurrent first lookups may both construct.
//! Construction is side-effect-free beyond validation, the first insert
//! wins, and both callers receive logically equivalent instances.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::adapters::{IotecGateway, YoGateway};
use crate::config::PaymentsConfig;
use crate::domain::GatewayName;
use crate::ports::{GatewayError, PaymentGateway};

/// Resolves provider names to cached gateway instances.
pub struct GatewayRegistry {
    inner: RwLock<Inner>,
}

struct Inner {
    config: PaymentsConfig,
    cache: HashMap<GatewayName, Arc<dyn PaymentGateway>>,
}

impl GatewayRegistry {
    /// Create a registry over the given configuration. No adapters are
    /// constructed until first lookup.
    pub fn new(config: PaymentsConfig) -> Self {
        Self {
            inner: RwLock::new(Inner {
                config,
                cache: HashMap::new(),
            }),
        }
    }

    /// Resolve a named provider, constructing and caching its adapter on
    /// first access.
    pub fn resolve(&self, name: GatewayName) -> Result<Arc<dyn PaymentGateway>, GatewayError> {
        if let Some(gateway) = self.inner.read().unwrap().cache.get(&name) {
            return Ok(gateway.clone());
        }

        let config = self.inner.read().unwrap().config.clone();
        let gateway = Self::construct(&config, name)?;
        tracing::debug!(provider = %name, "constructed gateway adapter");

        let mut inner = self.inner.write().unwrap();
        let entry = inner.cache.entry(name).or_insert(gateway);
        Ok(entry.clone())
    }

    /// Resolve the configured default provider.
    pub fn default_gateway(&self) -> Result<Arc<dyn PaymentGateway>, GatewayError> {
        let name = self.inner.read().unwrap().config.default_provider;
        self.resolve(name)
    }

    /// Drop all cached adapters. The next lookup re-validates
    /// configuration and constructs fresh instances.
    pub fn reset(&self) {
        self.inner.write().unwrap().cache.clear();
    }

    /// Replace the configuration and invalidate the cache, without a
    /// process restart.
    pub fn update_config(&self, config: PaymentsConfig) {
        let mut inner = self.inner.write().unwrap();
        inner.config = config;
        inner.cache.clear();
    }

    fn construct(
        config: &PaymentsConfig,
        name: GatewayName,
    ) -> Result<Arc<dyn PaymentGateway>, GatewayError> {
        let gateway: Arc<dyn PaymentGateway> = match name {
            GatewayName::Yo => Arc::new(YoGateway::new(&config.yo)?),
            GatewayName::Iotec => Arc::new(IotecGateway::new(&config.iotec)?),
        };
        Ok(gateway)
    }
}
