//! Provider factories.

use std::sync::Arc;

use crate::error::Result;
use crate::traits::DnsProvider;
use crate::types::ProviderConfig;

#[cfg(feature = "memory")]
use crate::providers::{InMemoryProvider, InMemoryProviderFactory};

/// Constructs a configured [`DnsProvider`] from a [`ProviderConfig`].
///
/// Registries map a provider name to one factory; adding a provider means registering a
/// factory, never branching inside the caller. Any `Fn(&ProviderConfig) -> Result<Arc<dyn
/// DnsProvider>>` closure is a factory.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use zonesync_provider::{DnsProvider, InMemoryProvider, ProviderConfig, ProviderFactory};
///
/// let factory = |config: &ProviderConfig| -> zonesync_provider::Result<Arc<dyn DnsProvider>> {
///     Ok(Arc::new(InMemoryProvider::from_config(config)?))
/// };
/// let provider = factory.create(&ProviderConfig::new("Stub")).unwrap();
/// assert_eq!(provider.id(), "Stub");
/// ```
pub trait ProviderFactory: Send + Sync {
    /// Build a provider for `config`.
    fn create(&self, config: &ProviderConfig) -> Result<Arc<dyn DnsProvider>>;
}

impl<F> ProviderFactory for F
where
    F: Fn(&ProviderConfig) -> Result<Arc<dyn DnsProvider>> + Send + Sync,
{
    fn create(&self, config: &ProviderConfig) -> Result<Arc<dyn DnsProvider>> {
        self(config)
    }
}

/// Factory that hands out one pre-built provider instance for every configuration.
///
/// Useful when the host process already owns a configured client, and in tests where
/// remote state must survive across operations.
pub struct SharedProviderFactory {
    provider: Arc<dyn DnsProvider>,
}

impl SharedProviderFactory {
    pub fn new(provider: Arc<dyn DnsProvider>) -> Self {
        Self { provider }
    }
}

impl ProviderFactory for SharedProviderFactory {
    fn create(&self, _config: &ProviderConfig) -> Result<Arc<dyn DnsProvider>> {
        Ok(Arc::clone(&self.provider))
    }
}

/// Returns the factories for all providers enabled via feature flags, keyed by name.
pub fn builtin_factories() -> Vec<(&'static str, Arc<dyn ProviderFactory>)> {
    vec![
        #[cfg(feature = "memory")]
        (
            InMemoryProvider::NAME,
            Arc::new(InMemoryProviderFactory::default()) as Arc<dyn ProviderFactory>,
        ),
    ]
}
