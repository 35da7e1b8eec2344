//! Provider registry abstract Trait

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use zonesync_provider::{builtin_factories, DnsProvider, ProviderConfig, ProviderFactory};

use crate::error::{CoreError, CoreResult};

/// Provider Registry Trait
///
/// Maps a provider name to the factory that builds configured clients. Names match
/// exactly. Provides a default memory implementation of `InMemoryProviderRegistry`.
#[async_trait]
pub trait ProviderRegistry: Send + Sync {
    /// Register a factory, replacing any previous one under the same name.
    ///
    /// # Arguments
    /// * `name` - value of `ProviderConfig::provider` that selects this factory
    /// * `factory` - Provider factory
    async fn register(&self, name: String, factory: Arc<dyn ProviderFactory>);

    /// Remove a factory.
    async fn unregister(&self, name: &str);

    /// Build the client selected by `config.provider`.
    ///
    /// Fails with `UnknownProvider` when no factory is registered under that name and
    /// `ProviderConfig` when the factory rejects the configuration.
    async fn resolve(&self, config: &ProviderConfig) -> CoreResult<Arc<dyn DnsProvider>>;

    /// Registered names, sorted.
    async fn list_providers(&self) -> Vec<String>;
}

/// In-memory Provider registry
///
/// Default implementation, available on all platforms.
#[derive(Clone)]
pub struct InMemoryProviderRegistry {
    factories: Arc<RwLock<HashMap<String, Arc<dyn ProviderFactory>>>>,
}

impl InMemoryProviderRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registry pre-filled with every provider enabled through feature flags.
    #[must_use]
    pub fn with_builtin_providers() -> Self {
        let factories = builtin_factories()
            .into_iter()
            .map(|(name, factory)| (name.to_string(), factory))
            .collect();
        Self {
            factories: Arc::new(RwLock::new(factories)),
        }
    }
}

impl Default for InMemoryProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderRegistry for InMemoryProviderRegistry {
    async fn register(&self, name: String, factory: Arc<dyn ProviderFactory>) {
        log::debug!("Registering provider factory '{name}'");
        self.factories.write().await.insert(name, factory);
    }

    async fn unregister(&self, name: &str) {
        self.factories.write().await.remove(name);
    }

    async fn resolve(&self, config: &ProviderConfig) -> CoreResult<Arc<dyn DnsProvider>> {
        let factory = self
            .factories
            .read()
            .await
            .get(&config.provider)
            .cloned()
            .ok_or_else(|| CoreError::UnknownProvider(config.provider.clone()))?;

        factory.create(config).map_err(CoreError::ProviderConfig)
    }

    async fn list_providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}
