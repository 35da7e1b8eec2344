//! Application bootstrap for zonesync.
//!
//! Provides `AppState` (service container) and `AppStateBuilder` (adapter injection).
//! Host processes pick a `RecordStore` (for example [`adapters::SqliteStore`]) and get a
//! ready `SyncEngine` and `Reconciler` sharing one `ServiceContext`.

pub mod adapters;

use std::sync::Arc;

use zonesync_core::error::{CoreError, CoreResult};
use zonesync_core::services::{Reconciler, ServiceContext, SyncEngine};
use zonesync_core::traits::{InMemoryProviderRegistry, ProviderRegistry, RecordStore};

/// Application state.
///
/// Holds the engine, the reconciler and the `ServiceContext` they share, so that both
/// serialize on the same per-domain locks.
pub struct AppState {
    /// Service context (record store and provider registry)
    pub ctx: Arc<ServiceContext>,
    /// Dual-write zone/record engine
    pub sync_engine: SyncEngine,
    /// Drift reconciler
    pub reconciler: Reconciler,
}

/// Builder for constructing `AppState` with host-specific adapters.
///
/// # Required adapters
/// - `record_store`: where zones and records are persisted
///
/// # Optional
/// - `provider_registry`: defaults to `InMemoryProviderRegistry` with the built-in providers
/// - `reconcile_concurrency`: zones reconciled at a time, defaults to 1
pub struct AppStateBuilder {
    record_store: Option<Arc<dyn RecordStore>>,
    provider_registry: Option<Arc<dyn ProviderRegistry>>,
    reconcile_concurrency: Option<usize>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            record_store: None,
            provider_registry: None,
            reconcile_concurrency: None,
        }
    }

    #[must_use]
    pub fn record_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.record_store = Some(store);
        self
    }

    #[must_use]
    pub fn provider_registry(mut self, registry: Arc<dyn ProviderRegistry>) -> Self {
        self.provider_registry = Some(registry);
        self
    }

    #[must_use]
    pub fn reconcile_concurrency(mut self, n: usize) -> Self {
        self.reconcile_concurrency = Some(n);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<AppState> {
        let record_store = self
            .record_store
            .ok_or_else(|| CoreError::ValidationError("record_store is required".to_string()))?;
        let provider_registry = self
            .provider_registry
            .unwrap_or_else(|| Arc::new(InMemoryProviderRegistry::with_builtin_providers()));

        let ctx = Arc::new(ServiceContext::new(record_store, provider_registry));

        let sync_engine = SyncEngine::new(Arc::clone(&ctx));
        let mut reconciler = Reconciler::new(Arc::clone(&ctx));
        if let Some(n) = self.reconcile_concurrency {
            reconciler = reconciler.with_concurrency(n);
        }

        log::debug!("AppState built");
        Ok(AppState {
            ctx,
            sync_engine,
            reconciler,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
