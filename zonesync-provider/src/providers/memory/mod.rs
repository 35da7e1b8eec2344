//! In-memory reference DNS Provider
//!
//! Holds zones in process memory. Supports both addressing families so the sync engine
//! can be exercised against identifier-issuing and content-addressed behaviour:
//!
//! | option        | values                    | default    |
//! |---------------|---------------------------|------------|
//! | `addressing`  | `id`, `content`           | `content`  |
//! | `mx_encoding` | `separate`, `prefixed`    | `separate` |
//! | `namespace`   | any string (factory only) | `default`  |

mod provider;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::RwLock;

use crate::error::{ProviderError, Result};
use crate::factory::ProviderFactory;
use crate::traits::DnsProvider;
use crate::types::{
    MxEncoding, ProviderConfig, ProviderFeatures, RecordAddressing, SnapshotRecord,
};

/// A zone held by [`InMemoryProvider`].
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryZone {
    pub remote_id: Option<String>,
    pub records: Vec<SnapshotRecord>,
}

/// In-memory DNS Provider
pub struct InMemoryProvider {
    pub(crate) name: String,
    pub(crate) features: ProviderFeatures,
    pub(crate) zones: RwLock<BTreeMap<String, MemoryZone>>,
}

impl InMemoryProvider {
    /// Registry name of the built-in factory.
    pub const NAME: &'static str = "memory";

    /// Content-addressed provider with separate MX priority.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            features: ProviderFeatures::default(),
            zones: RwLock::new(BTreeMap::new()),
        }
    }

    #[must_use]
    pub fn with_features(mut self, features: ProviderFeatures) -> Self {
        self.features = features;
        self
    }

    /// Build from `config.provider` and the `addressing`/`mx_encoding` options.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let addressing = match config.option("addressing") {
            None | Some("content") => RecordAddressing::Content,
            Some("id") => RecordAddressing::Identifier,
            Some(other) => {
                return Err(ProviderError::InvalidParameter {
                    provider: config.provider.clone(),
                    param: "addressing".to_string(),
                    detail: format!("expected 'id' or 'content', got '{other}'"),
                });
            }
        };
        let mx_encoding = match config.option("mx_encoding") {
            None | Some("separate") => MxEncoding::SeparateField,
            Some("prefixed") => MxEncoding::PrefixedValue,
            Some(other) => {
                return Err(ProviderError::InvalidParameter {
                    provider: config.provider.clone(),
                    param: "mx_encoding".to_string(),
                    detail: format!("expected 'separate' or 'prefixed', got '{other}'"),
                });
            }
        };

        Ok(Self::new(config.provider.clone()).with_features(ProviderFeatures {
            mx_encoding,
            addressing,
        }))
    }
}

/// Factory behind the built-in `memory` provider.
///
/// Instances are cached per `(provider, namespace)` so that every operation resolved from
/// the same configuration sees the same remote state.
#[derive(Default)]
pub struct InMemoryProviderFactory {
    instances: Mutex<HashMap<(String, String), Arc<InMemoryProvider>>>,
}

impl ProviderFactory for InMemoryProviderFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Arc<dyn DnsProvider>> {
        let key = (
            config.provider.clone(),
            config.option("namespace").unwrap_or("default").to_string(),
        );
        let mut instances = self
            .instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = instances.get(&key) {
            return Ok(Arc::clone(existing) as Arc<dyn DnsProvider>);
        }

        let provider = Arc::new(InMemoryProvider::from_config(config)?);
        log::debug!(
            "[{}] created in-memory provider for namespace '{}'",
            key.0,
            key.1
        );
        instances.insert(key, Arc::clone(&provider));
        Ok(provider as Arc<dyn DnsProvider>)
    }
}
