//! 业务逻辑服务层

mod reconciler;
mod sync_engine;

pub use reconciler::Reconciler;
pub use sync_engine::SyncEngine;

use std::sync::Arc;

use zonesync_provider::{DnsProvider, ProviderConfig};

use crate::error::CoreResult;
use crate::traits::{ProviderRegistry, RecordStore};
use crate::utils::DomainLocks;

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储实现。Engine and reconciler built from the
/// same context share its domain locks.
pub struct ServiceContext {
    /// 本地存储
    pub record_store: Arc<dyn RecordStore>,
    /// Provider 注册表
    pub provider_registry: Arc<dyn ProviderRegistry>,
    domain_locks: DomainLocks,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        record_store: Arc<dyn RecordStore>,
        provider_registry: Arc<dyn ProviderRegistry>,
    ) -> Self {
        Self {
            record_store,
            provider_registry,
            domain_locks: DomainLocks::new(),
        }
    }

    /// 获取 Provider 实例
    pub async fn resolve_provider(&self, config: &ProviderConfig) -> CoreResult<Arc<dyn DnsProvider>> {
        self.provider_registry.resolve(config).await
    }

    pub fn domain_locks(&self) -> &DomainLocks {
        &self.domain_locks
    }
}
