//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use zonesync_provider::{
    DnsProvider, DnsRecordType, MxEncoding, ProviderConfig, ProviderError, ProviderFeatures,
    RecordKey, RecordSpec, RemoteRecordRef, RemoteZoneRef, SharedProviderFactory,
    ZoneSnapshot,
};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::store::InMemoryRecordStore;
use crate::traits::{InMemoryProviderRegistry, ProviderRegistry, RecordStore};
use crate::types::{NewRecord, NewZone, Record, RecordChanges, Zone};

// ===== StubProvider =====

/// One call received by [`StubProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    CreateZone(String),
    GetZone(String),
    DeleteZone(String),
    CreateRecord(String, RecordSpec),
    UpdateRecord(String, RecordKey, RecordSpec),
    DeleteRecord(String, RecordKey, String),
}

/// Provider that records every call and succeeds unless told otherwise.
///
/// `get_zone` answers from snapshots set with [`StubProvider::set_snapshot`] and reports
/// `DomainNotFound` for everything else.
pub struct StubProvider {
    calls: Mutex<Vec<ProviderCall>>,
    /// 如果 Some，所有调用返回此错误
    failure: Mutex<Option<ProviderError>>,
    features: Mutex<ProviderFeatures>,
    zone_id: Mutex<Option<String>>,
    record_id: Mutex<Option<String>>,
    snapshots: Mutex<HashMap<String, ZoneSnapshot>>,
}

impl StubProvider {
    pub const NAME: &'static str = "Stub";

    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            features: Mutex::new(ProviderFeatures::default()),
            zone_id: Mutex::new(None),
            record_id: Mutex::new(None),
            snapshots: Mutex::new(HashMap::new()),
        }
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn fail_with(&self, err: Option<ProviderError>) {
        *self.failure.lock().unwrap() = err;
    }

    pub fn set_mx_encoding(&self, encoding: MxEncoding) {
        self.features.lock().unwrap().mx_encoding = encoding;
    }

    /// Zone id returned by `create_zone`.
    pub fn set_zone_id(&self, id: Option<String>) {
        *self.zone_id.lock().unwrap() = id;
    }

    /// Record id returned by `create_record` and `update_record`.
    pub fn set_record_id(&self, id: Option<String>) {
        *self.record_id.lock().unwrap() = id;
    }

    pub fn set_snapshot(&self, domain: &str, snapshot: ZoneSnapshot) {
        self.snapshots
            .lock()
            .unwrap()
            .insert(domain.to_string(), snapshot);
    }

    fn record(&self, call: ProviderCall) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DnsProvider for StubProvider {
    fn id(&self) -> &str {
        Self::NAME
    }

    fn features(&self) -> ProviderFeatures {
        *self.features.lock().unwrap()
    }

    async fn create_zone(&self, domain: &str) -> Result<RemoteZoneRef, ProviderError> {
        self.record(ProviderCall::CreateZone(domain.to_string()))?;
        Ok(RemoteZoneRef {
            name: domain.to_string(),
            remote_id: self.zone_id.lock().unwrap().clone(),
        })
    }

    async fn get_zone(&self, domain: &str) -> Result<ZoneSnapshot, ProviderError> {
        self.record(ProviderCall::GetZone(domain.to_string()))?;
        self.snapshots
            .lock()
            .unwrap()
            .get(domain)
            .cloned()
            .ok_or_else(|| ProviderError::DomainNotFound {
                provider: Self::NAME.to_string(),
                domain: domain.to_string(),
                raw_message: None,
            })
    }

    async fn delete_zone(&self, domain: &str) -> Result<(), ProviderError> {
        self.record(ProviderCall::DeleteZone(domain.to_string()))
    }

    async fn create_record(
        &self,
        domain: &str,
        spec: &RecordSpec,
    ) -> Result<RemoteRecordRef, ProviderError> {
        self.record(ProviderCall::CreateRecord(domain.to_string(), spec.clone()))?;
        Ok(RemoteRecordRef {
            remote_id: self.record_id.lock().unwrap().clone(),
        })
    }

    async fn update_record(
        &self,
        domain: &str,
        key: &RecordKey,
        spec: &RecordSpec,
    ) -> Result<RemoteRecordRef, ProviderError> {
        self.record(ProviderCall::UpdateRecord(
            domain.to_string(),
            key.clone(),
            spec.clone(),
        ))?;
        Ok(RemoteRecordRef {
            remote_id: self.record_id.lock().unwrap().clone(),
        })
    }

    async fn delete_record(
        &self,
        domain: &str,
        key: &RecordKey,
        value: &str,
    ) -> Result<(), ProviderError> {
        self.record(ProviderCall::DeleteRecord(
            domain.to_string(),
            key.clone(),
            value.to_string(),
        ))
    }
}

// ===== FaultyRecordStore =====

/// `InMemoryRecordStore` whose writes can be made to fail.
pub struct FaultyRecordStore {
    inner: InMemoryRecordStore,
    fail_writes: AtomicBool,
    /// `update_record` reports no matching row without touching it
    lose_updates: AtomicBool,
}

impl FaultyRecordStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryRecordStore::new(),
            fail_writes: AtomicBool::new(false),
            lose_updates: AtomicBool::new(false),
        }
    }

    pub fn inner(&self) -> &InMemoryRecordStore {
        &self.inner
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn lose_updates(&self, lose: bool) {
        self.lose_updates.store(lose, Ordering::SeqCst);
    }

    fn check_write(&self) -> CoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::StorageError("injected write failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FaultyRecordStore {
    async fn upsert_zone(&self, zone: &NewZone) -> CoreResult<Zone> {
        self.check_write()?;
        self.inner.upsert_zone(zone).await
    }

    async fn delete_zone(&self, domain_name: &str) -> CoreResult<bool> {
        self.check_write()?;
        self.inner.delete_zone(domain_name).await
    }

    async fn find_zone_by_name(&self, domain_name: &str) -> CoreResult<Option<Zone>> {
        self.inner.find_zone_by_name(domain_name).await
    }

    async fn list_zones(&self) -> CoreResult<Vec<Zone>> {
        self.inner.list_zones().await
    }

    async fn update_zone_snapshot(
        &self,
        zone_id: i64,
        snapshot: &ZoneSnapshot,
        remote_zone_id: Option<String>,
    ) -> CoreResult<bool> {
        self.check_write()?;
        self.inner
            .update_zone_snapshot(zone_id, snapshot, remote_zone_id)
            .await
    }

    async fn insert_record(&self, record: &NewRecord) -> CoreResult<Record> {
        self.check_write()?;
        self.inner.insert_record(record).await
    }

    async fn find_record(&self, zone_id: i64, record_id: i64) -> CoreResult<Option<Record>> {
        self.inner.find_record(zone_id, record_id).await
    }

    async fn list_records(&self, zone_id: i64) -> CoreResult<Vec<Record>> {
        self.inner.list_records(zone_id).await
    }

    async fn update_record(
        &self,
        zone_id: i64,
        record_id: i64,
        changes: &RecordChanges,
    ) -> CoreResult<bool> {
        self.check_write()?;
        if self.lose_updates.load(Ordering::SeqCst) {
            return Ok(false);
        }
        self.inner.update_record(zone_id, record_id, changes).await
    }

    async fn delete_record(&self, zone_id: i64, record_id: i64) -> CoreResult<bool> {
        self.check_write()?;
        self.inner.delete_record(zone_id, record_id).await
    }

    async fn find_record_remote_id(
        &self,
        domain_name: &str,
        record_type: DnsRecordType,
        host: &str,
    ) -> CoreResult<Option<String>> {
        self.inner
            .find_record_remote_id(domain_name, record_type, host)
            .await
    }

    async fn save_record_remote_id(
        &self,
        domain_name: &str,
        remote_id: &str,
        record_type: DnsRecordType,
        host: &str,
        value: &str,
    ) -> CoreResult<u64> {
        self.check_write()?;
        self.inner
            .save_record_remote_id(domain_name, remote_id, record_type, host, value)
            .await
    }
}

// ===== 工厂方法 =====

/// Configuration selecting [`StubProvider`].
pub fn stub_config() -> ProviderConfig {
    ProviderConfig::new(StubProvider::NAME).with_apikey("test-token-12345")
}

/// 创建测试用 `ServiceContext`
///
/// The registry holds the built-in providers plus a shared [`StubProvider`] under `Stub`.
pub async fn create_test_context() -> (
    Arc<ServiceContext>,
    Arc<StubProvider>,
    Arc<FaultyRecordStore>,
) {
    let provider = Arc::new(StubProvider::new());
    let store = Arc::new(FaultyRecordStore::new());
    let registry = Arc::new(InMemoryProviderRegistry::with_builtin_providers());
    registry
        .register(
            StubProvider::NAME.to_string(),
            Arc::new(SharedProviderFactory::new(provider.clone())),
        )
        .await;

    let ctx = Arc::new(ServiceContext::new(store.clone(), registry));
    (ctx, provider, store)
}
