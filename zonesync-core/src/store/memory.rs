use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use zonesync_provider::{DnsRecordType, ZoneSnapshot};

use crate::error::CoreResult;
use crate::traits::RecordStore;
use crate::types::{NewRecord, NewZone, Record, RecordChanges, Zone};

#[derive(Default)]
struct State {
    zones: BTreeMap<i64, Zone>,
    records: BTreeMap<i64, Record>,
    last_zone_id: i64,
    last_record_id: i64,
}

impl State {
    fn zone_id(&self, domain_name: &str) -> Option<i64> {
        self.zones
            .values()
            .find(|z| z.domain_name == domain_name)
            .map(|z| z.id)
    }
}

/// 内存 `RecordStore`
///
/// Same semantics as the SQL adapter: unique zone names, cascading zone deletes and
/// ids assigned in insertion order. State is lost when dropped.
#[derive(Default)]
pub struct InMemoryRecordStore {
    state: RwLock<State>,
}

impl InMemoryRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of record rows across all zones.
    pub async fn record_count(&self) -> usize {
        self.state.read().await.records.len()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn upsert_zone(&self, zone: &NewZone) -> CoreResult<Zone> {
        let mut state = self.state.write().await;
        let now = Utc::now();

        if let Some(id) = state.zone_id(&zone.domain_name) {
            if let Some(existing) = state.zones.get_mut(&id) {
                existing.provider_config = zone.provider_config.clone();
                existing.remote_zone_id.clone_from(&zone.remote_zone_id);
                existing.updated_at = now;
                return Ok(existing.clone());
            }
        }

        state.last_zone_id += 1;
        let stored = Zone {
            id: state.last_zone_id,
            client_id: zone.client_id,
            domain_name: zone.domain_name.clone(),
            provider_config: zone.provider_config.clone(),
            remote_zone_id: zone.remote_zone_id.clone(),
            snapshot: None,
            created_at: now,
            updated_at: now,
        };
        state.zones.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete_zone(&self, domain_name: &str) -> CoreResult<bool> {
        let mut state = self.state.write().await;
        let Some(id) = state.zone_id(domain_name) else {
            return Ok(false);
        };
        state.zones.remove(&id);
        state.records.retain(|_, r| r.zone_id != id);
        Ok(true)
    }

    async fn find_zone_by_name(&self, domain_name: &str) -> CoreResult<Option<Zone>> {
        let state = self.state.read().await;
        Ok(state
            .zone_id(domain_name)
            .and_then(|id| state.zones.get(&id).cloned()))
    }

    async fn list_zones(&self) -> CoreResult<Vec<Zone>> {
        Ok(self.state.read().await.zones.values().cloned().collect())
    }

    async fn update_zone_snapshot(
        &self,
        zone_id: i64,
        snapshot: &ZoneSnapshot,
        remote_zone_id: Option<String>,
    ) -> CoreResult<bool> {
        let mut state = self.state.write().await;
        let Some(zone) = state.zones.get_mut(&zone_id) else {
            return Ok(false);
        };
        zone.snapshot = Some(snapshot.clone());
        zone.remote_zone_id = remote_zone_id;
        zone.updated_at = Utc::now();
        Ok(true)
    }

    async fn insert_record(&self, record: &NewRecord) -> CoreResult<Record> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        state.last_record_id += 1;
        let stored = Record {
            id: state.last_record_id,
            zone_id: record.zone_id,
            remote_record_id: record.remote_record_id.clone(),
            record_type: record.record_type,
            host: record.host.clone(),
            value: record.value.clone(),
            ttl: record.ttl,
            priority: record.priority,
            created_at: now,
            updated_at: now,
        };
        state.records.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_record(&self, zone_id: i64, record_id: i64) -> CoreResult<Option<Record>> {
        Ok(self
            .state
            .read()
            .await
            .records
            .get(&record_id)
            .filter(|r| r.zone_id == zone_id)
            .cloned())
    }

    async fn list_records(&self, zone_id: i64) -> CoreResult<Vec<Record>> {
        Ok(self
            .state
            .read()
            .await
            .records
            .values()
            .filter(|r| r.zone_id == zone_id)
            .cloned()
            .collect())
    }

    async fn update_record(
        &self,
        zone_id: i64,
        record_id: i64,
        changes: &RecordChanges,
    ) -> CoreResult<bool> {
        let mut state = self.state.write().await;
        match state.records.get_mut(&record_id) {
            Some(record) if record.zone_id == zone_id => {
                record.record_type = changes.record_type;
                record.host.clone_from(&changes.host);
                record.value.clone_from(&changes.value);
                record.ttl = changes.ttl;
                record.priority = changes.priority;
                record.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_record(&self, zone_id: i64, record_id: i64) -> CoreResult<bool> {
        let mut state = self.state.write().await;
        if state
            .records
            .get(&record_id)
            .is_some_and(|r| r.zone_id == zone_id)
        {
            state.records.remove(&record_id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn find_record_remote_id(
        &self,
        domain_name: &str,
        record_type: DnsRecordType,
        host: &str,
    ) -> CoreResult<Option<String>> {
        let state = self.state.read().await;
        let Some(zone_id) = state.zone_id(domain_name) else {
            return Ok(None);
        };
        Ok(state
            .records
            .values()
            .find(|r| r.zone_id == zone_id && r.record_type == record_type && r.host == host)
            .and_then(|r| r.remote_record_id.clone()))
    }

    async fn save_record_remote_id(
        &self,
        domain_name: &str,
        remote_id: &str,
        record_type: DnsRecordType,
        host: &str,
        value: &str,
    ) -> CoreResult<u64> {
        let mut state = self.state.write().await;
        let Some(zone_id) = state.zone_id(domain_name) else {
            return Ok(0);
        };
        let mut updated = 0;
        for record in state.records.values_mut().filter(|r| {
            r.zone_id == zone_id && r.record_type == record_type && r.host == host && r.value == value
        }) {
            record.remote_record_id = Some(remote_id.to_string());
            updated += 1;
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonesync_provider::ProviderConfig;

    fn new_zone(name: &str, provider: &str) -> NewZone {
        NewZone {
            client_id: 1,
            domain_name: name.to_string(),
            provider_config: ProviderConfig::new(provider),
            remote_zone_id: None,
        }
    }

    fn new_record(zone_id: i64, host: &str, value: &str) -> NewRecord {
        NewRecord {
            zone_id,
            remote_record_id: None,
            record_type: DnsRecordType::A,
            host: host.to_string(),
            value: value.to_string(),
            ttl: 300,
            priority: None,
        }
    }

    #[tokio::test]
    async fn upsert_keeps_one_row_per_name() {
        let store = InMemoryRecordStore::new();
        let first = store.upsert_zone(&new_zone("example.com", "a")).await.unwrap();
        let second = store.upsert_zone(&new_zone("example.com", "b")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.provider_id(), "b");
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(store.list_zones().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_zone_cascades() {
        let store = InMemoryRecordStore::new();
        let zone = store.upsert_zone(&new_zone("example.com", "a")).await.unwrap();
        let other = store.upsert_zone(&new_zone("example.org", "a")).await.unwrap();
        for i in 0..3 {
            store
                .insert_record(&new_record(zone.id, "www", &format!("10.0.0.{i}")))
                .await
                .unwrap();
        }
        store.insert_record(&new_record(other.id, "www", "10.0.1.1")).await.unwrap();

        assert!(store.delete_zone("example.com").await.unwrap());
        assert!(store.list_records(zone.id).await.unwrap().is_empty());
        assert_eq!(store.record_count().await, 1);
        assert!(!store.delete_zone("example.com").await.unwrap());
    }

    #[tokio::test]
    async fn record_lookups_are_zone_scoped() {
        let store = InMemoryRecordStore::new();
        let zone = store.upsert_zone(&new_zone("example.com", "a")).await.unwrap();
        let other = store.upsert_zone(&new_zone("example.org", "a")).await.unwrap();
        let record = store.insert_record(&new_record(zone.id, "www", "10.0.0.1")).await.unwrap();

        assert!(store.find_record(other.id, record.id).await.unwrap().is_none());
        assert!(!store.delete_record(other.id, record.id).await.unwrap());
        assert!(store.delete_record(zone.id, record.id).await.unwrap());
    }

    #[tokio::test]
    async fn remote_id_helpers() {
        let store = InMemoryRecordStore::new();
        let zone = store.upsert_zone(&new_zone("example.com", "a")).await.unwrap();
        store.insert_record(&new_record(zone.id, "www", "10.0.0.1")).await.unwrap();
        store.insert_record(&new_record(zone.id, "www", "10.0.0.2")).await.unwrap();

        let n = store
            .save_record_remote_id("example.com", "rid-2", DnsRecordType::A, "www", "10.0.0.2")
            .await
            .unwrap();
        assert_eq!(n, 1);

        // first match wins and the first row has no id yet
        let found = store
            .find_record_remote_id("example.com", DnsRecordType::A, "www")
            .await
            .unwrap();
        assert_eq!(found, None);

        store
            .save_record_remote_id("example.com", "rid-1", DnsRecordType::A, "www", "10.0.0.1")
            .await
            .unwrap();
        let found = store
            .find_record_remote_id("example.com", DnsRecordType::A, "www")
            .await
            .unwrap();
        assert_eq!(found.as_deref(), Some("rid-1"));
    }
}
