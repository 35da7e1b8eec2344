//! In-memory DnsProvider trait 实现

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::common::{normalize_domain_name, normalize_host};
use crate::traits::DnsProvider;
use crate::types::{
    ProviderFeatures, RecordAddressing, RecordKey, RecordSpec, RemoteRecordRef, RemoteZoneRef,
    SnapshotRecord, ZoneSnapshot,
};

use super::{InMemoryProvider, MemoryZone};

impl InMemoryProvider {
    fn issues_ids(&self) -> bool {
        self.features.addressing == RecordAddressing::Identifier
    }

    fn new_id(&self) -> Option<String> {
        self.issues_ids().then(|| uuid::Uuid::new_v4().to_string())
    }

    fn domain_not_found(&self, domain: &str) -> ProviderError {
        ProviderError::DomainNotFound {
            provider: self.name.clone(),
            domain: domain.to_string(),
            raw_message: None,
        }
    }

    fn record_not_found(&self, key: &RecordKey) -> ProviderError {
        ProviderError::RecordNotFound {
            provider: self.name.clone(),
            record: key.describe(),
            raw_message: None,
        }
    }

    /// 定位记录：有 ID 时按 ID，否则按 host + type（可选按当前值缩小范围）
    fn locate(&self, zone: &MemoryZone, key: &RecordKey, value: Option<&str>) -> Option<usize> {
        if self.issues_ids() {
            if let Some(id) = key.remote_id.as_deref() {
                return zone
                    .records
                    .iter()
                    .position(|r| r.remote_id.as_deref() == Some(id));
            }
        }

        let host = normalize_host(&key.host);
        zone.records.iter().position(|r| {
            r.host == host
                && r.record_type == key.record_type
                && value.is_none_or(|v| r.values.iter().any(|rv| rv == v))
        })
    }

    /// `RecordExists` if a record other than `skip` already has this host, type and values.
    fn ensure_unique(
        &self,
        zone: &MemoryZone,
        host: &str,
        spec: &RecordSpec,
        skip: Option<usize>,
    ) -> Result<()> {
        let duplicate = zone.records.iter().enumerate().any(|(i, r)| {
            Some(i) != skip
                && r.host == host
                && r.record_type == spec.record_type
                && r.values == spec.values
        });
        if duplicate {
            return Err(ProviderError::RecordExists {
                provider: self.name.clone(),
                record_name: format!("{host} {}", spec.record_type),
                raw_message: None,
            });
        }
        Ok(())
    }
}

fn sort_records(records: &mut [SnapshotRecord]) {
    records.sort_by(|a, b| {
        (&a.host, a.record_type, &a.values, a.priority)
            .cmp(&(&b.host, b.record_type, &b.values, b.priority))
    });
}

#[async_trait]
impl DnsProvider for InMemoryProvider {
    fn id(&self) -> &str {
        &self.name
    }

    fn features(&self) -> ProviderFeatures {
        self.features
    }

    async fn create_zone(&self, domain: &str) -> Result<RemoteZoneRef> {
        let name = normalize_domain_name(domain);
        if name.is_empty() {
            return Err(ProviderError::InvalidParameter {
                provider: self.name.clone(),
                param: "domain".to_string(),
                detail: "Domain name cannot be empty".to_string(),
            });
        }

        let mut zones = self.zones.write().await;
        if zones.contains_key(&name) {
            return Err(ProviderError::DomainExists {
                provider: self.name.clone(),
                domain: name,
                raw_message: None,
            });
        }

        let remote_id = self.new_id();
        zones.insert(
            name.clone(),
            MemoryZone {
                remote_id: remote_id.clone(),
                records: Vec::new(),
            },
        );
        log::debug!("[{}] zone '{name}' created", self.name);

        Ok(RemoteZoneRef { name, remote_id })
    }

    async fn get_zone(&self, domain: &str) -> Result<ZoneSnapshot> {
        let name = normalize_domain_name(domain);
        let zones = self.zones.read().await;
        let zone = zones.get(&name).ok_or_else(|| self.domain_not_found(domain))?;

        let mut records = zone.records.clone();
        sort_records(&mut records);

        Ok(ZoneSnapshot {
            name,
            remote_id: zone.remote_id.clone(),
            records,
        })
    }

    async fn delete_zone(&self, domain: &str) -> Result<()> {
        let name = normalize_domain_name(domain);
        match self.zones.write().await.remove(&name) {
            Some(_) => {
                log::debug!("[{}] zone '{name}' deleted", self.name);
                Ok(())
            }
            None => Err(self.domain_not_found(domain)),
        }
    }

    async fn create_record(&self, domain: &str, spec: &RecordSpec) -> Result<RemoteRecordRef> {
        spec.validate(&self.name)?;

        let mut zones = self.zones.write().await;
        let zone = zones
            .get_mut(&normalize_domain_name(domain))
            .ok_or_else(|| self.domain_not_found(domain))?;

        let host = normalize_host(&spec.host);
        self.ensure_unique(zone, &host, spec, None)?;

        let remote_id = self.new_id();
        zone.records.push(SnapshotRecord {
            host,
            record_type: spec.record_type,
            ttl: spec.ttl,
            values: spec.values.clone(),
            priority: spec.priority,
            remote_id: remote_id.clone(),
        });

        Ok(RemoteRecordRef { remote_id })
    }

    async fn update_record(
        &self,
        domain: &str,
        key: &RecordKey,
        spec: &RecordSpec,
    ) -> Result<RemoteRecordRef> {
        spec.validate(&self.name)?;

        let mut zones = self.zones.write().await;
        let zone = zones
            .get_mut(&normalize_domain_name(domain))
            .ok_or_else(|| self.domain_not_found(domain))?;

        let index = self
            .locate(zone, key, key.current_value.as_deref())
            .ok_or_else(|| self.record_not_found(key))?;

        let host = normalize_host(&spec.host);
        self.ensure_unique(zone, &host, spec, Some(index))?;

        let record = &mut zone.records[index];
        record.host = host;
        record.record_type = spec.record_type;
        record.ttl = spec.ttl;
        record.values.clone_from(&spec.values);
        record.priority = spec.priority;

        Ok(RemoteRecordRef {
            remote_id: record.remote_id.clone(),
        })
    }

    async fn delete_record(&self, domain: &str, key: &RecordKey, value: &str) -> Result<()> {
        let mut zones = self.zones.write().await;
        let zone = zones
            .get_mut(&normalize_domain_name(domain))
            .ok_or_else(|| self.domain_not_found(domain))?;

        let index = self
            .locate(zone, key, Some(value))
            .ok_or_else(|| self.record_not_found(key))?;
        zone.records.remove(index);

        Ok(())
    }
}
