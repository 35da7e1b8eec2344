//! Dual-write synchronization engine
//!
//! Every mutation is applied to the remote provider first and persisted locally only after
//! the provider accepted it. A remote failure leaves the store untouched; a local failure
//! after remote success surfaces as [`CoreError::Persistence`] and is healed by the
//! reconciler.

use std::sync::Arc;

use zonesync_provider::{
    normalize_host, DnsProvider, DnsRecordType, ProviderConfig, ProviderFeatures, RecordKey,
    RecordSpec,
};

use crate::error::{CoreError, CoreResult, SyncOperation};
use crate::services::ServiceContext;
use crate::types::{
    AddRecordRequest, DeleteRecordRequest, NewRecord, NewZone, Record, RecordChanges,
    UpdateRecordRequest, Zone,
};
use crate::utils::domain::validate_domain_name;

/// Zone/record 同步服务
pub struct SyncEngine {
    ctx: Arc<ServiceContext>,
}

impl SyncEngine {
    /// 创建同步服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 创建 zone
    ///
    /// Creates the zone at the provider named by `config.provider`, then upserts the local
    /// row keyed by domain name. Calling it again for the same name keeps one row and
    /// stores the latest config.
    pub async fn create_zone(
        &self,
        config: &ProviderConfig,
        domain_name: &str,
        client_id: i64,
    ) -> CoreResult<Zone> {
        const OP: SyncOperation = SyncOperation::CreateZone;

        let domain = validate_domain_name(domain_name)?;
        let _guard = self.ctx.domain_locks().acquire(&domain).await;

        let provider = self.ctx.resolve_provider(config).await?;
        let remote = provider
            .create_zone(&domain)
            .await
            .map_err(|e| remote_failure(OP, &domain, e))?;

        let zone = self
            .ctx
            .record_store
            .upsert_zone(&NewZone {
                client_id,
                domain_name: domain.clone(),
                provider_config: config.clone(),
                remote_zone_id: remote.remote_id,
            })
            .await
            .map_err(|e| local_failure(OP, &domain, &e))?;

        log::info!("[{}] Zone '{domain}' created", provider.id());
        Ok(zone)
    }

    /// 删除 zone
    ///
    /// A zone the provider does not know is treated as already deleted remotely; any other
    /// provider error aborts before the store is touched. Deleting a zone that exists
    /// neither remotely nor locally succeeds.
    pub async fn delete_zone(&self, config: &ProviderConfig, domain_name: &str) -> CoreResult<()> {
        const OP: SyncOperation = SyncOperation::DeleteZone;

        let domain = validate_domain_name(domain_name)?;
        let _guard = self.ctx.domain_locks().acquire(&domain).await;

        let provider = self.ctx.resolve_provider(config).await?;
        match provider.delete_zone(&domain).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                log::warn!(
                    "[{}] Zone '{domain}' not found remotely, removing local copy: {e}",
                    provider.id()
                );
            }
            Err(e) => return Err(remote_failure(OP, &domain, e)),
        }

        let removed = self
            .ctx
            .record_store
            .delete_zone(&domain)
            .await
            .map_err(|e| local_failure(OP, &domain, &e))?;

        if removed {
            log::info!("[{}] Zone '{domain}' deleted", provider.id());
        } else {
            log::info!("[{}] Zone '{domain}' was not stored locally", provider.id());
        }
        Ok(())
    }

    /// 添加记录，返回本地记录 ID
    pub async fn add_record(&self, request: AddRecordRequest) -> CoreResult<i64> {
        const OP: SyncOperation = SyncOperation::AddRecord;

        let domain = required_domain(&request.domain_name)?;
        if request.record_value.trim().is_empty() {
            return Err(CoreError::MissingField("record_value".to_string()));
        }
        require_positive_ttl(request.record_ttl)?;

        let _guard = self.ctx.domain_locks().acquire(&domain).await;
        let zone = self.find_zone(&domain).await?;
        let provider = self.ctx.resolve_provider(&zone.provider_config).await?;

        let host = normalize_host(&request.record_name);
        let priority = priority_for(request.record_type, request.record_priority);
        let spec = wire_spec(
            provider.features(),
            request.record_type,
            &host,
            request.record_ttl,
            &request.record_value,
            priority,
        )?;

        let remote = provider
            .create_record(&domain, &spec)
            .await
            .map_err(|e| remote_failure(OP, &domain, e))?;

        let record = self
            .ctx
            .record_store
            .insert_record(&NewRecord {
                zone_id: zone.id,
                remote_record_id: remote.remote_id,
                record_type: request.record_type,
                host,
                value: request.record_value,
                ttl: request.record_ttl,
                priority,
            })
            .await
            .map_err(|e| local_failure(OP, &domain, &e))?;

        log::info!(
            "[{}] Record {} {} added to '{domain}' (id {})",
            provider.id(),
            record.host,
            record.record_type,
            record.id
        );
        Ok(record.id)
    }

    /// 更新记录
    ///
    /// The stored row is located before any remote call; fields left `None` in the request
    /// keep their stored values. The provider locates the record by the row's remote id
    /// when known and by its current content otherwise, and applies host and type changes
    /// along with the rest. Priority is dropped when the resulting type carries none.
    pub async fn update_record(&self, request: UpdateRecordRequest) -> CoreResult<()> {
        const OP: SyncOperation = SyncOperation::UpdateRecord;

        let domain = required_domain(&request.domain_name)?;
        let record_id = request
            .record_id
            .ok_or_else(|| CoreError::MissingField("record_id".to_string()))?;

        let _guard = self.ctx.domain_locks().acquire(&domain).await;
        let zone = self.find_zone(&domain).await?;
        let row = self.find_record(&zone, record_id).await?;

        let record_type = request.record_type.unwrap_or(row.record_type);
        let changes = RecordChanges {
            record_type,
            host: request
                .record_name
                .as_deref()
                .map_or_else(|| row.host.clone(), normalize_host),
            value: request.record_value.unwrap_or_else(|| row.value.clone()),
            ttl: request.record_ttl.unwrap_or(row.ttl),
            priority: priority_for(record_type, request.record_priority.or(row.priority)),
        };
        if changes.value.trim().is_empty() {
            return Err(CoreError::MissingField("record_value".to_string()));
        }
        require_positive_ttl(changes.ttl)?;

        let provider = self.ctx.resolve_provider(&zone.provider_config).await?;
        let features = provider.features();
        let spec = wire_spec(
            features,
            changes.record_type,
            &changes.host,
            changes.ttl,
            &changes.value,
            changes.priority,
        )?;
        let key = record_key(&row, features);

        let remote = provider
            .update_record(&domain, &key, &spec)
            .await
            .map_err(|e| remote_failure(OP, &domain, e))?;

        let store = &self.ctx.record_store;
        let matched = store
            .update_record(zone.id, row.id, &changes)
            .await
            .map_err(|e| local_failure(OP, &domain, &e))?;
        if !matched {
            let gone = CoreError::RecordNotFound(format!("{} in {domain}", row.id));
            return Err(local_failure(OP, &domain, &gone));
        }

        let learned = remote
            .remote_id
            .filter(|id| row.remote_record_id.as_ref() != Some(id));
        if let Some(remote_id) = learned {
            store
                .save_record_remote_id(
                    &domain,
                    &remote_id,
                    changes.record_type,
                    &changes.host,
                    &changes.value,
                )
                .await
                .map_err(|e| local_failure(OP, &domain, &e))?;
        }

        log::info!(
            "[{}] Record {} updated in '{domain}' (id {})",
            provider.id(),
            key.describe(),
            row.id
        );
        Ok(())
    }

    /// 删除记录
    pub async fn delete_record(&self, request: DeleteRecordRequest) -> CoreResult<()> {
        const OP: SyncOperation = SyncOperation::DeleteRecord;

        let domain = required_domain(&request.domain_name)?;
        let record_id = request
            .record_id
            .ok_or_else(|| CoreError::MissingField("record_id".to_string()))?;

        let _guard = self.ctx.domain_locks().acquire(&domain).await;
        let zone = self.find_zone(&domain).await?;
        let row = self.find_record(&zone, record_id).await?;

        let provider = self.ctx.resolve_provider(&zone.provider_config).await?;
        let features = provider.features();
        let key = record_key(&row, features);
        let value = wire_value(features, row.record_type, &row.value, row.priority);

        provider
            .delete_record(&domain, &key, &value)
            .await
            .map_err(|e| remote_failure(OP, &domain, e))?;

        self.ctx
            .record_store
            .delete_record(zone.id, row.id)
            .await
            .map_err(|e| local_failure(OP, &domain, &e))?;

        log::info!(
            "[{}] Record {} deleted from '{domain}' (id {})",
            provider.id(),
            key.describe(),
            row.id
        );
        Ok(())
    }

    async fn find_zone(&self, domain: &str) -> CoreResult<Zone> {
        self.ctx
            .record_store
            .find_zone_by_name(domain)
            .await?
            .ok_or_else(|| CoreError::DomainNotFound(domain.to_string()))
    }

    async fn find_record(&self, zone: &Zone, record_id: i64) -> CoreResult<Record> {
        self.ctx
            .record_store
            .find_record(zone.id, record_id)
            .await?
            .ok_or_else(|| {
                CoreError::RecordNotFound(format!("{record_id} in {}", zone.domain_name))
            })
    }
}

/// Address of `row` at the provider: its stored remote id plus its current wire value.
fn record_key(row: &Record, features: ProviderFeatures) -> RecordKey {
    RecordKey::new(row.host.clone(), row.record_type)
        .with_remote_id(row.remote_record_id.clone())
        .with_current_value(Some(wire_value(
            features,
            row.record_type,
            &row.value,
            row.priority,
        )))
}

fn required_domain(domain_name: &str) -> CoreResult<String> {
    if domain_name.trim().is_empty() {
        return Err(CoreError::MissingField("domain_name".to_string()));
    }
    validate_domain_name(domain_name)
}

fn require_positive_ttl(ttl: u32) -> CoreResult<()> {
    if ttl == 0 {
        return Err(CoreError::ValidationError(
            "record_ttl must be a positive number of seconds".to_string(),
        ));
    }
    Ok(())
}

/// Priority kept for `record_type`; `None` for types without one.
fn priority_for(record_type: DnsRecordType, priority: Option<u16>) -> Option<u16> {
    priority.filter(|_| record_type.uses_priority())
}

/// Build the provider-facing spec, applying the provider's MX encoding.
fn wire_spec(
    features: ProviderFeatures,
    record_type: DnsRecordType,
    host: &str,
    ttl: u32,
    value: &str,
    priority: Option<u16>,
) -> CoreResult<RecordSpec> {
    if record_type == DnsRecordType::Mx {
        let priority =
            priority.ok_or_else(|| CoreError::MissingField("record_priority".to_string()))?;
        let (value, priority) = features.mx_encoding.encode(priority, value);
        return Ok(RecordSpec::new(record_type, host, ttl, value).with_priority(priority));
    }
    Ok(RecordSpec::new(record_type, host, ttl, value).with_priority(priority))
}

/// Value of a stored row as the provider holds it.
fn wire_value(
    features: ProviderFeatures,
    record_type: DnsRecordType,
    value: &str,
    priority: Option<u16>,
) -> String {
    if record_type == DnsRecordType::Mx {
        features.mx_encoding.encode(priority.unwrap_or(0), value).0
    } else {
        value.to_string()
    }
}

fn remote_failure(
    operation: SyncOperation,
    domain: &str,
    source: zonesync_provider::ProviderError,
) -> CoreError {
    let err = CoreError::provider(operation, domain, source);
    if err.is_expected() {
        log::warn!("{err}");
    } else {
        log::error!("{err}");
    }
    err
}

fn local_failure(operation: SyncOperation, domain: &str, cause: &CoreError) -> CoreError {
    let err = CoreError::persistence(operation, domain, cause);
    log::error!("{err}; run reconciliation for '{domain}'");
    err
}
