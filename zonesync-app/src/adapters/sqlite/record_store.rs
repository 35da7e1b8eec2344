//! `RecordStore` implementation for `SqliteStore`.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    TransactionTrait,
};

use zonesync_core::error::{CoreError, CoreResult};
use zonesync_core::traits::RecordStore;
use zonesync_core::types::{NewRecord, NewZone, Record, RecordChanges, Zone};
use zonesync_core::utils::datetime;
use zonesync_provider::{DnsRecordType, ProviderConfig, ZoneSnapshot};

use super::entity::{record, zone};
use super::SqliteStore;

fn parse_timestamp(field: &str, value: &str) -> CoreResult<chrono::DateTime<Utc>> {
    datetime::parse(value)
        .ok_or_else(|| CoreError::SerializationError(format!("Invalid {field}: {value}")))
}

fn to_json<T: serde::Serialize>(value: &T) -> CoreResult<String> {
    serde_json::to_string(value).map_err(|e| CoreError::SerializationError(e.to_string()))
}

impl zone::Model {
    /// Convert a `SeaORM` row model into a domain `Zone`.
    fn into_zone(self) -> CoreResult<Zone> {
        let provider_config: ProviderConfig = serde_json::from_str(&self.config)
            .map_err(|e| CoreError::SerializationError(format!("Invalid config JSON: {e}")))?;
        let snapshot: Option<ZoneSnapshot> = self
            .snapshot
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| CoreError::SerializationError(format!("Invalid snapshot JSON: {e}")))?;

        Ok(Zone {
            id: self.id,
            client_id: self.client_id,
            domain_name: self.domain_name,
            provider_config,
            remote_zone_id: self.zone_id,
            snapshot,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

impl record::Model {
    /// Convert a `SeaORM` row model into a domain `Record`.
    fn into_record(self) -> CoreResult<Record> {
        let record_type: DnsRecordType = self
            .record_type
            .parse()
            .map_err(|e| CoreError::SerializationError(format!("Invalid type: {e}")))?;
        let ttl = u32::try_from(self.ttl)
            .map_err(|_| CoreError::SerializationError(format!("Invalid ttl: {}", self.ttl)))?;
        let priority = self
            .priority
            .map(u16::try_from)
            .transpose()
            .map_err(|e| CoreError::SerializationError(format!("Invalid priority: {e}")))?;

        Ok(Record {
            id: self.id,
            zone_id: self.domain_id,
            remote_record_id: self.record_id,
            record_type,
            host: self.host,
            value: self.value,
            ttl,
            priority,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

impl SqliteStore {
    async fn find_zone_model(&self, domain_name: &str) -> CoreResult<Option<zone::Model>> {
        zone::Entity::find()
            .filter(zone::Column::DomainName.eq(domain_name))
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query zone: {e}")))
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn upsert_zone(&self, new_zone: &NewZone) -> CoreResult<Zone> {
        let now = datetime::to_storage(&Utc::now());
        let active_model = zone::ActiveModel {
            id: NotSet,
            client_id: Set(new_zone.client_id),
            domain_name: Set(new_zone.domain_name.clone()),
            provider_id: Set(new_zone.provider_config.provider.clone()),
            zone_id: Set(new_zone.remote_zone_id.clone()),
            config: Set(to_json(&new_zone.provider_config)?),
            snapshot: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        zone::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(zone::Column::DomainName)
                    .update_columns([
                        zone::Column::ProviderId,
                        zone::Column::ZoneId,
                        zone::Column::Config,
                        zone::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to upsert zone: {e}")))?;

        self.find_zone_model(&new_zone.domain_name)
            .await?
            .ok_or_else(|| {
                CoreError::StorageError(format!(
                    "Zone '{}' missing after upsert",
                    new_zone.domain_name
                ))
            })?
            .into_zone()
    }

    async fn delete_zone(&self, domain_name: &str) -> CoreResult<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to begin transaction: {e}")))?;

        let Some(existing) = zone::Entity::find()
            .filter(zone::Column::DomainName.eq(domain_name))
            .one(&txn)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query zone: {e}")))?
        else {
            return Ok(false);
        };

        record::Entity::delete_many()
            .filter(record::Column::DomainId.eq(existing.id))
            .exec(&txn)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to delete records: {e}")))?;

        let result = zone::Entity::delete_by_id(existing.id)
            .exec(&txn)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to delete zone: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to commit transaction: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    async fn find_zone_by_name(&self, domain_name: &str) -> CoreResult<Option<Zone>> {
        self.find_zone_model(domain_name)
            .await?
            .map(zone::Model::into_zone)
            .transpose()
    }

    async fn list_zones(&self) -> CoreResult<Vec<Zone>> {
        let rows = zone::Entity::find()
            .order_by_asc(zone::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to list zones: {e}")))?;

        rows.into_iter().map(zone::Model::into_zone).collect()
    }

    async fn update_zone_snapshot(
        &self,
        zone_id: i64,
        snapshot: &ZoneSnapshot,
        remote_zone_id: Option<String>,
    ) -> CoreResult<bool> {
        let result = zone::Entity::update_many()
            .col_expr(zone::Column::Snapshot, Expr::value(to_json(snapshot)?))
            .col_expr(zone::Column::ZoneId, Expr::value(remote_zone_id))
            .col_expr(
                zone::Column::UpdatedAt,
                Expr::value(datetime::to_storage(&Utc::now())),
            )
            .filter(zone::Column::Id.eq(zone_id))
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to update snapshot: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    async fn insert_record(&self, new_record: &NewRecord) -> CoreResult<Record> {
        let now = datetime::to_storage(&Utc::now());
        let active_model = record::ActiveModel {
            id: NotSet,
            domain_id: Set(new_record.zone_id),
            record_id: Set(new_record.remote_record_id.clone()),
            record_type: Set(new_record.record_type.as_str().to_string()),
            host: Set(new_record.host.clone()),
            value: Set(new_record.value.clone()),
            ttl: Set(i64::from(new_record.ttl)),
            priority: Set(new_record.priority.map(i32::from)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        active_model
            .insert(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to insert record: {e}")))?
            .into_record()
    }

    async fn find_record(&self, zone_id: i64, record_id: i64) -> CoreResult<Option<Record>> {
        record::Entity::find_by_id(record_id)
            .filter(record::Column::DomainId.eq(zone_id))
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query record: {e}")))?
            .map(record::Model::into_record)
            .transpose()
    }

    async fn list_records(&self, zone_id: i64) -> CoreResult<Vec<Record>> {
        let rows = record::Entity::find()
            .filter(record::Column::DomainId.eq(zone_id))
            .order_by_asc(record::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to list records: {e}")))?;

        rows.into_iter().map(record::Model::into_record).collect()
    }

    async fn update_record(
        &self,
        zone_id: i64,
        record_id: i64,
        changes: &RecordChanges,
    ) -> CoreResult<bool> {
        let result = record::Entity::update_many()
            .col_expr(
                record::Column::RecordType,
                Expr::value(changes.record_type.as_str()),
            )
            .col_expr(record::Column::Host, Expr::value(changes.host.clone()))
            .col_expr(record::Column::Value, Expr::value(changes.value.clone()))
            .col_expr(record::Column::Ttl, Expr::value(i64::from(changes.ttl)))
            .col_expr(
                record::Column::Priority,
                Expr::value(changes.priority.map(i32::from)),
            )
            .col_expr(
                record::Column::UpdatedAt,
                Expr::value(datetime::to_storage(&Utc::now())),
            )
            .filter(record::Column::Id.eq(record_id))
            .filter(record::Column::DomainId.eq(zone_id))
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to update record: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_record(&self, zone_id: i64, record_id: i64) -> CoreResult<bool> {
        let result = record::Entity::delete_many()
            .filter(record::Column::Id.eq(record_id))
            .filter(record::Column::DomainId.eq(zone_id))
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to delete record: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    async fn find_record_remote_id(
        &self,
        domain_name: &str,
        record_type: DnsRecordType,
        host: &str,
    ) -> CoreResult<Option<String>> {
        let row = record::Entity::find()
            .join(JoinType::InnerJoin, record::Relation::Zone.def())
            .filter(zone::Column::DomainName.eq(domain_name))
            .filter(record::Column::RecordType.eq(record_type.as_str()))
            .filter(record::Column::Host.eq(host))
            .order_by_asc(record::Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query record id: {e}")))?;

        Ok(row.and_then(|r| r.record_id))
    }

    async fn save_record_remote_id(
        &self,
        domain_name: &str,
        remote_id: &str,
        record_type: DnsRecordType,
        host: &str,
        value: &str,
    ) -> CoreResult<u64> {
        let Some(owner) = self.find_zone_model(domain_name).await? else {
            return Ok(0);
        };

        let result = record::Entity::update_many()
            .col_expr(record::Column::RecordId, Expr::value(remote_id))
            .filter(record::Column::DomainId.eq(owner.id))
            .filter(record::Column::RecordType.eq(record_type.as_str()))
            .filter(record::Column::Host.eq(host))
            .filter(record::Column::Value.eq(value))
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to save record id: {e}")))?;

        Ok(result.rows_affected)
    }
}
