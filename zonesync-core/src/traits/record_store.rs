//! Local persistence abstract Trait

use async_trait::async_trait;

use zonesync_provider::{DnsRecordType, ZoneSnapshot};

use crate::error::CoreResult;
use crate::types::{NewRecord, NewZone, Record, RecordChanges, Zone};

/// Zone/record persistence Trait
///
/// Every method is a single statement against the backing store; no transaction spans a
/// remote call.
///
/// Platform implementation:
/// - `InMemoryRecordStore` (this crate)
/// - `SqliteStore` (`zonesync-app`, `SeaORM`)
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a zone, or update config and remote id of the zone with the same name.
    async fn upsert_zone(&self, zone: &NewZone) -> CoreResult<Zone>;

    /// Delete a zone and all its records. Returns whether a zone was removed.
    async fn delete_zone(&self, domain_name: &str) -> CoreResult<bool>;

    async fn find_zone_by_name(&self, domain_name: &str) -> CoreResult<Option<Zone>>;

    /// All zones ordered by id.
    async fn list_zones(&self) -> CoreResult<Vec<Zone>>;

    /// Replace the stored snapshot and remote zone id, advancing `updated_at`.
    ///
    /// Returns `false` if the zone no longer exists.
    async fn update_zone_snapshot(
        &self,
        zone_id: i64,
        snapshot: &ZoneSnapshot,
        remote_zone_id: Option<String>,
    ) -> CoreResult<bool>;

    /// Insert a record row and return it with its generated id.
    async fn insert_record(&self, record: &NewRecord) -> CoreResult<Record>;

    /// Look up a record by local id, scoped to its zone.
    async fn find_record(&self, zone_id: i64, record_id: i64) -> CoreResult<Option<Record>>;

    /// All records of a zone ordered by id.
    async fn list_records(&self, zone_id: i64) -> CoreResult<Vec<Record>>;

    /// Apply `changes` to one row, advancing `updated_at`. Returns whether a row matched.
    async fn update_record(
        &self,
        zone_id: i64,
        record_id: i64,
        changes: &RecordChanges,
    ) -> CoreResult<bool>;

    /// Delete one row. Returns whether a row matched.
    async fn delete_record(&self, zone_id: i64, record_id: i64) -> CoreResult<bool>;

    /// Remote id of the first record (lowest local id) with this type and host.
    ///
    /// Several rows may share type and host, so the answer is only a hint; the engine
    /// prefers the id stored on the row it is working on.
    async fn find_record_remote_id(
        &self,
        domain_name: &str,
        record_type: DnsRecordType,
        host: &str,
    ) -> CoreResult<Option<String>>;

    /// Store `remote_id` on every record of `domain_name` matching type, host and value.
    ///
    /// Returns the number of rows updated.
    async fn save_record_remote_id(
        &self,
        domain_name: &str,
        remote_id: &str,
        record_type: DnsRecordType,
        host: &str,
        value: &str,
    ) -> CoreResult<u64>;
}
