use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    ProviderFeatures, RecordKey, RecordSpec, RemoteRecordRef, RemoteZoneRef, ZoneSnapshot,
};

/// DNS 提供商 Trait
///
/// The capability contract every hosting backend satisfies. Methods are addressed by the
/// information a caller always has (domain, host, type, value) so the caller never needs
/// to know whether the backend is identifier-based or content-addressed; identifiers in
/// [`RecordKey::remote_id`] are an optimization, never a requirement.
///
/// Implementations perform no retries and hold no knowledge of the local store.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &str;

    /// Policy flags (MX encoding, addressing mode).
    fn features(&self) -> ProviderFeatures;

    /// Create a zone.
    ///
    /// Fails with `DomainExists` if the zone already exists remotely and
    /// `InvalidParameter` if `domain` is empty.
    async fn create_zone(&self, domain: &str) -> Result<RemoteZoneRef>;

    /// Fetch the authoritative zone state. Fails with `DomainNotFound` if absent.
    async fn get_zone(&self, domain: &str) -> Result<ZoneSnapshot>;

    /// Delete a zone. Fails with `DomainNotFound` if absent.
    async fn delete_zone(&self, domain: &str) -> Result<()>;

    /// Create a record in a zone.
    async fn create_record(&self, domain: &str, spec: &RecordSpec) -> Result<RemoteRecordRef>;

    /// Replace the record matched by `key` with `spec`, host and type included.
    ///
    /// Fails with `RecordNotFound` if nothing matches and `RecordExists` if `spec` collides
    /// with another record.
    async fn update_record(
        &self,
        domain: &str,
        key: &RecordKey,
        spec: &RecordSpec,
    ) -> Result<RemoteRecordRef>;

    /// Delete the record matching `key` and `value` exactly.
    ///
    /// Fails with `RecordNotFound` if nothing matches.
    async fn delete_record(&self, domain: &str, key: &RecordKey, value: &str) -> Result<()>;
}
