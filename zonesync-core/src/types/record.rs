//! 记录相关类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use zonesync_provider::DnsRecordType;

/// 本地保存的 DNS 记录
///
/// `value` is always the plain value; MX priority lives in `priority` regardless of how the
/// zone's provider encodes it on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: i64,
    /// Owning zone.
    pub zone_id: i64,
    /// Provider-issued record identifier, when the provider issues them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_record_id: Option<String>,
    pub record_type: DnsRecordType,
    /// `@` for the apex.
    pub host: String,
    pub value: String,
    pub ttl: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::utils::datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Input of [`RecordStore::insert_record`](crate::traits::RecordStore::insert_record).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub zone_id: i64,
    pub remote_record_id: Option<String>,
    pub record_type: DnsRecordType,
    pub host: String,
    pub value: String,
    pub ttl: u32,
    pub priority: Option<u16>,
}

/// Mutable fields of a record row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChanges {
    pub record_type: DnsRecordType,
    pub host: String,
    pub value: String,
    pub ttl: u32,
    pub priority: Option<u16>,
}
