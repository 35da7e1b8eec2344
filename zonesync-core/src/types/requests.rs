//! Engine request types

use serde::{Deserialize, Serialize};

use zonesync_provider::DnsRecordType;

/// 添加记录请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRecordRequest {
    pub domain_name: String,
    pub record_type: DnsRecordType,
    /// Subname; empty or `@` for the apex.
    #[serde(default)]
    pub record_name: String,
    pub record_value: String,
    pub record_ttl: u32,
    /// Required for MX.
    #[serde(default)]
    pub record_priority: Option<u16>,
}

/// 更新记录请求
///
/// Every field left `None` keeps the stored value of the row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRecordRequest {
    pub domain_name: String,
    /// Local record id.
    pub record_id: Option<i64>,
    #[serde(default)]
    pub record_type: Option<DnsRecordType>,
    #[serde(default)]
    pub record_name: Option<String>,
    #[serde(default)]
    pub record_value: Option<String>,
    #[serde(default)]
    pub record_ttl: Option<u32>,
    #[serde(default)]
    pub record_priority: Option<u16>,
}

/// 删除记录请求
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRecordRequest {
    pub domain_name: String,
    /// Local record id.
    pub record_id: Option<i64>,
}
