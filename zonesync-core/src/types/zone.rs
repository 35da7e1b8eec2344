//! Zone 相关类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use zonesync_provider::{ProviderConfig, ZoneSnapshot};

/// 本地保存的 DNS zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    /// 本地 ID
    pub id: i64,
    /// Opaque owner reference supplied by the caller.
    pub client_id: i64,
    /// Canonical zone name, unique across all zones.
    pub domain_name: String,
    /// Provider configuration this zone was created with.
    pub provider_config: ProviderConfig,
    /// Provider-issued zone identifier; `None` for name-keyed providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_zone_id: Option<String>,
    /// Last authoritative state fetched by the reconciler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<ZoneSnapshot>,
    /// 创建时间
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    /// 更新时间
    #[serde(with = "crate::utils::datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Zone {
    /// Provider name, mirrored into the `provider_id` column.
    pub fn provider_id(&self) -> &str {
        &self.provider_config.provider
    }
}

/// Input of [`RecordStore::upsert_zone`](crate::traits::RecordStore::upsert_zone).
///
/// On a `domain_name` conflict the existing row keeps its id, `client_id`, snapshot and
/// `created_at`; config and remote zone id are replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewZone {
    pub client_id: i64,
    pub domain_name: String,
    pub provider_config: ProviderConfig,
    pub remote_zone_id: Option<String>,
}
