//! 类型定义模块

mod reconcile;
mod record;
mod requests;
mod zone;

pub use reconcile::{ReconcileOutcome, ReconcileReport, ZoneReconcileResult};
pub use record::{NewRecord, Record, RecordChanges};
pub use requests::{AddRecordRequest, DeleteRecordRequest, UpdateRecordRequest};
pub use zone::{NewZone, Zone};

// Re-export provider 库的公共类型
pub use zonesync_provider::{
    DnsRecordType, ProviderConfig, ProviderFeatures, RecordSpec, SnapshotRecord, ZoneSnapshot,
};
