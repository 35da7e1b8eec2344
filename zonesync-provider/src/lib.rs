//! # zonesync-provider
//!
//! Capability contract for DNS hosting backends used by the zone synchronization engine.
//!
//! A provider creates, inspects and deletes zones and the records inside them. Backends
//! differ in two ways that callers must respect, exposed through [`ProviderFeatures`]:
//!
//! - **MX encoding**: some APIs take MX priority as a separate field, others expect it
//!   folded into the value (`"10 mail.example.com"`).
//! - **Addressing**: some APIs issue record identifiers, others address records purely by
//!   host, type and value.
//!
//! ## Feature Flags
//!
//! - **`memory`** *(default)*: the in-memory reference provider, registered as `memory`.
//!
//! ## Usage
//!
//! ```rust
//! use zonesync_provider::{DnsProvider, DnsRecordType, InMemoryProvider, RecordSpec};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> zonesync_provider::Result<()> {
//! let provider = InMemoryProvider::new("memory");
//! provider.create_zone("example.com").await?;
//!
//! let spec = RecordSpec::new(DnsRecordType::A, "www", 3600, "192.0.2.1");
//! provider.create_record("example.com", &spec).await?;
//!
//! let snapshot = provider.get_zone("example.com").await?;
//! assert_eq!(snapshot.records.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError). Use
//! [`ProviderError::kind`] to branch on the failure class; providers never retry
//! internally.

mod error;
mod factory;
mod providers;
mod traits;
mod types;

// Re-export error types
pub use error::{ProviderError, ProviderErrorKind, Result};

// Re-export factory API
pub use factory::{builtin_factories, ProviderFactory, SharedProviderFactory};

pub use traits::DnsProvider;

pub use types::{
    DnsRecordType, MxEncoding, ProviderConfig, ProviderFeatures, RecordAddressing, RecordKey,
    RecordSpec, RemoteRecordRef, RemoteZoneRef, SnapshotRecord, ZoneSnapshot,
};

pub use providers::common::{normalize_domain_name, normalize_host};

#[cfg(feature = "memory")]
pub use providers::{InMemoryProvider, InMemoryProviderFactory};
