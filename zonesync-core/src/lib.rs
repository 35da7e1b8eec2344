//! zonesync Core Library
//!
//! Keeps DNS zones and records in step between a local store and a pluggable set of
//! hosting providers:
//! - `SyncEngine`: create/delete zones and add/update/delete records, remote first
//! - `Reconciler`: detect and repair drift between stored and authoritative zone state
//!
//! This library is platform-independent; storage and provider construction are abstracted
//! through the `RecordStore` and `ProviderRegistry` traits.

pub mod error;
pub mod services;
pub mod store;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult, ErrorKind, SyncOperation};
pub use services::{Reconciler, ServiceContext, SyncEngine};
pub use store::InMemoryRecordStore;
pub use traits::{InMemoryProviderRegistry, ProviderRegistry, RecordStore};
