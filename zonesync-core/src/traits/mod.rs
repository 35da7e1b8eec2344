//! Storage and provider lookup abstractions

mod provider_registry;
mod record_store;

pub use provider_registry::{InMemoryProviderRegistry, ProviderRegistry};
pub use record_store::RecordStore;
