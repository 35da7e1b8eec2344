//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

#[cfg(feature = "memory")]
mod memory;

#[cfg(feature = "memory")]
pub use memory::{InMemoryProvider, InMemoryProviderFactory};
