//! Cache Module
//!
//! Named response stores and their statistics. Two stores are current at any
//! time: a version-suffixed static store populated once at install, and a
//! dynamic store that grows as the routing policies write into it.

mod entry;
mod registry;
mod stats;
mod store;

// Re-export public types
pub use entry::CachedResponse;
pub use registry::CacheRegistry;
pub use stats::CacheStats;
pub use store::NamedStore;
