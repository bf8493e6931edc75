//! Cache Module
//!
//! Provides a typed cache with time-based expiry over a pluggable store.

mod entry;
mod lookup;
mod stats;
mod ttl_cache;


// Re-export public types
pub use entry::{is_fresh, CacheRecord};
pub use lookup::Lookup;
pub use stats::CacheStats;
pub use ttl_cache::TtlCache;
