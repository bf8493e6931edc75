//! TTL Cache - a typed time-to-live cache over a persistent key-value store
//!
//! Values are stored as JSON records stamped with their write time and read
//! back only while fresh. Stale and unreadable records are evicted when read.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod store;

pub use cache::{CacheStats, Lookup, TtlCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use error::{CacheError, StoreError};
pub use store::{FileStore, MemoryStore, PersistentStore};
