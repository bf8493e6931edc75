//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default entry lifetime: 12 hours.
pub const DEFAULT_TTL_SECS: u64 = 12 * 60 * 60;

/// Default directory for the file-backed store.
pub const DEFAULT_CACHE_DIR: &str = ".ttl_cache";

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Entry lifetime in seconds
    pub ttl_secs: u64,
    /// Directory used by the file-backed store
    pub cache_dir: PathBuf,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TTL_CACHE_TTL_SECS` - Entry lifetime in seconds (default: 43200)
    /// - `TTL_CACHE_DIR` - Directory for the file-backed store (default: .ttl_cache)
    pub fn from_env() -> Self {
        Self {
            ttl_secs: env::var("TTL_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL_SECS),
            cache_dir: env::var("TTL_CACHE_DIR")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
        }
    }

    /// Entry lifetime as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TTL_SECS,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
        }
    }
}
