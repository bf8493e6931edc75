//! TTL Cache Module
//!
//! Typed cache over a [`PersistentStore`] with lazy, read-triggered expiry.
//! No public operation returns an error: failures are logged and the cache
//! degrades to a miss (reads) or a no-op (writes).

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheRecord, CacheStats, Lookup};
use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result, StoreError};
use crate::store::PersistentStore;

// == TTL Cache ==
/// Time-to-live cache writing through to a persistent store.
///
/// All entry state lives in the store; the cache itself only carries its
/// lifetime setting, its clock and a few counters. Multiple caches with
/// different lifetimes or stores can coexist.
#[derive(Debug)]
pub struct TtlCache<S, C = SystemClock> {
    /// Backing key-value store
    store: S,
    /// Time source for stamping and expiry
    clock: C,
    /// Entry lifetime
    ttl: Duration,
    /// Lookup and failure counters
    stats: StatsCounters,
}

impl<S: PersistentStore> TtlCache<S, SystemClock> {
    /// Creates a wall-clock cache with the lifetime from `config`.
    pub fn with_config(store: S, config: &CacheConfig) -> Self {
        Self::new(store, SystemClock, config.ttl())
    }
}

impl<S: PersistentStore, C: Clock> TtlCache<S, C> {
    // == Constructor ==
    /// Creates a cache over `store` whose entries live for `ttl`.
    pub fn new(store: S, clock: C, ttl: Duration) -> Self {
        Self {
            store,
            clock,
            ttl,
            stats: StatsCounters::default(),
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry and
    /// restarting its lifetime.
    ///
    /// Never fails from the caller's point of view: an empty key, a payload
    /// that cannot be serialized, or a store that refuses the write is logged
    /// and the call returns without caching anything.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(err) = self.try_set(key, value) {
            if matches!(err, CacheError::Store(_)) {
                self.stats.record_store_error();
                error!(op = "set", key = %key, error = %err, "Error saving to cache");
            } else {
                warn!(op = "set", key = %key, error = %err, "Skipped caching value");
            }
        }
    }

    fn try_set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey("key cannot be empty".to_string()));
        }

        let record = CacheRecord::new(value, self.clock.now_ms());
        let encoded = serde_json::to_string(&record).map_err(|source| CacheError::Serialize {
            key: key.to_string(),
            source,
        })?;

        self.store.set(key, &encoded)?;
        debug!(op = "set", key = %key, bytes = encoded.len(), "Cached value");
        Ok(())
    }

    // == Get ==
    /// Returns the payload under `key` if it is still fresh.
    ///
    /// Expired records are deleted as a side effect. Missing, expired,
    /// unreadable and unavailable all read as `None`; use [`lookup`] to
    /// tell them apart.
    ///
    /// [`lookup`]: TtlCache::lookup
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.lookup(key).into_option()
    }

    // == Lookup ==
    /// Like [`get`](TtlCache::get), but reports why a read missed.
    pub fn lookup<T: DeserializeOwned>(&self, key: &str) -> Lookup<T> {
        let lookup = self.read(key);
        if lookup.is_hit() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        lookup
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Lookup<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Lookup::Miss,
            Err(err @ StoreError::InvalidData(_)) => {
                self.stats.record_corrupt();
                warn!(op = "get", key = %key, error = %err, "Discarding damaged cache record");
                self.remove(key);
                return Lookup::Corrupt;
            }
            Err(err) => {
                self.stats.record_store_error();
                error!(op = "get", key = %key, error = %err, "Error reading from cache");
                return Lookup::Unavailable;
            }
        };

        // Shape first, payload type second: expiry applies whatever the reader's type
        let record: CacheRecord<Value> = match decode(key, &raw) {
            Ok(record) => record,
            Err(err) => {
                self.stats.record_corrupt();
                warn!(op = "get", key = %key, error = %err, "Discarding unreadable cache record");
                // It will never decode; don't leave it to fail every read
                self.remove(key);
                return Lookup::Corrupt;
            }
        };

        let now = self.clock.now_ms();
        if !record.is_fresh(now, self.ttl) {
            self.stats.record_expired();
            debug!(
                op = "get",
                key = %key,
                age_ms = record.age_ms(now),
                "Evicting expired cache entry"
            );
            self.remove(key);
            return Lookup::Expired;
        }

        match serde_json::from_value::<T>(record.data) {
            Ok(value) => Lookup::Hit(value),
            Err(source) => {
                self.stats.record_corrupt();
                let err = CacheError::Corrupt {
                    key: key.to_string(),
                    source,
                };
                warn!(op = "get", key = %key, error = %err, "Cached payload has an unexpected type");
                Lookup::Corrupt
            }
        }
    }

    // == Remove ==
    /// Deletes the entry under `key`. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) {
        if let Err(err) = self.store.delete(key) {
            self.stats.record_store_error();
            error!(op = "remove", key = %key, error = %err, "Error removing from cache");
        }
    }

    // == Clear ==
    /// Deletes every record in the store's namespace, including records
    /// this cache did not write.
    pub fn clear(&self) {
        match self.store.clear() {
            Ok(()) => debug!(op = "clear", "Cleared cache"),
            Err(err) => {
                self.stats.record_store_error();
                error!(op = "clear", error = %err, "Error clearing cache");
            }
        }
    }

    // == Accessors ==
    /// Entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Backing store, for direct inspection.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Time source.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    /// Consumes the cache and hands back its store.
    pub fn into_store(self) -> S {
        self.store
    }
}

fn decode(key: &str, raw: &str) -> Result<CacheRecord<Value>> {
    serde_json::from_str(raw).map_err(|source| CacheError::Corrupt {
        key: key.to_string(),
        source,
    })
}
