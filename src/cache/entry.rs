//! Cache Record Module
//!
//! Defines the record written to the store for each entry and the freshness rule.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// == Cache Record ==
/// A cached payload together with the time it was stored.
///
/// Serialized as `{"data": <payload>, "timestamp": <unix ms>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord<T> {
    /// The caller's payload
    pub data: T,
    /// Storage timestamp (Unix milliseconds), set by the cache
    pub timestamp: u64,
}

impl<T> CacheRecord<T> {
    // == Constructor ==
    /// Creates a record stamped at `stored_at_ms`.
    pub fn new(data: T, stored_at_ms: u64) -> Self {
        Self {
            data,
            timestamp: stored_at_ms,
        }
    }

    // == Age ==
    /// Milliseconds since the record was stored; zero if `now_ms` is earlier.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.timestamp)
    }

    // == Is Fresh ==
    /// Checks the record against `ttl` at `now_ms`.
    pub fn is_fresh(&self, now_ms: u64, ttl: Duration) -> bool {
        is_fresh(self.timestamp, now_ms, ttl)
    }

    // == Time To Live ==
    /// Remaining lifetime in milliseconds, `Some(0)` on the boundary, `None` once expired.
    pub fn remaining_ms(&self, now_ms: u64, ttl: Duration) -> Option<u64> {
        ttl_ms(ttl).checked_sub(self.age_ms(now_ms))
    }
}

// == Utility Functions ==
/// Returns true while `now_ms - stored_at_ms <= ttl`.
///
/// The boundary is inclusive: an entry is still fresh at exactly `stored_at + ttl`.
/// A timestamp ahead of `now_ms` counts as age zero.
pub fn is_fresh(stored_at_ms: u64, now_ms: u64, ttl: Duration) -> bool {
    now_ms.saturating_sub(stored_at_ms) <= ttl_ms(ttl)
}

fn ttl_ms(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}
