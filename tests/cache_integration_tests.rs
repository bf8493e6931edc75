//! Integration Tests for the TTL cache
//!
//! Drives the public API against the in-memory store, the file store and a
//! store that fails on demand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tempfile::TempDir;
use ttl_cache::error::StoreResult;
use ttl_cache::{
    CacheConfig, FileStore, Lookup, ManualClock, MemoryStore, PersistentStore, StoreError,
    TtlCache,
};

// == Helper Functions ==

const START: u64 = 1_700_000_000_000;
const TWELVE_HOURS: Duration = Duration::from_secs(12 * 60 * 60);

fn memory_cache() -> TtlCache<MemoryStore, ManualClock> {
    TtlCache::new(MemoryStore::new(), ManualClock::new(START), TWELVE_HOURS)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Forecast {
    city: String,
    highs: Vec<i32>,
    details: HashMap<String, String>,
}

fn forecast() -> Forecast {
    Forecast {
        city: "Lyon".to_string(),
        highs: vec![21, 23, 19],
        details: HashMap::from([("wind".to_string(), "NW 12km/h".to_string())]),
    }
}

/// Wraps a MemoryStore and fails selected operations when switched on.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_deletes: AtomicBool,
}

impl PersistentStore for FlakyStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("medium offline".to_string()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteRejected("quota exceeded".to_string()));
        }
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("medium offline".to_string()));
        }
        self.inner.delete(key)
    }

    fn clear(&self) -> StoreResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("medium offline".to_string()));
        }
        self.inner.clear()
    }
}

fn flaky_cache() -> TtlCache<FlakyStore, ManualClock> {
    TtlCache::new(FlakyStore::default(), ManualClock::new(START), TWELVE_HOURS)
}

// == Read / Write Tests ==

#[test]
fn test_roundtrip_structured_value() {
    let cache = memory_cache();

    cache.set("forecast:lyon", &forecast());

    assert_eq!(cache.get::<Forecast>("forecast:lyon"), Some(forecast()));
}

#[test]
fn test_roundtrip_scalars_and_nesting() {
    let cache = memory_cache();
    let nested = json!({"a": {"b": [1, "two", null, true]}, "c": -3});

    cache.set("int", &7i64);
    cache.set("text", "plain");
    cache.set("nested", &nested);
    cache.set("list", &vec!["x", "y"]);

    assert_eq!(cache.get::<i64>("int"), Some(7));
    assert_eq!(cache.get::<String>("text"), Some("plain".to_string()));
    assert_eq!(cache.get::<serde_json::Value>("nested"), Some(nested));
    assert_eq!(
        cache.get::<Vec<String>>("list"),
        Some(vec!["x".to_string(), "y".to_string()])
    );
}

#[test]
fn test_overwrite_returns_latest() {
    let cache = memory_cache();

    cache.set("k", &"v1");
    cache.set("k", &"v2");

    assert_eq!(cache.get::<String>("k"), Some("v2".to_string()));
}

// == Expiry Tests ==

#[test]
fn test_expiry_boundary_is_inclusive() {
    let cache = memory_cache();
    cache.set("k", &forecast());

    cache.clock().advance(TWELVE_HOURS);
    assert_eq!(cache.get::<Forecast>("k"), Some(forecast()));

    cache.clock().advance_ms(1);
    assert_eq!(cache.get::<Forecast>("k"), None);
}

#[test]
fn test_expired_read_evicts_record() {
    let cache = memory_cache();
    cache.set("k", &1u8);
    cache.clock().advance(TWELVE_HOURS + Duration::from_millis(1));

    assert_eq!(cache.lookup::<u8>("k"), Lookup::Expired);

    assert_eq!(cache.store().get("k").unwrap(), None);
    assert_eq!(cache.lookup::<u8>("k"), Lookup::Miss);
}

#[test]
fn test_expiry_of_one_key_leaves_others() {
    let cache = memory_cache();
    cache.set("old", &1u8);
    cache.clock().advance(Duration::from_secs(6 * 60 * 60));
    cache.set("new", &2u8);
    cache.clock().advance(Duration::from_secs(7 * 60 * 60));

    assert_eq!(cache.get::<u8>("old"), None);
    assert_eq!(cache.get::<u8>("new"), Some(2));

    cache.remove("new");
    cache.set("other", &3u8);
    assert_eq!(cache.get::<u8>("other"), Some(3));
}

// == Remove / Clear Tests ==

#[test]
fn test_remove_then_get_is_absent() {
    let cache = memory_cache();
    cache.set("k", &"v");

    cache.remove("k");
    assert_eq!(cache.get::<String>("k"), None);

    // Removing again is a no-op
    cache.remove("k");
    assert_eq!(cache.stats().store_errors, 0);
}

#[test]
fn test_clear_removes_everything() {
    let cache = memory_cache();
    cache.set("k1", &"v1");
    cache.set("k2", &"v2");

    cache.clear();

    assert_eq!(cache.get::<String>("k1"), None);
    assert_eq!(cache.get::<String>("k2"), None);
    assert!(cache.store().is_empty());
}

// == Resilience Tests ==

#[test]
fn test_corrupt_record_reads_as_absent() {
    let cache = memory_cache();
    cache.store().set("k", "}{ definitely not json").unwrap();
    cache.set("neighbour", &5u8);

    assert_eq!(cache.get::<String>("k"), None);
    assert_eq!(cache.get::<u8>("neighbour"), Some(5));
    assert_eq!(cache.stats().corrupt, 1);
}

#[test]
fn test_record_in_foreign_shape_reads_as_absent() {
    let cache = memory_cache();
    cache
        .store()
        .set("k", r#"{"value":"x","expiration_time":1}"#)
        .unwrap();

    assert_eq!(cache.lookup::<String>("k"), Lookup::Corrupt);
    assert!(!cache.store().contains_key("k"));
}

#[test]
fn test_write_failure_is_swallowed() {
    let cache = flaky_cache();
    cache.store().fail_writes.store(true, Ordering::SeqCst);

    cache.set("k", &forecast());

    assert_eq!(cache.get::<Forecast>("k"), None);
    assert_eq!(cache.stats().store_errors, 1);
}

#[test]
fn test_read_failure_degrades_to_miss() {
    let cache = flaky_cache();
    cache.set("k", &1u8);
    cache.store().fail_reads.store(true, Ordering::SeqCst);

    assert_eq!(cache.lookup::<u8>("k"), Lookup::Unavailable);

    cache.store().fail_reads.store(false, Ordering::SeqCst);
    assert_eq!(cache.get::<u8>("k"), Some(1));
}

#[test]
fn test_delete_failures_are_swallowed() {
    let cache = flaky_cache();
    cache.set("k", &1u8);
    cache.store().fail_deletes.store(true, Ordering::SeqCst);

    cache.remove("k");
    cache.clear();
    cache.clock().advance(TWELVE_HOURS * 2);
    // Eviction fails too, but the read still reports absent
    assert_eq!(cache.get::<u8>("k"), None);

    assert_eq!(cache.stats().store_errors, 3);
}

#[test]
fn test_quota_exceeded_leaves_previous_value() {
    let cache = TtlCache::new(MemoryStore::with_quota(64), ManualClock::new(START), TWELVE_HOURS);
    cache.set("k", &"small");

    cache.set("k", &"x".repeat(128));

    assert_eq!(cache.get::<String>("k"), Some("small".to_string()));
}

#[test]
fn test_unserializable_value_is_swallowed() {
    let cache = memory_cache();
    // JSON object keys must be strings
    let mut bad = HashMap::new();
    bad.insert(vec![1u8], "v");

    cache.set("k", &bad);

    assert!(cache.store().is_empty());
    assert_eq!(cache.stats().store_errors, 0);
}

// == File Store Tests ==

#[test]
fn test_file_backed_cache_persists_across_instances() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::new(START));

    {
        let store = FileStore::open(dir.path()).unwrap();
        let cache = TtlCache::new(store, clock.clone(), TWELVE_HOURS);
        cache.set("forecast", &forecast());
    }

    let store = FileStore::open(dir.path()).unwrap();
    let cache = TtlCache::new(store, clock.clone(), TWELVE_HOURS);
    assert_eq!(cache.get::<Forecast>("forecast"), Some(forecast()));

    clock.advance(TWELVE_HOURS + Duration::from_millis(1));
    assert_eq!(cache.get::<Forecast>("forecast"), None);
    assert_eq!(cache.store().get("forecast").unwrap(), None);
}

#[test]
fn test_file_backed_cache_damaged_bytes_read_as_corrupt() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let cache = TtlCache::new(store, ManualClock::new(1_000), TWELVE_HOURS);
    cache.set("k", &"placeholder");
    let entry = dir.path().join(format!("{}.entry", hex::encode("k")));
    // Valid JSON except for one stray byte inside the payload string
    std::fs::write(&entry, b"{\"data\":\"a\xFFb\",\"timestamp\":1000}").unwrap();

    assert_eq!(cache.lookup::<String>("k"), Lookup::Corrupt);
    assert!(!entry.exists(), "Damaged record should be evicted");
    assert_eq!(cache.lookup::<String>("k"), Lookup::Miss);
    assert_eq!(cache.stats().corrupt, 1);
    assert_eq!(cache.stats().store_errors, 0);
}

#[test]
fn test_file_backed_cache_clear() {
    let dir = TempDir::new().unwrap();
    let config = CacheConfig {
        cache_dir: dir.path().to_path_buf(),
        ..CacheConfig::default()
    };
    let store = FileStore::open(&config.cache_dir).unwrap();
    let cache = TtlCache::with_config(store, &config);
    cache.set("a", &1u8);
    cache.set("b", &2u8);

    cache.clear();

    assert_eq!(cache.get::<u8>("a"), None);
    assert_eq!(cache.get::<u8>("b"), None);
}

#[test]
fn test_shared_store_between_caches() {
    let store = Arc::new(MemoryStore::new());
    let clock = ManualClock::new(START);
    let writer = TtlCache::new(store.clone(), &clock, TWELVE_HOURS);
    let reader = TtlCache::new(store.clone(), &clock, Duration::from_secs(60));

    writer.set("k", &"v");
    clock.advance(Duration::from_secs(61));

    // The reader's shorter lifetime applies to what it reads, and evicts
    assert_eq!(reader.get::<String>("k"), None);
    assert_eq!(writer.get::<String>("k"), None);
    assert!(store.is_empty());
}
