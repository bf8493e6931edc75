//! In-Memory Store
//!
//! HashMap-backed store living inside the process, with an optional byte quota.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{StoreError, StoreResult};
use crate::store::PersistentStore;

// == Memory Store ==
/// In-process key-value store.
///
/// Usage is measured as the sum of key and value lengths in bytes. When a
/// quota is set, writes that would push usage past it are rejected and the
/// previous value (if any) is left in place.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty, unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that holds at most `quota_bytes` of keys plus values.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    // == Length ==
    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if a raw value exists under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.read()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    // == Usage ==
    /// Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.read().map(|entries| usage(&entries)).unwrap_or(0)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<String, String>>> {
        self.entries
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, String>>> {
        self.entries
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

fn usage(entries: &HashMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

impl PersistentStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.write()?;

        if let Some(quota) = self.quota_bytes {
            let replaced = entries.get(key).map(|old| key.len() + old.len()).unwrap_or(0);
            let projected = usage(&entries) - replaced + key.len() + value.len();
            if projected > quota {
                return Err(StoreError::WriteRejected(format!(
                    "quota of {} bytes exceeded ({} bytes needed)",
                    quota, projected
                )));
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.write()?.remove(key);
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        self.write()?.clear();
        Ok(())
    }
}
