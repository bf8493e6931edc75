//! Persistent Store Module
//!
//! The string-keyed, string-valued medium the cache writes through to.
//! Every operation can fail and says so with a [`StoreResult`].

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StoreResult;

/// A fallible key-value store over string keys and string values.
pub trait PersistentStore {
    /// Returns the raw value under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes `key`. Deleting an absent key succeeds.
    fn delete(&self, key: &str) -> StoreResult<()>;

    /// Removes every key in the store's namespace.
    fn clear(&self) -> StoreResult<()>;
}

impl<S: PersistentStore + ?Sized> PersistentStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}

impl<S: PersistentStore + ?Sized> PersistentStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}

impl<S: PersistentStore + ?Sized> PersistentStore for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}
