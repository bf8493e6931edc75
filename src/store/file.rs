//! File Store
//!
//! Keeps one file per key inside a directory, so entries survive restarts.
//! File names are the hex-encoded key plus an `.entry` suffix, which keeps
//! arbitrary keys filesystem-safe and lets `clear` touch only its own files.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::PersistentStore;

/// Maximum key length in bytes (hex doubles it; most filesystems cap names at 255)
pub const MAX_KEY_LENGTH: usize = 120;

const ENTRY_SUFFIX: &str = ".entry";
const TMP_SUFFIX: &str = ".tmp";
// Temp file abandoned by an interrupted write
const LEFTOVER_SUFFIX: &str = ".entry.tmp";

// == File Store ==
/// Directory-backed key-value store.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    // == Constructor ==
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            StoreError::Unavailable(format!("cannot create {}: {}", dir.display(), e))
        })?;
        debug!(dir = %dir.display(), "Opened file store");
        Ok(Self { dir })
    }

    /// Directory holding the entries.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}", hex::encode(key.as_bytes()), ENTRY_SUFFIX))
    }
}

impl PersistentStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if key.len() > MAX_KEY_LENGTH {
            return Ok(None);
        }

        match fs::read(self.entry_path(key)) {
            Ok(bytes) => String::from_utf8(bytes).map(Some).map_err(|e| {
                StoreError::InvalidData(format!("entry for {:?} is not UTF-8: {}", key, e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(StoreError::WriteRejected(format!(
                "key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        // Write then rename so a reader never sees a half-written entry
        let path = self.entry_path(key);
        let mut tmp = path.clone().into_os_string();
        tmp.push(TMP_SUFFIX);
        let tmp = PathBuf::from(tmp);

        if let Err(e) = fs::write(&tmp, value).and_then(|()| fs::rename(&tmp, &path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Ok(());
        }

        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> StoreResult<()> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0usize;
        for entry in entries {
            let path = entry?.path();
            let owned = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.ends_with(ENTRY_SUFFIX) || name.ends_with(LEFTOVER_SUFFIX))
                .unwrap_or(false);

            if owned && path.is_file() {
                match fs::remove_file(&path) {
                    Ok(()) => removed += 1,
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }

        debug!(dir = %self.dir.display(), removed, "Cleared file store");
        Ok(())
    }
}
