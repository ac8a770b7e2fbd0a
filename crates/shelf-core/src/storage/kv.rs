//! Key-value slots
//!
//! The catalog lives in a single slot addressed by a fixed key. Backends only
//! need whole-value reads and overwrites; there is no partial update.
//!
//! - `FileKeyValueStore`: one file per key under the data directory,
//!   replaced atomically (write to temp file, then rename)
//! - `MemoryKeyValueStore`: process-local map, used for tests and
//!   `--ephemeral` runs

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{StorageError, StorageResult};

/// Whole-value key-value storage
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` if the slot is empty
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Human-readable location of the slot, for status output
    fn describe(&self, key: &str) -> String;

    /// Size in bytes of the stored value, if any
    fn size_of(&self, key: &str) -> StorageResult<Option<u64>> {
        Ok(self.get(key)?.map(|v| v.len() as u64))
    }
}

/// File-backed slots, one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at `dir` (created lazily on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;

        if !path.exists() {
            return Ok(None);
        }

        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StorageError::ReadError { path, source })
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        atomic_write(&path, value.as_bytes())?;
        debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn describe(&self, key: &str) -> String {
        match self.path_for(key) {
            Ok(path) => path.display().to_string(),
            Err(_) => self.dir.display().to_string(),
        }
    }

    fn size_of(&self, key: &str) -> StorageResult<Option<u64>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        fs::metadata(&path)
            .map(|m| Some(m.len()))
            .map_err(|source| StorageError::ReadError { path, source })
    }
}

/// In-memory slots
///
/// Counts writes so callers can check whether an operation persisted, and
/// can be told to fail writes to exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    slots: HashMap<String, String>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryKeyValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with `value` already stored under `key`
    pub fn with_value(key: &str, value: impl Into<String>) -> Self {
        let mut store = Self::default();
        store.slots.insert(key.to_string(), value.into());
        store
    }

    /// Number of successful `set` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Make every following `set` fail as if the quota were exceeded
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::from_io(
                std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded"),
                PathBuf::from(format!("memory:{}", key)),
            ));
        }
        self.slots.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn describe(&self, key: &str) -> String {
        format!("memory:{}", key)
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Create temp file in the same directory (for atomic rename)
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    // Sync to disk before rename
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
