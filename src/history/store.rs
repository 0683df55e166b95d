//! Key-value storage collaborator
//!
//! The history store is the only component that touches durable state, and
//! it does so through this narrow get/set/remove interface. `FileStore`
//! keeps one JSON file per key in the data directory; `MemoryStore` keeps
//! records in a map and stands in for disk in tests and dry runs.

use crate::error::{Error, Result};
use log::debug;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Record storage addressed by string keys.
pub trait KeyValueStore {
    /// Read a record, `None` if the key has never been written or was removed.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Create or replace a record.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a record. Removing an absent key succeeds.
    fn remove(&mut self, key: &str) -> Result<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// File Store
// ─────────────────────────────────────────────────────────────────────────────

/// One `<key>.json` file per record inside a directory.
///
/// Writes go to `<key>.json.bak` first and are then renamed over the record,
/// so a crash mid-write leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the records.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &str) -> Result<PathBuf> {
        let key_ok = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !key_ok {
            return Err(Error::StorageWrite {
                key: key.to_string(),
                source: Box::new(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "keys may only contain ASCII letters, digits, '-' and '_'",
                )),
            });
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.record_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!("Read record '{}' from {}", key, path.display());
                Ok(Some(contents))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::StorageRead {
                key: key.to_string(),
                source: Box::new(e),
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.record_path(key)?;
        let backup_path = path.with_extension("json.bak");
        let write_error = |e: io::Error| Error::StorageWrite {
            key: key.to_string(),
            source: Box::new(e),
        };

        if !self.dir.exists() {
            debug!("Creating data directory: {}", self.dir.display());
            fs::create_dir_all(&self.dir).map_err(write_error)?;
        }

        fs::write(&backup_path, value).map_err(write_error)?;
        fs::rename(&backup_path, &path).map_err(write_error)?;

        debug!("Wrote record '{}' to {}", key, path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.record_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed record '{}'", key);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::StorageWrite {
                key: key.to_string(),
                source: Box::new(e),
            }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Store
// ─────────────────────────────────────────────────────────────────────────────

/// Records held in memory for the lifetime of the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.records.remove(key);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
