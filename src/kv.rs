//! Durable key-value byte stores the persistence layer writes through.
use std::{
    collections::HashMap,
    fs,
    io::{ErrorKind, Write},
    path::PathBuf,
};

use log::{debug, error, trace};
use tempfile::NamedTempFile;

use crate::{NoteError, Result};

/// A flat store of named byte entries.
pub trait KeyValueStore {
    /// Reads the entry stored under `key`, or `None` when it doesn't exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replaces the entry stored under `key`.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<()>;
}

/// In-memory store, optionally limited to a total number of bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects any write pushing the total size of all entries
    /// past `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(quota),
        }
    }

    fn stored_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(_, v)| v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        if let Some(quota) = self.quota {
            let requested = self.stored_bytes_excluding(key) + value.len();
            if requested > quota {
                return Err(NoteError::QuotaExceeded {
                    key: key.to_string(),
                    requested,
                    quota,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// Directory-backed store: each key lives in `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Helper method to get the file path for an entry
    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.entry_path(key);
        match fs::read(&path) {
            Ok(bytes) => {
                trace!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                Err(NoteError::Io(e))
            }
        }
    }

    /// Writes through a temporary file in the same directory, then moves it
    /// over the target so readers never see a partial entry.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        if !self.root.exists() {
            debug!("Creating store directory: {}", self.root.display());
            fs::create_dir_all(&self.root).map_err(|e| {
                error!("Failed to create directory {}: {}", self.root.display(), e);
                NoteError::DirectoryError {
                    path: self.root.clone(),
                }
            })?;
        }

        let path = self.entry_path(key);
        let mut temp_file = NamedTempFile::new_in(&self.root).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            NoteError::Io(e)
        })?;

        temp_file.write_all(value)?;
        temp_file.flush()?;

        temp_file.persist(&path).map_err(|e| {
            error!("Failed to persist file {}: {}", path.display(), e.error);
            NoteError::Io(e.error)
        })?;

        trace!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}
