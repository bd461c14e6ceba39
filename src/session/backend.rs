//! Durable key/value persistence for session records. The console keeps the
//! session the way the browser build kept localStorage: a small shared store
//! of string records that survives restarts. The backend is injectable so the
//! session layer does not care whether records live in a file, in memory, or
//! somewhere else entirely.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// String key/value storage with durable writes.
///
/// A missing record is a normal state (first run, cleared session), never an
/// error. Multi-key operations must land in one durable write so a session is
/// observed either fully present or fully absent.
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    /// Returns an error if the write cannot be made durable.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// # Errors
    /// Returns an error if the removal cannot be made durable.
    fn remove(&self, key: &str) -> Result<()>;

    /// Store several records in one durable write.
    ///
    /// # Errors
    /// Returns an error if the write cannot be made durable.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()>;

    /// Remove several records in one durable write.
    ///
    /// # Errors
    /// Returns an error if the removal cannot be made durable.
    fn remove_many(&self, keys: &[&str]) -> Result<()>;
}

/// File-backed store: one JSON object per file, one property per record.
///
/// An unreadable or unparsable file degrades to an empty store; the console
/// must come up signed-out rather than refuse to start.
pub struct FileBackend {
    path: PathBuf,
    records: RwLock<HashMap<String, String>>,
}

impl FileBackend {
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = load_records(&path);
        Self {
            path,
            records: RwLock::new(records),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create session directory {}", parent.display())
                })?;
            }
        }
        let encoded = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, encoded)
            .with_context(|| format!("Failed to write session file {}", self.path.display()))
    }
}

fn load_records(path: &Path) -> HashMap<String, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return HashMap::new(),
    };

    match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(err) => {
            debug!("Discarding unreadable session file {}: {err}", path.display());
            HashMap::new()
        }
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value)])
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.remove_many(&[key])
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for (key, value) in entries {
            records.insert((*key).to_string(), (*value).to_string());
        }
        self.persist(&records)
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let mut changed = false;
        for key in keys {
            changed |= records.remove(*key).is_some();
        }
        if !changed {
            return Ok(());
        }
        self.persist(&records)
    }
}

/// In-process store for tests and short-lived embeddings.
#[derive(Default)]
pub struct MemoryBackend {
    records: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value)])
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.remove_many(&[key])
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for (key, value) in entries {
            records.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for key in keys {
            records.remove(*key);
        }
        Ok(())
    }
}
