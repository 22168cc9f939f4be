//! Key-value persistence adapters.
//!
//! The repository serializes whole collections into string values; adapters
//! only move strings in and out of a backing medium.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::errors::StoreResult;

/// String-keyed persistence backend
///
/// A failed write leaves the adapter's previous contents in place.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> StoreResult<()>;
    fn remove(&mut self, key: &str) -> StoreResult<()>;

    /// Write several keys as one unit: all of them or none.
    ///
    /// The default writes in order and restores earlier keys when a later
    /// write fails. Adapters that can write everything at once override it.
    fn set_many(&mut self, entries: Vec<(&str, String)>) -> StoreResult<()> {
        let mut written: Vec<(&str, Option<String>)> = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let previous = self.get(key)?;
            if let Err(err) = self.set(key, value) {
                for (key, previous) in written.into_iter().rev() {
                    let restored = match previous {
                        Some(value) => self.set(key, value),
                        None => self.remove(key),
                    };
                    if let Err(e) = restored {
                        tracing::error!("Failed to restore key {} after write error: {}", key, e);
                    }
                }
                return Err(err);
            }
            written.push((key, previous));
        }
        Ok(())
    }
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for Box<K> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn set_many(&mut self, entries: Vec<(&str, String)>) -> StoreResult<()> {
        (**self).set_many(entries)
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Volatile adapter for tests and throwaway sessions
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    entries: FxHashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

// ============================================================================
// JSON file
// ============================================================================

/// All entries in one JSON object on disk.
///
/// Every write serializes a copy of the map with the change applied, writes it
/// through a sibling temp file and a rename, and only then replaces the
/// in-memory map. A failed write changes neither the file nor the map.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!("Opened key-value file {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    fn write_file(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn commit(&mut self, next: BTreeMap<String, String>) -> StoreResult<()> {
        self.write_file(&next)?;
        self.entries = next;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> StoreResult<()> {
        self.set_many(vec![(key, value)])
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.remove(key);
        self.commit(next)
    }

    /// One file write for the whole batch.
    fn set_many(&mut self, entries: Vec<(&str, String)>) -> StoreResult<()> {
        let mut next = self.entries.clone();
        for (key, value) in entries {
            next.insert(key.to_string(), value);
        }
        self.commit(next)
    }
}
