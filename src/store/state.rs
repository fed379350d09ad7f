//! Key-value state stores
//!
//! Both permission stores persist through this interface so tests can
//! substitute an in-memory fake. Keys are file paths for the file-backed
//! implementation and opaque strings for the in-memory one.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use crate::core::BrokerResult;

/// Abstracted store for persisted permission state
///
/// `update` runs the closure under the store's lock: the value it returns
/// replaces the stored one atomically, so a read-modify-write cannot lose a
/// concurrent update. Returning `None` leaves the stored value unchanged.
pub trait StateStore: Send + Sync {
    /// Read the value at `key`, if present
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` at `key`, replacing any previous value
    fn put(&self, key: &str, value: &str) -> BrokerResult<()>;

    /// Atomically read, transform, and write the value at `key`
    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<String>) -> Option<String>,
    ) -> BrokerResult<()>;
}

/// File-backed store with single-writer discipline
///
/// Writes go through a temp file in the same directory followed by a rename,
/// so readers never observe a half-written file.
#[derive(Debug, Default)]
pub struct FileStore {
    lock: Mutex<()>,
}

impl FileStore {
    /// Create a new file-backed store
    pub fn new() -> Self {
        Self {
            lock: Mutex::new(()),
        }
    }

    fn read_file(key: &str) -> Option<String> {
        fs::read_to_string(key).ok()
    }

    fn write_file(key: &str, value: &str) -> BrokerResult<()> {
        let path = Path::new(key);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self
            .lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Self::read_file(key)
    }

    fn put(&self, key: &str, value: &str) -> BrokerResult<()> {
        let _guard = self
            .lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Self::write_file(key, value)
    }

    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<String>) -> Option<String>,
    ) -> BrokerResult<()> {
        let _guard = self
            .lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let current = Self::read_file(key);
        if let Some(next) = apply(current) {
            Self::write_file(key, &next)?;
        }
        Ok(())
    }
}

/// In-memory store for tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, value: &str) -> BrokerResult<()> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<String>) -> Option<String>,
    ) -> BrokerResult<()> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let current = entries.get(key).cloned();
        if let Some(next) = apply(current) {
            entries.insert(key.to_string(), next);
        }
        Ok(())
    }
}
