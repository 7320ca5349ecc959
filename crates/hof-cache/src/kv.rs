//! Key/value store with automatic serialization.

use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Type-safe key/value store.
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`. A file-backed cache rewrites the
/// whole file on every change.
#[derive(Debug)]
pub struct Cache {
    path: Option<PathBuf>,
    entries: Mutex<Map<String, Value>>,
}

impl Cache {
    /// Open a file-backed cache. A missing file is treated as empty.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open("~/.local/share/helphof/storage.json")?;
    /// ```
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Map::new(),
            Ok(bytes) => match serde_json::from_slice::<Value>(&bytes)? {
                Value::Object(map) => map,
                _ => return Err(CacheError::Corrupt(path)),
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Map::new(),
            Err(source) => return Err(CacheError::Io { path, source }),
        };
        debug!(path = %path.display(), keys = entries.len(), "Opened local storage");
        Ok(Self {
            path: Some(path),
            entries: Mutex::new(entries),
        })
    }

    /// A cache that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Mutex::new(Map::new()),
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let entries = self.lock();
        match entries.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let value = serde_json::to_value(value)?;
        let mut entries = self.lock();
        entries.insert(key.to_string(), value);
        self.flush(&entries)
    }

    /// Delete a value from the cache. Deleting a missing key is a no-op.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.lock();
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.lock().contains_key(key))
    }

    /// Get all keys in the cache, sorted.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut keys: Vec<String> = self.lock().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Map<String, Value>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn flush(&self, entries: &Map<String, Value>) -> Result<(), CacheError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let io_err = |source| CacheError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let bytes = serde_json::to_vec_pretty(entries)?;
        fs::write(path, bytes).map_err(io_err)?;
        Ok(())
    }
}
