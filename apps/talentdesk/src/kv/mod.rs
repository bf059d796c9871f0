//! Key-value store adapter.
//!
//! The persistence substrate is a flat map of string keys to string values,
//! the same shape as browser local storage. [`KvBackend`] is that substrate;
//! [`KvStore`] layers JSON (de)serialization and "absent key means empty
//! collection" on top of it.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::errors::StoreError;

pub mod file;
pub mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

/// Raw string storage. Every `set` replaces the prior value for the key entirely.
/// Operations on different keys are independent; there is no multi-key atomicity.
pub trait KvBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// JSON view over a [`KvBackend`]. Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct KvStore {
    backend: Arc<dyn KvBackend>,
}

impl KvStore {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::default()))
    }

    /// Reads the collection stored under `key`.
    /// A missing key or a JSON `null` yields an empty vector.
    pub fn get_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        let parsed: Option<Option<Vec<T>>> = self.get_value(key)?;
        Ok(parsed.flatten().unwrap_or_default())
    }

    /// Serializes `items` and replaces whatever was under `key`.
    pub fn set_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        self.set_value(key, items)
    }

    pub fn get_value<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw).map(Some).map_err(|e| {
            warn!("Unreadable value under '{key}': {e}");
            StoreError::Corrupt {
                key: key.to_string(),
            }
        })
    }

    pub fn set_value<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, raw)
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.backend.remove(key)
    }

    pub fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.backend.get(key)?.is_some())
    }

    /// Serialized bytes exactly as persisted.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.backend.get(key)
    }

    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.backend.keys()
    }
}
