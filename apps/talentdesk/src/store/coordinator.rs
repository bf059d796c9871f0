use std::sync::{Arc, Mutex};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::errors::{AppResult, StoreError};
use crate::kv::KvStore;

/// Owner of the serialized collection bytes.
///
/// Every mutation runs read-snapshot → transform → write-snapshot for one key.
/// Calls through the same coordinator (or its clones) are serialized by an
/// internal lock; coordinators built over the same backend independently are
/// last-writer-wins per key with no merging.
#[derive(Clone)]
pub struct Coordinator {
    kv: KvStore,
    gate: Arc<Mutex<()>>,
}

impl Coordinator {
    pub fn new(kv: KvStore) -> Self {
        Self {
            kv,
            gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn kv(&self) -> &KvStore {
        &self.kv
    }

    /// Latest persisted snapshot for `key`. Absent key yields an empty collection.
    pub fn snapshot<T: DeserializeOwned>(&self, key: &str) -> AppResult<Vec<T>> {
        Ok(self.kv.get_collection(key)?)
    }

    /// Applies `transform` to the latest snapshot of `key` and persists the result.
    ///
    /// If `transform` fails nothing is written. If the serialized result equals
    /// what is already stored (or the key is absent and the result is empty) the
    /// write is skipped, so no-op mutations leave the store byte-identical.
    pub fn mutate<T, R, F>(&self, key: &str, transform: F) -> AppResult<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> AppResult<R>,
    {
        let _guard = self.gate.lock().map_err(|_| StoreError::Poisoned)?;

        let before = self.kv.get_raw(key)?;
        let mut items: Vec<T> = self.kv.get_collection(key)?;
        let result = transform(&mut items)?;

        let after = serde_json::to_string(&items).map_err(StoreError::from)?;
        let unchanged = match before.as_deref() {
            Some(raw) => raw == after,
            None => items.is_empty(),
        };

        if unchanged {
            debug!("No change for '{key}', skipping write");
        } else {
            self.kv.set_collection(key, &items)?;
            debug!("Persisted '{key}' ({} records)", items.len());
        }

        Ok(result)
    }

    /// Writes `init()` under `key` only if the key has never been written.
    /// The absence check and the write happen under the same lock.
    pub fn init_if_absent<T, F>(&self, key: &str, init: F) -> AppResult<bool>
    where
        T: Serialize,
        F: FnOnce() -> Vec<T>,
    {
        let _guard = self.gate.lock().map_err(|_| StoreError::Poisoned)?;
        if self.kv.contains(key)? {
            return Ok(false);
        }
        let items = init();
        self.kv.set_collection(key, &items)?;
        debug!("Initialized '{key}' ({} records)", items.len());
        Ok(true)
    }

    /// Drops the whole collection stored under `key`.
    pub fn clear(&self, key: &str) -> AppResult<()> {
        let _guard = self.gate.lock().map_err(|_| StoreError::Poisoned)?;
        self.kv.remove(key)?;
        debug!("Cleared '{key}'");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[test]
    fn test_failed_transform_writes_nothing() {
        let coordinator = Coordinator::new(KvStore::in_memory());
        coordinator
            .mutate::<String, _, _>("k", |items| {
                items.push("a".into());
                Ok(())
            })
            .unwrap();

        let err = coordinator
            .mutate::<String, (), _>("k", |items| {
                items.push("b".into());
                Err(AppError::EmptyQuestion)
            })
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyQuestion));

        let items: Vec<String> = coordinator.snapshot("k").unwrap();
        assert_eq!(items, vec!["a"]);
    }

    #[test]
    fn test_noop_on_absent_key_does_not_create_it() {
        let coordinator = Coordinator::new(KvStore::in_memory());
        coordinator
            .mutate::<String, _, _>("k", |items| {
                items.retain(|s| s != "x");
                Ok(())
            })
            .unwrap();
        assert!(!coordinator.kv().contains("k").unwrap());
    }

    #[test]
    fn test_independent_coordinators_are_last_writer_wins() {
        let kv = KvStore::in_memory();
        let first = Coordinator::new(kv.clone());
        let second = Coordinator::new(kv.clone());

        // Both read the same empty snapshot before either writes.
        let stale: Vec<String> = first.snapshot("k").unwrap();
        second
            .mutate::<String, _, _>("k", |items| {
                items.push("from-second".into());
                Ok(())
            })
            .unwrap();
        let mut overwritten = stale;
        overwritten.push("from-first".into());
        kv.set_collection("k", &overwritten).unwrap();

        let items: Vec<String> = first.snapshot("k").unwrap();
        assert_eq!(items, vec!["from-first"]);
    }

    #[test]
    fn test_mutate_reads_latest_persisted_snapshot() {
        let kv = KvStore::in_memory();
        let coordinator = Coordinator::new(kv.clone());
        kv.set_collection("k", &["external".to_string()]).unwrap();
        coordinator
            .mutate::<String, _, _>("k", |items| {
                items.push("mine".into());
                Ok(())
            })
            .unwrap();
        let items: Vec<String> = coordinator.snapshot("k").unwrap();
        assert_eq!(items, vec!["external", "mine"]);
    }

    #[test]
    fn test_init_if_absent_runs_once_across_threads() {
        let coordinator = Coordinator::new(KvStore::in_memory());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let coordinator = coordinator.clone();
                std::thread::spawn(move || {
                    coordinator
                        .init_if_absent("k", || vec![format!("seed-{i}")])
                        .unwrap()
                })
            })
            .collect();
        let written = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&w| w)
            .count();
        assert_eq!(written, 1);
        let items: Vec<String> = coordinator.snapshot("k").unwrap();
        assert_eq!(items.len(), 1);
    }
}
