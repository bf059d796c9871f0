use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::AppResult;
use crate::store::Coordinator;

/// A record addressable by a string id.
pub trait Record {
    fn id(&self) -> &str;
}

/// Generic CRUD over one collection key. Every mutating call goes through the
/// [`Coordinator`]'s read-modify-write cycle.
pub struct Repository<T> {
    coordinator: Coordinator,
    key: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            coordinator: self.coordinator.clone(),
            key: self.key.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(coordinator: Coordinator, key: impl Into<String>) -> Self {
        Self {
            coordinator,
            key: key.into(),
            _record: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn list(&self) -> AppResult<Vec<T>> {
        self.coordinator.snapshot(&self.key)
    }

    /// Pure read-side projection; nothing is persisted.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> AppResult<Vec<T>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|item| predicate(item))
            .collect())
    }

    pub fn insert(&self, item: T) -> AppResult<()> {
        self.coordinator.mutate(&self.key, |items: &mut Vec<T>| {
            items.push(item);
            Ok(())
        })
    }

    /// Replaces every item matching `predicate` with `patch(item)`. Returns the match count.
    pub fn update(
        &self,
        predicate: impl Fn(&T) -> bool,
        patch: impl Fn(&T) -> T,
    ) -> AppResult<usize> {
        self.coordinator.mutate(&self.key, |items: &mut Vec<T>| {
            let mut matched = 0;
            for item in items.iter_mut().filter(|item| predicate(item)) {
                *item = patch(item);
                matched += 1;
            }
            Ok(matched)
        })
    }

    /// Drops every item matching `predicate`. Returns how many were removed.
    pub fn remove(&self, predicate: impl Fn(&T) -> bool) -> AppResult<usize> {
        self.coordinator.mutate(&self.key, |items: &mut Vec<T>| {
            let before = items.len();
            items.retain(|item| !predicate(item));
            Ok(before - items.len())
        })
    }

    /// Escape hatch for positional edits that need the whole snapshot.
    pub fn mutate<R>(&self, transform: impl FnOnce(&mut Vec<T>) -> AppResult<R>) -> AppResult<R> {
        self.coordinator.mutate(&self.key, transform)
    }

    /// Removes the key entirely.
    pub fn clear(&self) -> AppResult<()> {
        self.coordinator.clear(&self.key)
    }
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned + Clone + Record,
{
    /// Empty ids never match; legacy records without an id are unaddressable.
    pub fn find_by_id(&self, id: &str) -> AppResult<Option<T>> {
        if id.is_empty() {
            return Ok(None);
        }
        Ok(self.list()?.into_iter().find(|item| item.id() == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::KvStore;
    use crate::models::job::Job;

    fn job(id: &str, title: &str) -> Job {
        Job::new(id, title, "")
    }

    fn repo() -> Repository<Job> {
        Repository::new(Coordinator::new(KvStore::in_memory()), "jobsData")
    }

    #[test]
    fn test_insert_preserves_order() {
        let repo = repo();
        repo.insert(job("1", "Engineer")).unwrap();
        repo.insert(job("2", "Designer")).unwrap();
        let ids: Vec<_> = repo.list().unwrap().into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_update_counts_matches() {
        let repo = repo();
        repo.insert(job("1", "Engineer")).unwrap();
        repo.insert(job("2", "Designer")).unwrap();
        let matched = repo
            .update(
                |j| j.id == "2",
                |j| Job {
                    title: "Product Designer".into(),
                    ..j.clone()
                },
            )
            .unwrap();
        assert_eq!(matched, 1);
        assert_eq!(
            repo.find_by_id("2").unwrap().unwrap().title,
            "Product Designer"
        );
        assert_eq!(repo.find_by_id("1").unwrap().unwrap().title, "Engineer");
    }

    #[test]
    fn test_identical_patch_leaves_bytes_equal() {
        let repo = repo();
        repo.insert(job("1", "Engineer")).unwrap();
        let before = repo.coordinator.kv().get_raw("jobsData").unwrap();
        repo.update(|j| j.id == "1", |j| j.clone()).unwrap();
        let after = repo.coordinator.kv().get_raw("jobsData").unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_and_filter() {
        let repo = repo();
        repo.insert(job("1", "Engineer")).unwrap();
        repo.insert(job("2", "Designer")).unwrap();
        repo.insert(job("3", "Engineer II")).unwrap();

        let engineers = repo.filter(|j| j.title.starts_with("Engineer")).unwrap();
        assert_eq!(engineers.len(), 2);

        assert_eq!(repo.remove(|j| j.id == "1").unwrap(), 1);
        assert_eq!(repo.remove(|j| j.id == "missing").unwrap(), 0);
        assert_eq!(repo.list().unwrap().len(), 2);
    }

    #[test]
    fn test_find_by_empty_id_never_matches() {
        let repo = repo();
        repo.insert(job("", "Untracked")).unwrap();
        assert!(repo.find_by_id("").unwrap().is_none());
    }
}
