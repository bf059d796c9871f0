use std::sync::Arc;

use crate::kv::{KvBackend, KvStore};
use crate::models::{AssessmentQuestion, Candidate, Job};
use crate::store::{questions_key, Coordinator, Repository, CANDIDATES_KEY, JOBS_KEY};

/// Shared handle passed to every data-layer operation.
/// Clones share the same coordinator and therefore the same write lock.
#[derive(Clone)]
pub struct DeskState {
    pub coordinator: Coordinator,
}

impl DeskState {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            coordinator: Coordinator::new(KvStore::new(backend)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            coordinator: Coordinator::new(KvStore::in_memory()),
        }
    }

    pub fn kv(&self) -> &KvStore {
        self.coordinator.kv()
    }

    pub fn jobs(&self) -> Repository<Job> {
        Repository::new(self.coordinator.clone(), JOBS_KEY)
    }

    pub fn candidates(&self) -> Repository<Candidate> {
        Repository::new(self.coordinator.clone(), CANDIDATES_KEY)
    }

    pub fn questions(&self, job_id: &str) -> Repository<AssessmentQuestion> {
        Repository::new(self.coordinator.clone(), questions_key(job_id))
    }
}
