use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{JobStore, StoreError};
use crate::types::PortabilityJob;

/// Process-local job store.
///
/// # Example
/// ```
/// use portability_auth::store::InMemoryJobStore;
/// use portability_auth::types::PortabilityJob;
///
/// let store = InMemoryJobStore::new();
/// store.insert(PortabilityJob::builder().token("abc123").data_type("PHOTOS").build());
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: Mutex<HashMap<String, PortabilityJob>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a job.
    pub fn insert(&self, job: PortabilityJob) {
        self.lock().insert(job.token.clone(), job);
    }

    /// Snapshot of the stored job without going through the async trait.
    pub fn get(&self, token: &str) -> Option<PortabilityJob> {
        self.lock().get(token).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, PortabilityJob>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn find_job(&self, token: &str) -> Result<Option<PortabilityJob>, StoreError> {
        Ok(self.get(token))
    }

    async fn update_job(&self, job: &PortabilityJob) -> Result<(), StoreError> {
        let mut jobs = self.lock();
        match jobs.get_mut(&job.token) {
            Some(slot) => {
                *slot = job.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                token: job.token.clone(),
            }),
        }
    }

    async fn replace_job(
        &self,
        current: &PortabilityJob,
        updated: &PortabilityJob,
    ) -> Result<(), StoreError> {
        let mut jobs = self.lock();
        match jobs.get_mut(&current.token) {
            Some(slot) if slot == current => {
                *slot = updated.clone();
                Ok(())
            }
            Some(_) => Err(StoreError::Conflict {
                token: current.token.clone(),
            }),
            None => Err(StoreError::NotFound {
                token: current.token.clone(),
            }),
        }
    }
}
