#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Barrier;

use portability_auth::exchange::{CredentialExchanger, ExchangeError};
use portability_auth::store::{InMemoryJobStore, JobStore, StoreError};
use portability_auth::types::{AuthData, PortabilityJob};

/// What a [`RecordingExchanger`] does once it has recorded a call.
pub enum Behavior {
    /// Return `AuthData::token("access-for-<code>")`.
    Succeed,
    Fail(String),
    /// Sleep for an hour before succeeding.
    Stall,
    /// Wait until every party of the barrier has arrived, then succeed.
    Gate(Arc<Barrier>),
}

pub struct RecordingExchanger {
    calls: Mutex<Vec<(String, String)>>,
    behavior: Behavior,
}

impl RecordingExchanger {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            behavior,
        }
    }

    pub fn succeeding() -> Self {
        Self::new(Behavior::Succeed)
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock poisoned").len()
    }
}

pub fn issued_for(code: &str) -> AuthData {
    AuthData::token(format!("access-for-{code}"))
}

#[async_trait]
impl CredentialExchanger for RecordingExchanger {
    async fn exchange(
        &self,
        code: &str,
        correlation_token: &str,
    ) -> Result<AuthData, ExchangeError> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push((code.to_string(), correlation_token.to_string()));
        match &self.behavior {
            Behavior::Succeed => Ok(issued_for(code)),
            Behavior::Fail(error) => Err(ExchangeError::Rejected {
                error: error.clone(),
                description: None,
            }),
            Behavior::Stall => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(issued_for(code))
            }
            Behavior::Gate(barrier) => {
                barrier.wait().await;
                Ok(issued_for(code))
            }
        }
    }
}

/// In-memory store that counts reads and writes.
#[derive(Default)]
pub struct CountingJobStore {
    pub inner: InMemoryJobStore,
    finds: AtomicUsize,
    writes: AtomicUsize,
}

impl CountingJobStore {
    pub fn with_job(job: PortabilityJob) -> Self {
        let store = Self::default();
        store.inner.insert(job);
        store
    }

    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn get(&self, token: &str) -> Option<PortabilityJob> {
        self.inner.get(token)
    }
}

#[async_trait]
impl JobStore for CountingJobStore {
    async fn find_job(&self, token: &str) -> Result<Option<PortabilityJob>, StoreError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find_job(token).await
    }

    async fn update_job(&self, job: &PortabilityJob) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update_job(job).await
    }

    async fn replace_job(
        &self,
        current: &PortabilityJob,
        updated: &PortabilityJob,
    ) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.replace_job(current, updated).await
    }
}

/// The job used throughout the callback scenarios.
pub fn photos_job() -> PortabilityJob {
    PortabilityJob::builder()
        .token("abc123")
        .data_type("PHOTOS")
        .export_service("google")
        .import_service("")
        .build()
}
