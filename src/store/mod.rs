//! Job storage abstraction and bundled implementations.

pub mod file;
pub mod memory;

pub use file::{FileJobStore, JobStoreConfig};
pub use memory::InMemoryJobStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::PortabilityJob;

/// Failures reported by a [`JobStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Job {token} not found")]
    NotFound { token: String },
    #[error("Job {token} changed since it was read")]
    Conflict { token: String },
    #[error("Token {0:?} cannot be used as a job key")]
    InvalidToken(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(error: toml::de::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(error: toml::ser::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Storage for portability jobs keyed by their opaque token.
///
/// The store is the sole arbiter of a job's consistency; callers hand back
/// full replacements rather than patches.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Look up a job by token. `Ok(None)` when no such job exists.
    async fn find_job(&self, token: &str) -> Result<Option<PortabilityJob>, StoreError>;

    /// Replace the stored job that has `job.token`.
    async fn update_job(&self, job: &PortabilityJob) -> Result<(), StoreError>;

    /// Replace `current` with `updated` only if the stored job still equals
    /// `current`, failing with [`StoreError::Conflict`] otherwise.
    ///
    /// The default performs a plain [`update_job`](Self::update_job) and so
    /// offers no protection against concurrent writers.
    async fn replace_job(
        &self,
        current: &PortabilityJob,
        updated: &PortabilityJob,
    ) -> Result<(), StoreError> {
        let _ = current;
        self.update_job(updated).await
    }
}
