use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{JobStore, StoreError};
use crate::types::PortabilityJob;

const JOB_FILE_VERSION: u32 = 1;
const MAX_TOKEN_LEN: usize = 128;

/// Configuration for file-backed job storage.
#[derive(Debug, Clone)]
pub struct JobStoreConfig {
    pub base_dir: PathBuf,
}

impl JobStoreConfig {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn default_dir() -> PathBuf {
        crate::config::default_portability_dir().join("jobs")
    }
}

/// File-backed job store, one TOML file per token.
///
/// Writes go through a temp file and a rename so readers never observe a
/// half-written job. Writers inside one process are serialized, which makes
/// [`replace_job`](JobStore::replace_job) a compare-and-swap for that
/// process; separate processes sharing a directory are not coordinated.
///
/// # Example
/// ```no_run
/// use portability_auth::store::{FileJobStore, JobStoreConfig};
///
/// let store = FileJobStore::new(JobStoreConfig::new("/var/lib/portability/jobs".into()));
/// ```
#[derive(Debug)]
pub struct FileJobStore {
    base_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileJobStore {
    pub fn new(config: JobStoreConfig) -> Self {
        Self {
            base_dir: config.base_dir,
            write_lock: Mutex::new(()),
        }
    }

    pub fn new_default() -> Self {
        Self::new(JobStoreConfig::new(JobStoreConfig::default_dir()))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Store a new job, overwriting any job with the same token.
    pub async fn insert_job(&self, job: &PortabilityJob) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.write(job).await
    }

    fn job_path(&self, token: &str) -> Result<PathBuf, StoreError> {
        if !is_storable_token(token) {
            return Err(StoreError::InvalidToken(token.to_string()));
        }
        Ok(self.base_dir.join(format!("{token}.toml")))
    }

    async fn read(&self, token: &str) -> Result<Option<PortabilityJob>, StoreError> {
        let path = match self.job_path(token) {
            Ok(path) => path,
            // No job can ever have been written under such a token.
            Err(StoreError::InvalidToken(_)) => return Ok(None),
            Err(err) => return Err(err),
        };
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let file: JobFile = toml::from_str(&raw)?;
        if file.version != JOB_FILE_VERSION {
            return Err(StoreError::Serialization(format!(
                "Unsupported job file version {} at {}",
                file.version,
                path.display()
            )));
        }
        Ok(Some(file.job))
    }

    async fn write(&self, job: &PortabilityJob) -> Result<(), StoreError> {
        let path = self.job_path(&job.token)?;
        let file = JobFile {
            version: JOB_FILE_VERSION,
            saved_at: Utc::now(),
            job: job.clone(),
        };
        let serialized = toml::to_string(&file)?;
        atomic_write(&path, serialized.as_bytes()).await
    }
}

#[async_trait]
impl JobStore for FileJobStore {
    async fn find_job(&self, token: &str) -> Result<Option<PortabilityJob>, StoreError> {
        self.read(token).await
    }

    async fn update_job(&self, job: &PortabilityJob) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        if self.read(&job.token).await?.is_none() {
            return Err(StoreError::NotFound {
                token: job.token.clone(),
            });
        }
        self.write(job).await
    }

    async fn replace_job(
        &self,
        current: &PortabilityJob,
        updated: &PortabilityJob,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        match self.read(&current.token).await? {
            Some(stored) if &stored == current => self.write(updated).await,
            Some(_) => Err(StoreError::Conflict {
                token: current.token.clone(),
            }),
            None => Err(StoreError::NotFound {
                token: current.token.clone(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct JobFile {
    version: u32,
    saved_at: DateTime<Utc>,
    job: PortabilityJob,
}

/// Tokens double as file names, so only a conservative alphabet is stored.
fn is_storable_token(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= MAX_TOKEN_LEN
        && token
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

async fn atomic_write(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| StoreError::Io(format!("Job path {} has no file name", path.display())))?;
    let temp_name = format!(
        ".{}.tmp-{}",
        file_name.to_string_lossy(),
        uuid::Uuid::new_v4().simple()
    );
    let temp_path = path.with_file_name(temp_name);

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let write_result = async {
        let mut temp_file = options.open(&temp_path).await?;
        temp_file.write_all(data).await?;
        temp_file.sync_all().await?;
        Ok::<(), std::io::Error>(())
    }
    .await;

    if let Err(err) = write_result {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(err.into());
    }

    if let Err(err) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(err.into());
    }

    Ok(())
}
