//! Configuration (layered: defaults < TOML file < environment).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::callback::Redirect;
use crate::error::CallbackError;
use crate::types::PortableDataType;

const DEFAULT_EXCHANGE_TIMEOUT_SECS: u64 = 30;
const ENV_SECRET_PREFIX: &str = "env:";

/// Where the browser is sent once a callback has been handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectTargets {
    pub error: String,
    pub continue_to_import: String,
    pub copy_in_progress: String,
}

impl Default for RedirectTargets {
    fn default() -> Self {
        Self {
            error: "/error".to_string(),
            continue_to_import: "http://localhost:3000/import".to_string(),
            copy_in_progress: "http://localhost:3000/copy".to_string(),
        }
    }
}

impl RedirectTargets {
    pub fn location(&self, redirect: Redirect) -> &str {
        match redirect {
            Redirect::Error => &self.error,
            Redirect::ContinueToImport => &self.continue_to_import,
            Redirect::CopyInProgress => &self.copy_in_progress,
        }
    }
}

/// Token-endpoint settings for one service provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub data_types: Vec<PortableDataType>,
    pub token_url: String,
    pub client_id: String,
    /// Literal secret, or `env:VAR` to read it from the environment.
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

impl ServiceConfig {
    /// Resolve the client secret to its actual value.
    pub fn resolve_client_secret(&self) -> Result<Option<String>, CallbackError> {
        match self.client_secret.as_deref() {
            None => Ok(None),
            Some(raw) => match raw.strip_prefix(ENV_SECRET_PREFIX) {
                Some(var) => std::env::var(var).map(Some).map_err(|_| {
                    CallbackError::Configuration(format!(
                        "Environment variable {var} for {} client secret not set",
                        self.name
                    ))
                }),
                None => Ok(Some(raw.to_string())),
            },
        }
    }
}

/// Settings for the callback workflow.
///
/// # Example
/// ```
/// use portability_auth::config::CallbackConfig;
///
/// let config: CallbackConfig = toml::from_str(r#"
///     exchange_timeout_secs = 10
///
///     [redirects]
///     error = "https://portability.example/error"
///
///     [[services]]
///     name = "google"
///     data_types = ["PHOTOS", "CALENDAR"]
///     token_url = "https://oauth2.googleapis.com/token"
///     client_id = "client-id"
///     client_secret = "env:GOOGLE_CLIENT_SECRET"
/// "#).unwrap();
/// assert_eq!(config.services.len(), 1);
/// assert_eq!(config.redirects.copy_in_progress, "http://localhost:3000/copy");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallbackConfig {
    pub redirects: RedirectTargets,
    /// Upper bound on one credential exchange; `0` leaves it unbounded.
    pub exchange_timeout_secs: u64,
    pub job_store_dir: Option<PathBuf>,
    pub services: Vec<ServiceConfig>,
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            redirects: RedirectTargets::default(),
            exchange_timeout_secs: DEFAULT_EXCHANGE_TIMEOUT_SECS,
            job_store_dir: None,
            services: Vec::new(),
        }
    }
}

impl CallbackConfig {
    /// Default config file path (~/.portability/config.toml).
    pub fn default_path() -> PathBuf {
        default_portability_dir().join("config.toml")
    }

    /// Load from `path` (or the default path), then overlay the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, CallbackError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_path);
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::load_from_path(&path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file.
    ///
    /// Returns defaults if the file does not exist.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, CallbackError> {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(CallbackError::Configuration(format!(
                    "Cannot read {}: {err}",
                    path.display()
                )))
            }
        };
        toml::from_str(&raw).map_err(|e| {
            CallbackError::Configuration(format!("Invalid config {}: {e}", path.display()))
        })
    }

    /// Overlay environment overrides read through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), CallbackError> {
        let redirect_mappings = [
            ("PORTABILITY_ERROR_REDIRECT", &mut self.redirects.error),
            (
                "PORTABILITY_IMPORT_REDIRECT",
                &mut self.redirects.continue_to_import,
            ),
            (
                "PORTABILITY_COPY_REDIRECT",
                &mut self.redirects.copy_in_progress,
            ),
        ];
        for (env_var, target) in redirect_mappings {
            if let Some(value) = lookup(env_var) {
                *target = value;
            }
        }

        if let Some(raw) = lookup("PORTABILITY_EXCHANGE_TIMEOUT_SECS") {
            self.exchange_timeout_secs = raw.trim().parse().map_err(|_| {
                CallbackError::Configuration(format!(
                    "PORTABILITY_EXCHANGE_TIMEOUT_SECS is not a number: {raw:?}"
                ))
            })?;
        }
        if let Some(dir) = lookup("PORTABILITY_JOB_DIR") {
            self.job_store_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    /// Reject configurations the workflow cannot run with.
    pub fn validate(&self) -> Result<(), CallbackError> {
        for (name, value) in [
            ("error", &self.redirects.error),
            ("continue_to_import", &self.redirects.continue_to_import),
            ("copy_in_progress", &self.redirects.copy_in_progress),
        ] {
            if value.trim().is_empty() {
                return Err(CallbackError::Configuration(format!(
                    "Redirect target {name} is empty"
                )));
            }
        }
        for service in &self.services {
            if service.name.trim().is_empty() {
                return Err(CallbackError::Configuration(
                    "Service with an empty name".to_string(),
                ));
            }
            if service.data_types.is_empty() {
                return Err(CallbackError::Configuration(format!(
                    "Service {} lists no data types",
                    service.name
                )));
            }
            if service.client_id.trim().is_empty() {
                return Err(CallbackError::Configuration(format!(
                    "Service {} has an empty client_id",
                    service.name
                )));
            }
            reqwest::Url::parse(&service.token_url).map_err(|e| {
                CallbackError::Configuration(format!(
                    "Service {} token_url {:?} is invalid: {e}",
                    service.name, service.token_url
                ))
            })?;
        }
        Ok(())
    }

    pub fn exchange_timeout(&self) -> Option<Duration> {
        match self.exchange_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn job_store_dir(&self) -> PathBuf {
        self.job_store_dir
            .clone()
            .unwrap_or_else(crate::store::JobStoreConfig::default_dir)
    }
}

/// Base directory for local state (~/.portability).
pub fn default_portability_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".portability"))
        .unwrap_or_else(|| PathBuf::from(".portability"))
}
