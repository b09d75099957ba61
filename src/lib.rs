//! OAuth callback handling for data-portability jobs.
//!
//! A portability job moves one category of data from an export service to
//! an import service. Each side is authorized through an OAuth
//! authorization-code redirect; this crate handles that redirect: it finds the
//! job named by the `state` parameter, works out which leg the redirect
//! completes, trades the code for credentials and stores them on the job.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use portability_auth::prelude::*;
//!
//! # async fn example() -> portability_auth::error::Result<()> {
//! let config = CallbackConfig::load(None)?;
//! let orchestrator = CallbackOrchestrator::new(
//!     Arc::new(FileJobStore::new(JobStoreConfig::new(config.job_store_dir()))),
//!     Arc::new(ExchangerRegistry::from_config(&config)?),
//!     &config,
//! );
//! let outcome = orchestrator
//!     .handle_request("https://portability.example/callback/google", Some("code=xyz&state=abc123"))
//!     .await?;
//! println!("303 -> {}", outcome.location);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod callback;
pub mod config;
pub mod error;
pub mod exchange;
pub mod prelude;
pub mod store;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
