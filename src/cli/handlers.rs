//! CLI command handlers.

use std::path::Path;
use std::sync::Arc;

use crate::auth::AuthorizationResponse;
use crate::callback::CallbackOrchestrator;
use crate::config::CallbackConfig;
use crate::exchange::ExchangerRegistry;
use crate::store::{FileJobStore, JobStore, JobStoreConfig};

use super::HandleArgs;

/// Handle `portability-auth parse <URL>`.
pub fn handle_parse(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let response: AuthorizationResponse = url.parse()?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Handle `portability-auth handle <URL>`.
///
/// Prints the redirect location on success.
pub async fn handle_callback(
    config_path: Option<&Path>,
    args: &HandleArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CallbackConfig::load(config_path)?;
    if let Some(secs) = args.timeout_secs {
        config.exchange_timeout_secs = secs;
    }

    let store = Arc::new(FileJobStore::new(JobStoreConfig::new(config.job_store_dir())));
    let exchangers = Arc::new(ExchangerRegistry::from_config(&config)?);
    let orchestrator = CallbackOrchestrator::new(store, exchangers, &config);

    let (request_url, query) = split_request_url(&args.url);
    match orchestrator.handle_request(request_url, query).await {
        Ok(outcome) => {
            println!("{}", outcome.location);
            Ok(())
        }
        Err(err) => Err(format!("[{} {}] {err}", err.status_hint(), err.category()).into()),
    }
}

/// Handle `portability-auth job show <TOKEN>`.
pub async fn handle_job_show(
    config_path: Option<&Path>,
    token: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = CallbackConfig::load(config_path)?;
    let store = FileJobStore::new(JobStoreConfig::new(config.job_store_dir()));
    match store.find_job(token).await? {
        Some(job) => {
            println!("{job:#?}");
            Ok(())
        }
        None => Err(format!("No job found for token {token}").into()),
    }
}

fn split_request_url(url: &str) -> (&str, Option<&str>) {
    match url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (url, None),
    }
}
