use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::{CallbackOutcome, CallbackStage, Redirect};
use crate::auth::{parse_callback, AuthorizationResponse};
use crate::config::{CallbackConfig, RedirectTargets};
use crate::error::{CallbackError, Result};
use crate::exchange::ExchangerRegistry;
use crate::store::JobStore;
use crate::types::{Leg, PortableDataType};
use crate::util::timeout::{with_cancellation, with_timeout};

/// Drives one provider callback from parsed response to redirect decision.
///
/// Per invocation it performs at most one job lookup, at most one credential
/// exchange and at most one job write. Failures other than a provider-reported
/// error are returned to the caller, which picks the HTTP response.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use portability_auth::callback::CallbackOrchestrator;
/// use portability_auth::config::CallbackConfig;
/// use portability_auth::exchange::ExchangerRegistry;
/// use portability_auth::store::InMemoryJobStore;
///
/// # async fn example() -> portability_auth::error::Result<()> {
/// let config = CallbackConfig::default();
/// let orchestrator = CallbackOrchestrator::new(
///     Arc::new(InMemoryJobStore::new()),
///     Arc::new(ExchangerRegistry::from_config(&config)?),
///     &config,
/// );
/// let outcome = orchestrator
///     .handle_request("https://portability.example/callback/google", Some("code=xyz&state=abc123"))
///     .await?;
/// println!("redirect to {}", outcome.location);
/// # Ok(())
/// # }
/// ```
pub struct CallbackOrchestrator {
    store: Arc<dyn JobStore>,
    exchangers: Arc<ExchangerRegistry>,
    redirects: RedirectTargets,
    exchange_timeout: Option<Duration>,
}

impl CallbackOrchestrator {
    pub fn new(
        store: Arc<dyn JobStore>,
        exchangers: Arc<ExchangerRegistry>,
        config: &CallbackConfig,
    ) -> Self {
        Self {
            store,
            exchangers,
            redirects: config.redirects.clone(),
            exchange_timeout: config.exchange_timeout(),
        }
    }

    pub fn with_redirects(mut self, redirects: RedirectTargets) -> Self {
        self.redirects = redirects;
        self
    }

    /// Bound each credential exchange; `None` waits indefinitely.
    pub fn with_exchange_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.exchange_timeout = timeout;
        self
    }

    /// Parse a raw callback request and handle it.
    pub async fn handle_request(
        &self,
        request_url: &str,
        query: Option<&str>,
    ) -> Result<CallbackOutcome> {
        let response = parse_callback(request_url, query).map_err(|err| {
            tracing::warn!(url = %request_url, error = %err, "rejecting malformed callback");
            err
        })?;
        self.handle_callback(&response).await
    }

    /// Handle a parsed provider callback.
    pub async fn handle_callback(&self, response: &AuthorizationResponse) -> Result<CallbackOutcome> {
        self.run(response, None).await
    }

    /// Like [`handle_callback`](Self::handle_callback), abandoning the
    /// credential exchange once `cancel` fires.
    pub async fn handle_callback_with_cancel(
        &self,
        response: &AuthorizationResponse,
        cancel: &CancellationToken,
    ) -> Result<CallbackOutcome> {
        self.run(response, Some(cancel)).await
    }

    async fn run(
        &self,
        response: &AuthorizationResponse,
        cancel: Option<&CancellationToken>,
    ) -> Result<CallbackOutcome> {
        let mut stage = CallbackStage::Received;
        let result = self.advance(response, cancel, &mut stage).await;
        if let Err(err) = &result {
            let category = err.category();
            tracing::warn!(
                stage = %stage,
                category = %category,
                token = response.state().unwrap_or_default(),
                error = %err,
                "callback failed"
            );
        }
        result
    }

    async fn advance(
        &self,
        response: &AuthorizationResponse,
        cancel: Option<&CancellationToken>,
        stage: &mut CallbackStage,
    ) -> Result<CallbackOutcome> {
        if let Some(error) = response.error() {
            *stage = CallbackStage::Validated;
            tracing::warn!(
                error,
                description = response.error_description().unwrap_or_default(),
                token = response.state().unwrap_or_default(),
                "authorization denied by provider"
            );
            return Ok(self.outcome(Redirect::Error, None));
        }

        let token = response
            .state()
            .filter(|token| !token.is_empty())
            .ok_or(CallbackError::MissingToken)?;
        self.enter(stage, CallbackStage::Validated, token);

        let job = self
            .store
            .find_job(token)
            .await?
            .ok_or_else(|| CallbackError::JobNotFound {
                token: token.to_string(),
            })?;
        self.enter(stage, CallbackStage::JobResolved, token);

        let data_type = PortableDataType::parse(&job.data_type)?;
        let leg = Leg::infer(&job);
        let service = job
            .service(leg)
            .ok_or_else(|| CallbackError::MissingService {
                token: token.to_string(),
                leg,
            })?;
        tracing::debug!(token, %data_type, %leg, service, "callback direction determined");
        self.enter(stage, CallbackStage::DirectionDetermined, token);

        let code = response.code().filter(|code| !code.is_empty()).ok_or_else(|| {
            CallbackError::MalformedCallback("authorization response carries no code".to_string())
        })?;
        let exchanger = self.exchangers.resolve(service, data_type)?;
        let exchange = async {
            exchanger
                .exchange(code, token)
                .await
                .map_err(|source| CallbackError::CredentialExchange {
                    service: service.to_string(),
                    source,
                })
        };
        let auth_data =
            with_cancellation(cancel, with_timeout(self.exchange_timeout, exchange)).await?;
        self.enter(stage, CallbackStage::CredentialsExchanged, token);

        let updated = job.with_auth_data(leg, auth_data);
        self.store.replace_job(&job, &updated).await?;
        self.enter(stage, CallbackStage::JobUpdated, token);

        let outcome = self.outcome(Redirect::after(leg), Some(leg));
        self.enter(stage, CallbackStage::RedirectDecided, token);
        tracing::info!(
            token,
            %leg,
            service,
            redirect = %outcome.redirect,
            "stored credentials for job"
        );
        Ok(outcome)
    }

    fn enter(&self, stage: &mut CallbackStage, next: CallbackStage, token: &str) {
        *stage = next;
        tracing::debug!(token, stage = %next, "callback stage");
    }

    fn outcome(&self, redirect: Redirect, leg: Option<Leg>) -> CallbackOutcome {
        CallbackOutcome {
            redirect,
            location: self.redirects.location(redirect).to_string(),
            leg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::{CredentialExchanger, ExchangeError};
    use crate::store::InMemoryJobStore;
    use crate::types::{AuthData, PortabilityJob};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl CredentialExchanger for Recorder {
        async fn exchange(
            &self,
            code: &str,
            correlation_token: &str,
        ) -> std::result::Result<AuthData, ExchangeError> {
            self.calls
                .lock()
                .unwrap()
                .push((code.to_string(), correlation_token.to_string()));
            Ok(AuthData::token(format!("access-for-{code}")))
        }
    }

    fn setup(job: PortabilityJob) -> (Arc<InMemoryJobStore>, Arc<Recorder>, CallbackOrchestrator) {
        let store = Arc::new(InMemoryJobStore::new());
        store.insert(job);
        let recorder = Arc::new(Recorder::default());
        let mut registry = ExchangerRegistry::new();
        registry.register("google", &[PortableDataType::Photos], recorder.clone());
        registry.register("flickr", &[PortableDataType::Photos], recorder.clone());
        let orchestrator = CallbackOrchestrator::new(
            store.clone(),
            Arc::new(registry),
            &CallbackConfig::default(),
        );
        (store, recorder, orchestrator)
    }

    fn job() -> PortabilityJob {
        PortabilityJob::builder()
            .token("abc123")
            .data_type("PHOTOS")
            .export_service("google")
            .import_service("flickr")
            .build()
    }

    #[tokio::test]
    async fn export_then_import_walks_both_legs() {
        let (store, recorder, orchestrator) = setup(job());

        let first = orchestrator
            .handle_callback(&AuthorizationResponse::granted("c1", Some("abc123".into())))
            .await
            .unwrap();
        assert_eq!(first.redirect, Redirect::ContinueToImport);
        assert_eq!(first.leg, Some(Leg::Export));

        let second = orchestrator
            .handle_callback(&AuthorizationResponse::granted("c2", Some("abc123".into())))
            .await
            .unwrap();
        assert_eq!(second.redirect, Redirect::CopyInProgress);
        assert_eq!(second.location, "http://localhost:3000/copy");
        assert_eq!(second.leg, Some(Leg::Import));

        let stored = store.get("abc123").unwrap();
        assert_eq!(stored.export_auth_data, Some(AuthData::token("access-for-c1")));
        assert_eq!(stored.import_auth_data, Some(AuthData::token("access-for-c2")));
        assert_eq!(recorder.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn token_is_looked_up_verbatim() {
        let (_store, recorder, orchestrator) = setup(job());
        let err = orchestrator
            .handle_callback(&AuthorizationResponse::granted("c", Some(" abc123 ".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, CallbackError::JobNotFound { ref token } if token == " abc123 "));
        assert!(recorder.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_code_is_malformed() {
        let (store, recorder, orchestrator) = setup(job());
        let err = orchestrator
            .handle_callback(&AuthorizationResponse::granted("", Some("abc123".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, CallbackError::MalformedCallback(_)));
        assert!(recorder.calls.lock().unwrap().is_empty());
        assert!(store.get("abc123").unwrap().export_auth_data.is_none());
    }

    #[tokio::test]
    async fn unregistered_service_is_not_found() {
        let (store, _recorder, orchestrator) = setup(PortabilityJob {
            export_service: Some("dropbox".to_string()),
            ..job()
        });
        let err = orchestrator
            .handle_callback(&AuthorizationResponse::granted("c", Some("abc123".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, CallbackError::NoExchanger { .. }));
        assert!(store.get("abc123").unwrap().export_auth_data.is_none());
    }

    #[test]
    fn stage_ordering_is_linear() {
        assert!(CallbackStage::Received < CallbackStage::Validated);
        assert!(CallbackStage::CredentialsExchanged < CallbackStage::JobUpdated);
        assert!(CallbackStage::JobUpdated < CallbackStage::RedirectDecided);
    }
}
