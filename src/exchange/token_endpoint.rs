use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use super::{CredentialExchanger, ExchangeError};
use crate::config::ServiceConfig;
use crate::error::CallbackError;
use crate::types::AuthData;

/// Generic OAuth2 authorization-code exchanger.
///
/// Posts an `authorization_code` grant to the provider's token endpoint and
/// maps the JSON response onto [`AuthData::Token`].
///
/// # Example
/// ```no_run
/// use portability_auth::exchange::TokenEndpointExchanger;
///
/// let exchanger = TokenEndpointExchanger::new("https://oauth2.googleapis.com/token", "client-id")
///     .with_client_secret("client-secret")
///     .with_redirect_uri("https://portability.example/callback/google");
/// ```
#[derive(Debug, Clone)]
pub struct TokenEndpointExchanger {
    client: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: Option<String>,
    redirect_uri: Option<String>,
}

impl TokenEndpointExchanger {
    pub fn new(token_url: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: None,
            redirect_uri: None,
        }
    }

    /// Build from a configured service, resolving `env:` secrets.
    pub fn from_service_config(service: &ServiceConfig) -> Result<Self, CallbackError> {
        let mut exchanger = Self::new(&service.token_url, &service.client_id);
        exchanger.client_secret = service.resolve_client_secret()?;
        exchanger.redirect_uri = service.redirect_uri.clone();
        Ok(exchanger)
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

#[async_trait]
impl CredentialExchanger for TokenEndpointExchanger {
    async fn exchange(
        &self,
        code: &str,
        correlation_token: &str,
    ) -> Result<AuthData, ExchangeError> {
        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.client_id.as_str()),
        ];
        if let Some(secret) = &self.client_secret {
            form.push(("client_secret", secret.as_str()));
        }
        if let Some(uri) = &self.redirect_uri {
            form.push(("redirect_uri", uri.as_str()));
        }

        tracing::debug!(
            token_url = %self.token_url,
            job = %correlation_token,
            "exchanging authorization code"
        );
        let resp = self
            .client
            .post(&self.token_url)
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        let payload: TokenEndpointResponse = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(_) if !status.is_success() => {
                return Err(ExchangeError::InvalidResponse(format!(
                    "Token exchange failed with status {status}"
                )));
            }
            Err(e) => return Err(e.into()),
        };

        // Some providers answer 200 with an error body.
        if let Some(error) = payload.error {
            return Err(ExchangeError::Rejected {
                error,
                description: payload.error_description,
            });
        }
        if !status.is_success() {
            return Err(ExchangeError::InvalidResponse(format!(
                "Token exchange failed with status {status}"
            )));
        }
        let access_token = payload.access_token.ok_or_else(|| {
            ExchangeError::InvalidResponse("Token response missing access_token".to_string())
        })?;

        let expires_at = payload.expires_in.map(expiry_after).transpose()?;

        Ok(AuthData::Token {
            access_token,
            refresh_token: payload.refresh_token,
            expires_at,
            scopes: payload.scope.map(|scope| {
                scope
                    .split_whitespace()
                    .map(str::to_string)
                    .collect()
            }),
            token_type: payload.token_type,
        })
    }
}

fn expiry_after(expires_in: i64) -> Result<DateTime<Utc>, ExchangeError> {
    Duration::try_seconds(expires_in)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .ok_or_else(|| {
            ExchangeError::InvalidResponse(format!(
                "Token response expires_in out of range: {expires_in}"
            ))
        })
}

#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
    token_type: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}
