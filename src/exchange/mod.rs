//! Authorization-code exchange against service providers.

pub mod registry;
pub mod token_endpoint;

pub use registry::ExchangerRegistry;
pub use token_endpoint::TokenEndpointExchanger;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::AuthData;

/// Normalized failures of a credential exchange.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("Provider rejected the authorization code: {error}")]
    Rejected {
        error: String,
        description: Option<String>,
    },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for ExchangeError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(error: serde_json::Error) -> Self {
        Self::InvalidResponse(error.to_string())
    }
}

/// Trades a short-lived authorization code for durable credentials.
///
/// `correlation_token` is the job token the code was issued for. It is an
/// anti-replay and logging aid, never a secret.
#[async_trait]
pub trait CredentialExchanger: Send + Sync {
    async fn exchange(
        &self,
        code: &str,
        correlation_token: &str,
    ) -> Result<AuthData, ExchangeError>;
}
