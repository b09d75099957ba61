//! Error types for the callback workflow.

pub mod category;

pub use category::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

use crate::exchange::ExchangeError;
use crate::store::StoreError;
use crate::types::{Leg, PortableDataType, UnknownDataType};

/// Primary error type for callback handling.
///
/// Every variant is a per-request failure; none is fatal to the process.
#[derive(Error, Debug)]
pub enum CallbackError {
    #[error("Malformed callback: {0}")]
    MalformedCallback(String),

    #[error("Callback state token is missing or empty")]
    MissingToken,

    #[error("No job found for token {token}")]
    JobNotFound { token: String },

    #[error(transparent)]
    UnknownDataType(#[from] UnknownDataType),

    #[error("No {leg} service set on job {token}")]
    MissingService { token: String, leg: Leg },

    #[error("No credential exchanger registered for {service}/{data_type}")]
    NoExchanger {
        service: String,
        data_type: PortableDataType,
    },

    #[error("Credential exchange with {service} failed: {source}")]
    CredentialExchange {
        service: String,
        #[source]
        source: ExchangeError,
    },

    #[error("Credential exchange timed out after {0}ms")]
    Timeout(u64),

    #[error("Callback cancelled")]
    Cancelled,

    #[error("Job {token} was updated by another callback")]
    ConcurrentUpdate { token: String },

    #[error("Job store error: {0}")]
    Store(#[source] StoreError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<StoreError> for CallbackError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Conflict { token } => Self::ConcurrentUpdate { token },
            other => Self::Store(other),
        }
    }
}

impl CallbackError {
    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedCallback(_) | Self::MissingToken => ErrorCategory::ProtocolViolation,
            Self::JobNotFound { .. }
            | Self::UnknownDataType(_)
            | Self::MissingService { .. }
            | Self::NoExchanger { .. } => ErrorCategory::NotFound,
            Self::CredentialExchange { .. } | Self::Timeout(_) | Self::Cancelled => {
                ErrorCategory::UpstreamFailure
            }
            Self::ConcurrentUpdate { .. } => ErrorCategory::Conflict,
            Self::Store(_) => ErrorCategory::Storage,
            Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }

    /// Suggested HTTP status for the surrounding web layer.
    pub fn status_hint(&self) -> u16 {
        match self {
            Self::Timeout(_) => 504,
            other => other.category().status_hint(),
        }
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::ProtocolViolation => RecoverySuggestion::FixRequest,
            ErrorCategory::NotFound
            | ErrorCategory::UpstreamFailure
            | ErrorCategory::Conflict => RecoverySuggestion::RestartAuthorization,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::Storage => RecoverySuggestion::ContactSupport,
        }
    }

    /// Whether repeating the same callback could succeed.
    ///
    /// Authorization codes are single-use, so a failed callback is never
    /// replayed; the user starts the flow over instead.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, CallbackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_conflict_becomes_concurrent_update() {
        let err = CallbackError::from(StoreError::Conflict {
            token: "abc".to_string(),
        });
        assert!(matches!(err, CallbackError::ConcurrentUpdate { ref token } if token == "abc"));
        assert_eq!(err.category(), ErrorCategory::Conflict);
    }

    #[test]
    fn store_io_stays_a_store_error() {
        let err = CallbackError::from(StoreError::Io("disk full".to_string()));
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.status_hint(), 500);
        assert_eq!(err.recovery_suggestion(), RecoverySuggestion::ContactSupport);
    }

    #[test]
    fn timeout_is_a_gateway_timeout() {
        let err = CallbackError::Timeout(30_000);
        assert_eq!(err.category(), ErrorCategory::UpstreamFailure);
        assert_eq!(err.status_hint(), 504);
        assert_eq!(err.to_string(), "Credential exchange timed out after 30000ms");
    }

    #[test]
    fn unknown_data_type_is_transparent() {
        let err = CallbackError::from(UnknownDataType("VIDEOS".to_string()));
        assert_eq!(err.to_string(), "Unknown data type: \"VIDEOS\"");
    }
}
