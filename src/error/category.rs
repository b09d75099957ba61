//! Error classification for callers that map failures onto HTTP responses.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Broad failure class of a callback.
///
/// A user declining authorization is not an error: it is the
/// [`Redirect::Error`](crate::callback::Redirect::Error) outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed callback or missing state token. Suspicious.
    ProtocolViolation,
    /// Unknown token, data type, service or exchanger. Usually a stale or
    /// replayed link.
    NotFound,
    /// The provider's credential exchange failed, stalled or was cancelled.
    UpstreamFailure,
    /// Another callback updated the job first.
    Conflict,
    /// The job store itself failed.
    Storage,
    Configuration,
}

impl ErrorCategory {
    /// Suggested HTTP status for the surrounding web layer.
    pub fn status_hint(self) -> u16 {
        match self {
            Self::ProtocolViolation => 400,
            Self::NotFound => 404,
            Self::UpstreamFailure => 502,
            Self::Conflict => 409,
            Self::Storage | Self::Configuration => 500,
        }
    }
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecoverySuggestion {
    /// The user starts the authorization flow over.
    RestartAuthorization,
    /// The request itself is wrong and will not succeed if repeated.
    FixRequest,
    CheckConfiguration,
    ContactSupport,
}
