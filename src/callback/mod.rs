//! The OAuth callback state machine.

pub mod orchestrator;

pub use orchestrator::CallbackOrchestrator;
pub use crate::types::Leg;

use serde::Serialize;
use strum::Display;

/// Next destination for the browser, resolved to a URL through
/// [`RedirectTargets`](crate::config::RedirectTargets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Redirect {
    /// The provider reported an error, usually a user declining access.
    Error,
    /// Export credentials stored; the user now authorizes the import side.
    ContinueToImport,
    /// Import credentials stored; the copy can start.
    CopyInProgress,
}

impl Redirect {
    /// Redirect that follows a completed `leg`.
    pub fn after(leg: Leg) -> Self {
        match leg {
            Leg::Export => Self::ContinueToImport,
            Leg::Import => Self::CopyInProgress,
        }
    }
}

/// Stages a single callback passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CallbackStage {
    Received,
    Validated,
    JobResolved,
    DirectionDetermined,
    CredentialsExchanged,
    JobUpdated,
    RedirectDecided,
}

/// Result of a handled callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallbackOutcome {
    pub redirect: Redirect,
    /// Configured URL for `redirect`.
    pub location: String,
    /// Leg whose credentials were stored; `None` for the error redirect.
    pub leg: Option<Leg>,
}
