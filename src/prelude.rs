//! Convenience re-exports for common use.

pub use crate::auth::{parse_callback, AuthorizationResponse};
pub use crate::callback::{CallbackOrchestrator, CallbackOutcome, Redirect};
pub use crate::config::{CallbackConfig, RedirectTargets};
pub use crate::error::{CallbackError, ErrorCategory, Result};
pub use crate::exchange::{CredentialExchanger, ExchangerRegistry};
pub use crate::store::{FileJobStore, InMemoryJobStore, JobStore, JobStoreConfig};
pub use crate::types::{AuthData, Leg, PortabilityJob, PortableDataType};
