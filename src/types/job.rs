use bon::Builder;
use serde::{Deserialize, Serialize};

use super::{AuthData, Leg};

/// A data-portability job as held by a [`JobStore`](crate::store::JobStore).
///
/// `token` is the primary key; it is generated when the job is created and
/// echoed back by providers through the OAuth `state` parameter.
/// `data_type` keeps the raw stored name and is validated on use with
/// [`PortableDataType::parse`](super::PortableDataType::parse).
///
/// # Example
/// ```
/// use portability_auth::types::{PortabilityJob, PortableDataType};
///
/// let job = PortabilityJob::builder()
///     .token("abc123")
///     .data_type(PortableDataType::Photos)
///     .export_service("google")
///     .build();
/// assert_eq!(job.data_type, "PHOTOS");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct PortabilityJob {
    #[builder(into)]
    pub token: String,
    #[builder(into)]
    pub data_type: String,
    #[builder(into)]
    pub export_service: Option<String>,
    #[builder(into)]
    pub import_service: Option<String>,
    pub export_auth_data: Option<AuthData>,
    pub import_auth_data: Option<AuthData>,
}

impl PortabilityJob {
    /// Credentials stored for `leg`, if that leg has completed.
    pub fn auth_data(&self, leg: Leg) -> Option<&AuthData> {
        match leg {
            Leg::Export => self.export_auth_data.as_ref(),
            Leg::Import => self.import_auth_data.as_ref(),
        }
    }

    /// Service name configured for `leg`; blank names count as absent.
    pub fn service(&self, leg: Leg) -> Option<&str> {
        let name = match leg {
            Leg::Export => self.export_service.as_deref(),
            Leg::Import => self.import_service.as_deref(),
        };
        name.map(str::trim).filter(|name| !name.is_empty())
    }

    /// Copy of this job with the `leg` slot set to `data`.
    ///
    /// Every other field is carried over unchanged.
    pub fn with_auth_data(&self, leg: Leg, data: AuthData) -> Self {
        match leg {
            Leg::Export => Self {
                export_auth_data: Some(data),
                ..self.clone()
            },
            Leg::Import => Self {
                import_auth_data: Some(data),
                ..self.clone()
            },
        }
    }
}
