use serde::{Deserialize, Serialize};
use strum::Display;

use super::PortabilityJob;

/// One half of a two-sided portability job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Leg {
    Export,
    Import,
}

impl Leg {
    /// Decide which leg a callback completes from the job snapshot alone.
    ///
    /// Legs complete strictly export-then-import: while the export slot is
    /// empty the callback completes the export leg, otherwise the import
    /// leg. A job with neither slot filled is always export. Two callbacks
    /// for the same leg racing each other both see the same answer.
    pub fn infer(job: &PortabilityJob) -> Self {
        if job.export_auth_data.is_none() {
            Self::Export
        } else {
            Self::Import
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AuthData;

    fn job() -> PortabilityJob {
        PortabilityJob::builder()
            .token("abc123")
            .data_type("PHOTOS")
            .export_service("google")
            .import_service("flickr")
            .build()
    }

    #[test]
    fn empty_job_completes_export() {
        assert_eq!(Leg::infer(&job()), Leg::Export);
    }

    #[test]
    fn filled_export_slot_completes_import() {
        let job = job().with_auth_data(Leg::Export, AuthData::token("a"));
        assert_eq!(Leg::infer(&job), Leg::Import);
    }

    #[test]
    fn export_is_checked_first_even_if_import_is_filled() {
        let job = job().with_auth_data(Leg::Import, AuthData::token("a"));
        assert_eq!(Leg::infer(&job), Leg::Export);
    }

    #[test]
    fn both_slots_filled_still_reports_import() {
        let job = job()
            .with_auth_data(Leg::Export, AuthData::token("a"))
            .with_auth_data(Leg::Import, AuthData::token("b"));
        assert_eq!(Leg::infer(&job), Leg::Import);
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(Leg::Export.to_string(), "export");
        assert_eq!(Leg::Import.to_string(), "import");
    }
}
