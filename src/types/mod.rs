//! Core data model: jobs, credentials, data types and legs.

pub mod auth_data;
pub mod data_type;
pub mod job;
pub mod leg;

pub use auth_data::AuthData;
pub use data_type::{PortableDataType, UnknownDataType};
pub use job::PortabilityJob;
pub use leg::Leg;
