//! Parsing of OAuth provider redirects.

pub mod response;

pub use response::{parse_callback, AuthorizationResponse};
