use std::str::FromStr;

use reqwest::Url;
use serde::Serialize;

use crate::error::CallbackError;

/// OAuth2 authorization-code response carried by a provider redirect.
///
/// Holds exactly one of `code` or `error`. A parameter sent with an empty
/// value is present; `error=` still marks a denial.
///
/// # Example
/// ```
/// use portability_auth::auth::parse_callback;
///
/// let response = parse_callback(
///     "https://portability.example/callback/google",
///     Some("code=xyz&state=abc123"),
/// )?;
/// assert_eq!(response.code(), Some("xyz"));
/// assert_eq!(response.state(), Some("abc123"));
/// # Ok::<(), portability_auth::error::CallbackError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationResponse {
    code: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
    error_uri: Option<String>,
    state: Option<String>,
}

impl AuthorizationResponse {
    /// A successful authorization carrying `code`.
    pub fn granted(code: impl Into<String>, state: Option<String>) -> Self {
        Self {
            code: Some(code.into()),
            error: None,
            error_description: None,
            error_uri: None,
            state,
        }
    }

    /// A provider-reported failure such as `access_denied`.
    pub fn denied(error: impl Into<String>, state: Option<String>) -> Self {
        Self {
            code: None,
            error: Some(error.into()),
            error_description: None,
            error_uri: None,
            state,
        }
    }

    /// Parse a full redirect URL.
    pub fn from_url(url: &str) -> Result<Self, CallbackError> {
        let parsed = Url::parse(url)
            .map_err(|e| CallbackError::MalformedCallback(format!("invalid URL {url:?}: {e}")))?;

        let mut response = Self {
            code: None,
            error: None,
            error_description: None,
            error_uri: None,
            state: None,
        };
        for (key, value) in parsed.query_pairs() {
            let slot = match &*key {
                "code" => &mut response.code,
                "error" => &mut response.error,
                "error_description" => &mut response.error_description,
                "error_uri" => &mut response.error_uri,
                "state" => &mut response.state,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        match (&response.code, &response.error) {
            (Some(_), Some(_)) => Err(CallbackError::MalformedCallback(
                "response carries both code and error".to_string(),
            )),
            (None, None) => Err(CallbackError::MalformedCallback(
                "response carries neither code nor error".to_string(),
            )),
            _ => Ok(response),
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_description(&self) -> Option<&str> {
        self.error_description.as_deref()
    }

    pub fn error_uri(&self) -> Option<&str> {
        self.error_uri.as_deref()
    }

    /// Opaque job token echoed back through the `state` parameter.
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn is_denied(&self) -> bool {
        self.error.is_some()
    }
}

impl FromStr for AuthorizationResponse {
    type Err = CallbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_url(s)
    }
}

/// Parse a callback from the request URL and its raw query string.
///
/// The canonical redirect URL is `request_url`, followed by `?` and the query
/// when one was sent.
pub fn parse_callback(
    request_url: &str,
    query: Option<&str>,
) -> Result<AuthorizationResponse, CallbackError> {
    AuthorizationResponse::from_url(&canonical_url(request_url, query))
}

fn canonical_url(request_url: &str, query: Option<&str>) -> String {
    match query {
        Some(query) => format!("{request_url}?{query}"),
        None => request_url.to_string(),
    }
}
