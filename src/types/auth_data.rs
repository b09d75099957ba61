use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credential bundle produced by a credential exchange.
///
/// Treated as an opaque, immutable value by the callback workflow. `Debug`
/// output never includes secret material.
///
/// # Example
/// ```
/// use portability_auth::types::AuthData;
///
/// let data = AuthData::token("access");
/// assert_eq!(data.kind(), "token");
/// assert!(!format!("{data:?}").contains("access"));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuthData {
    /// OAuth2 bearer credentials.
    Token {
        access_token: String,
        refresh_token: Option<String>,
        expires_at: Option<DateTime<Utc>>,
        scopes: Option<Vec<String>>,
        token_type: Option<String>,
    },
    /// OAuth1-style token and token secret.
    TokenSecret { token: String, secret: String },
    /// A single shared secret (app password, API key).
    Secret { secret: String },
}

impl AuthData {
    /// Bearer credentials with only an access token.
    pub fn token(access_token: impl Into<String>) -> Self {
        Self::Token {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
            scopes: None,
            token_type: None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Token { .. } => "token",
            Self::TokenSecret { .. } => "token_secret",
            Self::Secret { .. } => "secret",
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Token { expires_at, .. } => *expires_at,
            _ => None,
        }
    }
}

impl fmt::Debug for AuthData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token {
                refresh_token,
                expires_at,
                scopes,
                token_type,
                ..
            } => f
                .debug_struct("Token")
                .field("access_token", &"<redacted>")
                .field("refresh_token", &refresh_token.as_ref().map(|_| "<redacted>"))
                .field("expires_at", expires_at)
                .field("scopes", scopes)
                .field("token_type", token_type)
                .finish(),
            Self::TokenSecret { .. } => f
                .debug_struct("TokenSecret")
                .field("token", &"<redacted>")
                .field("secret", &"<redacted>")
                .finish(),
            Self::Secret { .. } => f
                .debug_struct("Secret")
                .field("secret", &"<redacted>")
                .finish(),
        }
    }
}
