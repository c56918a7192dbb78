use serde::{Deserialize, Serialize};

/// The user a token is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>, email: impl Into<String>, display_name: Option<String>) -> Self {
        Self { id: id.into(), email: email.into(), display_name }
    }
}

/// JWT claims embedded in every bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the user id.
    pub sub: String,
    pub email: String,
    /// Display name, falls back to a default when the user has none.
    pub name: String,
    pub iss: String,
    pub aud: String,
    /// Issued-at (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration (UTC Unix timestamp).
    pub exp: i64,
}
