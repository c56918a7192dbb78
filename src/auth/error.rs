use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    /// The service was never provisioned with this setting. Not retriable.
    #[error("missing configuration value '{0}'")]
    MissingConfig(&'static str),
    /// The setting is present but unusable, e.g. a lifetime past the clock's range.
    #[error("invalid configuration value '{0}'")]
    InvalidConfig(&'static str),
    #[error("invalid user: {0}")]
    InvalidUser(&'static str),
    #[error("token rejected: {0}")]
    Rejected(String),
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl TokenError {
    /// Metrics label.
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::MissingConfig(_) | TokenError::InvalidConfig(_) => "config",
            TokenError::InvalidUser(_) => "invalid_user",
            TokenError::Rejected(_) => "rejected",
            TokenError::Signing(_) => "signing",
        }
    }
}
