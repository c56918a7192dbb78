use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use crate::auth::claims::{Claims, UserIdentity};
use crate::auth::error::TokenError;
use crate::config::types::JwtConfig;
use crate::helpers::time::now_utc;
use crate::observability::metrics::initialized_metrics;
use crate::utils::constants::DEFAULT_DISPLAY_NAME;

/// Configuration keys, as named in error messages.
const JWT_KEY: &str = "Jwt:Key";
const JWT_ISSUER: &str = "Jwt:Issuer";
const JWT_AUDIENCE: &str = "Jwt:Audience";
const JWT_EXPIRY: &str = "Jwt:ExpiryMinutes";

/// Issues and validates HS256 bearer tokens.
///
/// Stateless: a token is valid until `exp`, nothing is stored or revoked.
#[derive(Debug, Clone)]
pub struct TokenService {
    config: JwtConfig,
}

/// Resolved signing settings, all present.
struct SigningParams<'a> {
    key: &'a str,
    issuer: &'a str,
    audience: &'a str,
}

impl TokenService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    fn signing_params(&self) -> Result<SigningParams<'_>, TokenError> {
        fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, TokenError> {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .ok_or(TokenError::MissingConfig(name))
        }

        Ok(SigningParams {
            key: required(&self.config.key, JWT_KEY)?,
            issuer: required(&self.config.issuer, JWT_ISSUER)?,
            audience: required(&self.config.audience, JWT_AUDIENCE)?,
        })
    }

    /// Issue a token for `user`, valid for the configured lifetime from now.
    pub fn issue_token(&self, user: &UserIdentity) -> Result<String, TokenError> {
        self.issue_token_at(user, now_utc())
    }

    /// Issue a token as if the clock read `now`.
    pub fn issue_token_at(&self, user: &UserIdentity, now: DateTime<Utc>) -> Result<String, TokenError> {
        let params = self.signing_params()?;

        let sub = user.id.trim();
        if sub.is_empty() {
            return Err(TokenError::InvalidUser("user id must not be empty"));
        }
        let email = user.email.trim();
        if email.is_empty() {
            return Err(TokenError::InvalidUser("email must not be empty"));
        }
        let name = user
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_DISPLAY_NAME);

        let expires = TimeDelta::try_minutes(self.config.expiry_minutes)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(TokenError::InvalidConfig(JWT_EXPIRY))?;
        let iat = now.timestamp();
        let exp = expires.timestamp();
        let claims = Claims {
            sub: sub.to_owned(),
            email: email.to_owned(),
            name: name.to_owned(),
            iss: params.issuer.to_owned(),
            aud: params.audience.to_owned(),
            iat,
            exp,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(params.key.as_bytes()),
        )
        .map_err(TokenError::Signing)?;
        if let Some(metrics) = initialized_metrics() {
            metrics.tokens_issued.inc();
        }
        debug!(sub = %claims.sub, exp, "token issued");
        Ok(token)
    }

    /// Verify signature, issuer, audience and expiry (no leeway).
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let params = self.signing_params()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[params.issuer]);
        validation.set_audience(&[params.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = 0;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(params.key.as_bytes()),
            &validation,
        )
        .map_err(|err| TokenError::Rejected(describe(err.kind())))?;

        // the library accepts exp == now, the contract does not
        if now_utc().timestamp() >= data.claims.exp {
            return Err(TokenError::Rejected("token expired".to_owned()));
        }
        Ok(data.claims)
    }
}

fn describe(kind: &ErrorKind) -> String {
    match kind {
        ErrorKind::InvalidSignature => "invalid signature".to_owned(),
        ErrorKind::ExpiredSignature => "token expired".to_owned(),
        ErrorKind::InvalidIssuer => "issuer mismatch".to_owned(),
        ErrorKind::InvalidAudience => "audience mismatch".to_owned(),
        ErrorKind::MissingRequiredClaim(claim) => format!("missing claim '{}'", claim),
        ErrorKind::InvalidAlgorithm => "unexpected algorithm".to_owned(),
        other => format!("malformed token ({:?})", other),
    }
}
