//! Bearer-token extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use http::header::AUTHORIZATION;
use tracing::debug;

use crate::auth::claims::Claims;
use crate::observability::metrics::get_metrics;
use crate::server::error::ApiError;
use crate::server::server::AppState;

/// Caller identity taken from a valid `Authorization: Bearer <token>` header.
///
/// Any handler taking this argument is protected; failures answer 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub name: String,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self { user_id: claims.sub, email: claims.email, name: claims.name }
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let metrics = get_metrics().await;

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                metrics.token_rejections.with_label_values(&["missing_header"]).inc();
                ApiError::Unauthorized("Missing Authorization header".into())
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            metrics.token_rejections.with_label_values(&["bad_scheme"]).inc();
            ApiError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
        })?;

        let claims = state.tokens.validate(token.trim()).map_err(|err| {
            debug!(error = %err, "bearer token refused");
            metrics.token_rejections.with_label_values(&[err.reason()]).inc();
            ApiError::from(err)
        })?;

        Ok(AuthenticatedUser::from(claims))
    }
}
