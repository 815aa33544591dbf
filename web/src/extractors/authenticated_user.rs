use crate::extractors::RejectionType;
use crate::AppState;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use domain::jwt::{self, AuthClaims};
use log::*;

/// Extracts the identity carried by the request's bearer token.
///
/// The token is self-contained: verification decodes the `{id, role, email}`
/// claims with the configured secret and no database round trip. A missing or
/// invalid token rejects the request with 401 before any handler logic runs.
pub(crate) struct AuthenticatedUser(pub AuthClaims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = bearer_token(parts).ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                "Access denied. No token provided.".to_string(),
            )
        })?;

        match jwt::verify_auth_token(app_state.config(), token) {
            Ok(claims) => Ok(AuthenticatedUser(claims)),
            Err(err) => {
                debug!("Rejecting request with invalid bearer token: {err:?}");
                Err((StatusCode::UNAUTHORIZED, "Invalid token".to_string()))
            }
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
