//! Request extractors.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;

use crate::auth::{AuthError, TokenManager};

use super::handler::ErrorResponse;
use super::state::AppState;

/// Extractor yielding the authenticated username from the request's bearer
/// token. Rejects with 401 when the `Authorization` header is missing or
/// malformed, or the token does not verify.
pub struct AuthUser(pub String);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let verified = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingHeader)
            .and_then(|value| value.to_str().map_err(|_| AuthError::MalformedHeader))
            .and_then(TokenManager::bearer_token)
            .and_then(|token| state.tokens.verify(token));

        match verified {
            Ok(claims) => Ok(AuthUser(claims.username)),
            Err(e) => Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(e.to_string())),
            )),
        }
    }
}
