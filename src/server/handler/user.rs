//! User account endpoints: registration, existence check and tokens.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, verify_password};
use crate::common::validation::is_valid_username;
use crate::store::{StoreError, User};

use super::super::extract::AuthUser;
use super::super::state::AppState;
use super::ErrorResponse;

/// Shortest accepted password.
const MIN_PASSWORD_LENGTH: usize = 8;

type HandlerError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

fn error(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (status, Json(ErrorResponse::new(message)))
}

fn internal_error(e: impl std::fmt::Display) -> HandlerError {
    error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// Check whether a username is taken.
pub async fn exists(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<ExistsResponse>, HandlerError> {
    if !is_valid_username(&username) {
        return Err(error(
            StatusCode::BAD_REQUEST,
            format!("'{}' is not a valid username", username),
        ));
    }

    let exists = state.users.exists(&username).await.map_err(internal_error)?;
    Ok(Json(ExistsResponse { exists }))
}

/// Register a new user.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AuthRequest>,
) -> Result<StatusCode, HandlerError> {
    let AuthRequest { username, password } = request;

    if !is_valid_username(&username) {
        return Err(error(
            StatusCode::BAD_REQUEST,
            format!("'{}' is not a valid username", username),
        ));
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(error(StatusCode::BAD_REQUEST, "password is too short"));
    }

    // bcrypt is deliberately slow; keep it off the async workers.
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(internal_error)?
        .map_err(internal_error)?;

    let user = User {
        username: username.clone(),
        password_hash,
    };
    match state.users.create(user).await {
        Ok(()) => {
            tracing::info!("User '{}' registered", username);
            Ok(StatusCode::OK)
        }
        Err(e @ StoreError::AlreadyExists(_)) => {
            Err(error(StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

/// Issue a token for valid credentials.
pub async fn get_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AuthRequest>,
) -> Result<Json<TokenResponse>, HandlerError> {
    let AuthRequest { username, password } = request;

    let user = state.users.get(&username).await.map_err(internal_error)?;
    let Some(user) = user else {
        return Err(error(
            StatusCode::NOT_FOUND,
            format!("user '{}' does not exist", username),
        ));
    };

    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &user.password_hash))
        .await
        .map_err(internal_error)?
        .map_err(internal_error)?;
    if !valid {
        return Err(error(StatusCode::UNAUTHORIZED, "wrong password"));
    }

    let issued = state.tokens.issue(&username).map_err(internal_error)?;
    tracing::info!("Issued token for '{}'", username);

    Ok(Json(TokenResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

/// Issue a fresh token for an already authenticated user.
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    AuthUser(username): AuthUser,
) -> Result<Json<TokenResponse>, HandlerError> {
    let issued = state.tokens.issue(&username).map_err(internal_error)?;

    Ok(Json(TokenResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}
