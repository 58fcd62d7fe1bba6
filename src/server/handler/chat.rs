//! Room endpoints: create, list and the WebSocket join.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use crate::chat::connection::MAX_FRAME_BYTES;
use crate::chat::{Connection, Participant};
use crate::common::validation::is_valid_room_name;

use super::super::extract::AuthUser;
use super::super::state::AppState;
use super::ErrorResponse;

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> HandlerError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

/// Create a new room.
pub async fn create(
    State(state): State<Arc<AppState>>,
    AuthUser(_username): AuthUser,
    Path(name): Path<String>,
) -> Result<StatusCode, HandlerError> {
    if !is_valid_room_name(&name) {
        return Err(bad_request(format!("'{}' is not a valid room name", name)));
    }

    state
        .directory
        .create(&name)
        .await
        .map_err(|e| bad_request(e.to_string()))?;

    Ok(StatusCode::OK)
}

/// List all room names.
pub async fn list(
    State(state): State<Arc<AppState>>,
    AuthUser(_username): AuthUser,
) -> Json<Vec<String>> {
    Json(state.directory.list().await)
}

/// Join a room.
///
/// Authenticates and validates before the upgrade; afterwards the socket
/// belongs to a new participant, which is handed to the directory and then
/// run for the life of the connection. A failed join closes the socket, and
/// nothing is written to the HTTP response once the upgrade succeeded.
pub async fn join(
    State(state): State<Arc<AppState>>,
    AuthUser(username): AuthUser,
    Path(name): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<Response, HandlerError> {
    if !is_valid_room_name(&name) {
        return Err(bad_request(format!("'{}' is not a valid room name", name)));
    }

    Ok(ws
        .max_message_size(MAX_FRAME_BYTES)
        .on_upgrade(move |socket| async move {
            let (participant, handle) = Participant::new(username, Connection::new(socket));

            match state.directory.add_participant(handle, &name).await {
                Ok(()) => participant.run().await,
                Err(e) => {
                    tracing::warn!(
                        "Failed to add participant '{}' to room '{}': {}",
                        participant.id(),
                        name,
                        e
                    );
                    participant.close().await;
                }
            }
        }))
}
