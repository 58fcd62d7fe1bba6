//! Server execution logic.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::config::AppConfig;

use super::handler::{self, chat, user};
use super::signal::shutdown_signal;
use super::state::AppState;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/user/exists/{username}", get(user::exists))
        .route("/user/register", post(user::register))
        .route("/token/get", post(user::get_token))
        .route("/token/refresh", get(user::refresh_token))
        .route("/chat/create/{name}", post(chat::create))
        .route("/chat/list", get(chat::list))
        .route("/chat/join/{name}", get(chat::join))
        .route("/api/health", get(handler::health_check))
        .with_state(state)
}

/// Run the chat server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new(&config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr()).await?;

    tracing::info!("Chat server listening on {}", listener.local_addr()?);
    tracing::info!("Press Ctrl+C to shutdown gracefully");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
