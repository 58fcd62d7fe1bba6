//! Shared application state.

use std::sync::Arc;

use crate::auth::TokenManager;
use crate::chat::RoomDirectory;
use crate::config::AppConfig;
use crate::store::{InMemoryUserStore, UserStore};

/// Shared application state
pub struct AppState {
    /// Registry of running rooms
    pub directory: RoomDirectory,
    /// Token issuance and verification
    pub tokens: TokenManager,
    /// User credential store
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            directory: RoomDirectory::new(),
            tokens: TokenManager::new(&config.auth.token_key, config.auth.token_expiration()),
            users: Arc::new(InMemoryUserStore::new()),
        }
    }
}
