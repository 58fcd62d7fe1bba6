//! Durable user credentials.
//!
//! The server only needs three operations on user records, captured by
//! [`UserStore`]. The shipped implementation keeps everything in memory;
//! a database-backed store is another implementation of the same trait.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::InMemoryUserStore;

/// A registered user.
#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user '{0}' already exists")]
    AlreadyExists(String),
}

/// Data access for user credentials.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Check whether a username is taken.
    async fn exists(&self, username: &str) -> Result<bool, StoreError>;

    /// Persist a new user.
    async fn create(&self, user: User) -> Result<(), StoreError>;

    /// Fetch a user, or `None` if it does not exist.
    async fn get(&self, username: &str) -> Result<Option<User>, StoreError>;
}
