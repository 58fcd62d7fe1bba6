//! In-memory user store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, User, UserStore};

/// Keeps user records in a map for the process lifetime.
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn exists(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.users.read().await.contains_key(username))
    }

    async fn create(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(StoreError::AlreadyExists(user.username));
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn get(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str) -> User {
        User {
            username: username.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        // given:
        let store = InMemoryUserStore::new();

        // when:
        store.create(user("alice")).await.unwrap();
        let fetched = store.get("alice").await.unwrap();

        // then:
        assert_eq!(fetched.unwrap().username, "alice");
        assert!(store.exists("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_duplicate_fails() {
        // given:
        let store = InMemoryUserStore::new();
        store.create(user("alice")).await.unwrap();

        // when:
        let result = store.create(user("alice")).await;

        // then:
        match result {
            Err(StoreError::AlreadyExists(name)) => assert_eq!(name, "alice"),
            other => panic!("expected AlreadyExists, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        // given:
        let store = InMemoryUserStore::new();

        // when / then:
        assert!(store.get("nobody").await.unwrap().is_none());
        assert!(!store.exists("nobody").await.unwrap());
    }
}
