//! Process-wide registry of rooms.

use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::RwLock;

use super::participant::ParticipantHandle;
use super::room::{Room, RoomError};

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("room '{0}' already exists")]
    RoomAlreadyExists(String),
    #[error("room '{0}' does not exist")]
    RoomNotFound(String),
    #[error(transparent)]
    Room(#[from] RoomError),
}

/// Maps room names to running rooms.
///
/// The lock guards only the map itself; it is released before any call into
/// a room, which does its own serialization.
pub struct RoomDirectory {
    rooms: RwLock<HashMap<String, Room>>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Create a room and start its loop.
    pub async fn create(&self, name: &str) -> Result<(), DirectoryError> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(name) {
            return Err(DirectoryError::RoomAlreadyExists(name.to_string()));
        }
        rooms.insert(name.to_string(), Room::spawn(name));

        tracing::info!("Room '{}' created", name);
        Ok(())
    }

    /// Snapshot of all room names, in no particular order.
    pub async fn list(&self) -> Vec<String> {
        self.rooms.read().await.keys().cloned().collect()
    }

    /// Route a joining participant to its room.
    pub async fn add_participant(
        &self,
        handle: ParticipantHandle,
        room_name: &str,
    ) -> Result<(), DirectoryError> {
        let room = {
            let rooms = self.rooms.read().await;
            match rooms.get(room_name) {
                Some(room) => room.clone(),
                None => return Err(DirectoryError::RoomNotFound(room_name.to_string())),
            }
        };

        room.join(handle).await.map_err(DirectoryError::from)
    }
}

impl Default for RoomDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use tokio::sync::{mpsc, watch};

    /// The returned senders keep the fake participant alive for the test.
    fn test_handle(id: &str) -> (ParticipantHandle, mpsc::Sender<Event>, watch::Sender<()>) {
        let (in_tx, in_rx) = mpsc::channel::<Event>(1);
        let (out_tx, _out_rx) = mpsc::channel::<Event>(1);
        let (done_tx, done_rx) = watch::channel(());
        let handle = ParticipantHandle::new(id.to_string(), in_rx, out_tx, done_rx);
        (handle, in_tx, done_tx)
    }

    #[tokio::test]
    async fn test_create_and_list() {
        // given:
        let directory = RoomDirectory::new();

        // when:
        directory.create("lobby").await.unwrap();
        directory.create("dev.rust").await.unwrap();
        let mut names = directory.list().await;
        names.sort();

        // then:
        assert_eq!(names, vec!["dev.rust".to_string(), "lobby".to_string()]);
    }

    #[tokio::test]
    async fn test_create_twice_fails() {
        // given:
        let directory = RoomDirectory::new();
        directory.create("lobby").await.unwrap();

        // when:
        let result = directory.create("lobby").await;

        // then:
        match result {
            Err(DirectoryError::RoomAlreadyExists(name)) => assert_eq!(name, "lobby"),
            other => panic!("expected RoomAlreadyExists, got {:?}", other),
        }
        assert_eq!(directory.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_participant_to_missing_room() {
        // given:
        let directory = RoomDirectory::new();

        // when:
        let (handle, _in_tx, _done_tx) = test_handle("alice");
        let result = directory.add_participant(handle, "nowhere").await;

        // then:
        assert!(matches!(result, Err(DirectoryError::RoomNotFound(_))));
    }

    #[tokio::test]
    async fn test_add_participant_delegates_to_room() {
        // given:
        let directory = RoomDirectory::new();
        directory.create("lobby").await.unwrap();

        // when:
        let (first_handle, _first_in, _first_done) = test_handle("alice");
        let (second_handle, _second_in, _second_done) = test_handle("alice");
        let first = directory.add_participant(first_handle, "lobby").await;
        let second = directory.add_participant(second_handle, "lobby").await;

        // then:
        assert!(first.is_ok());
        assert!(matches!(
            second,
            Err(DirectoryError::Room(RoomError::ParticipantAlreadyPresent { .. }))
        ));
    }
}
