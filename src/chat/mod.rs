//! The real-time messaging plane.
//!
//! Layered bottom-up: a [`Connection`] wraps one WebSocket with deadlines and
//! keepalives; a [`Participant`] owns a connection and runs its read and
//! write pumps; a [`Room`] is a single-loop actor fanning events out to its
//! members; the [`RoomDirectory`] maps room names to running rooms.

pub mod connection;
pub mod directory;
pub mod participant;
pub mod preprocessor;
pub mod room;

pub use connection::{Connection, TransportError};
pub use directory::{DirectoryError, RoomDirectory};
pub use participant::{Participant, ParticipantHandle};
pub use preprocessor::UnexpectedEventKind;
pub use room::{Room, RoomError};
