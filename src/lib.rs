//! Multi-room WebSocket chat server.
//!
//! The heart of the crate is the `chat` module: every room is a single-loop
//! actor owning its membership, and every connected user is a participant
//! running a read pump and a write pump over its socket. Events travel
//! between them on channels only. The remaining modules form the boundary
//! around that plane: the framed wire codec, bearer-token auth, the user
//! credential store and the axum server surface.

// messaging plane
pub mod chat;
pub mod events;

// boundary
pub mod auth;
pub mod server;
pub mod store;

// shared library
pub mod common;
pub mod config;
