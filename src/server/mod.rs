//! HTTP and WebSocket boundary around the messaging plane.

pub mod extract;
pub mod handler;
pub mod runner;
pub mod signal;
pub mod state;

pub use runner::{router, run_server};
pub use state::AppState;
