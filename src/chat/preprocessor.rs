//! Ingress event admission and server-authoritative stamping.

use chrono::Utc;
use thiserror::Error;

use crate::events::Event;

/// An inbound event of a kind clients may not produce.
#[derive(Debug, Error)]
#[error("got event of unexpected kind '{kind}' from '{producer}'")]
pub struct UnexpectedEventKind {
    pub kind: &'static str,
    pub producer: String,
}

/// Validate an inbound event and stamp the fields the server owns.
///
/// Only chat messages are admissible from clients. Whatever producer and
/// time the client encoded are overwritten with the sender's identity and
/// the server clock, so neither can be spoofed.
pub fn pre_process(event: &mut Event, producer: &str) -> Result<(), UnexpectedEventKind> {
    match event {
        Event::Chat(message) => {
            message.producer = producer.to_string();
            message.time = Utc::now();
            Ok(())
        }
        other => Err(UnexpectedEventKind {
            kind: other.tag(),
            producer: producer.to_string(),
        }),
    }
}
