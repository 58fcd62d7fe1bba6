//! Chat events and their framed wire representation.
//!
//! [`Event`] is the closed set of messages travelling between server and
//! clients. [`ChatMessage`] is the only variant clients may produce; its
//! `producer` and `time` fields are server-assigned on ingress, so whatever
//! a client puts there is discarded. [`SystemNotice`] is server-originated
//! only (join and leave announcements).

pub mod codec;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message sent by a participant and broadcast to its room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChatMessage {
    pub producer: String,
    pub time: DateTime<Utc>,
    pub text: String,
}

/// A server-originated notice shown to room members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemNotice {
    pub text: String,
    pub time: DateTime<Utc>,
}

/// One event on the chat wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Chat(ChatMessage),
    System(SystemNotice),
}

impl Event {
    /// The wire tag naming this variant.
    pub fn tag(&self) -> &'static str {
        match self {
            Event::Chat(_) => codec::CHAT_MESSAGE_TAG,
            Event::System(_) => codec::SYSTEM_NOTICE_TAG,
        }
    }
}
