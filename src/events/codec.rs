//! Framed wire codec for chat events.
//!
//! Every frame is `<Tag>|<JSON>` in a single text message: the tag names the
//! event variant and the rest is its JSON body. The separator is the first
//! `|` byte; tag and payload must both be non-empty.

use thiserror::Error;

use super::{ChatMessage, Event, SystemNotice};

/// Wire tag of [`ChatMessage`] frames.
pub const CHAT_MESSAGE_TAG: &str = "ChatMessage";

/// Wire tag of [`SystemNotice`] frames.
pub const SYSTEM_NOTICE_TAG: &str = "SystemNotice";

#[derive(Debug, Error)]
pub enum CodecError {
    /// No separator, empty tag or empty payload.
    #[error("frame is not a valid event representation")]
    MalformedFrame,
    /// The tag does not name a known event variant.
    #[error("unknown event tag '{0}'")]
    UnknownTag(String),
    /// The payload is not a valid JSON body for the tagged variant.
    #[error("malformed event payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),
    /// The event could not be serialized.
    #[error("failed to encode event: {0}")]
    Encoding(#[source] serde_json::Error),
}

/// Serialize an event into its framed wire form.
pub fn encode(event: &Event) -> Result<String, CodecError> {
    let payload = match event {
        Event::Chat(message) => serde_json::to_string(message),
        Event::System(notice) => serde_json::to_string(notice),
    }
    .map_err(CodecError::Encoding)?;

    Ok(format!("{}|{}", event.tag(), payload))
}

/// Parse an event from its framed wire form.
pub fn decode(frame: &str) -> Result<Event, CodecError> {
    let (tag, payload) = frame.split_once('|').ok_or(CodecError::MalformedFrame)?;
    if tag.is_empty() || payload.is_empty() {
        return Err(CodecError::MalformedFrame);
    }

    match tag {
        CHAT_MESSAGE_TAG => serde_json::from_str::<ChatMessage>(payload)
            .map(Event::Chat)
            .map_err(CodecError::MalformedPayload),
        SYSTEM_NOTICE_TAG => serde_json::from_str::<SystemNotice>(payload)
            .map(Event::System)
            .map_err(CodecError::MalformedPayload),
        other => Err(CodecError::UnknownTag(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn chat_event() -> Event {
        Event::Chat(ChatMessage {
            producer: "alice".to_string(),
            time: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap(),
            text: "hello there".to_string(),
        })
    }

    fn notice_event() -> Event {
        Event::System(SystemNotice {
            text: "alice joined chat".to_string(),
            time: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        })
    }

    #[test]
    fn test_chat_message_round_trip() {
        // given:
        let event = chat_event();

        // when:
        let decoded = decode(&encode(&event).unwrap()).unwrap();

        // then:
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_system_notice_round_trip() {
        // given:
        let event = notice_event();

        // when:
        let decoded = decode(&encode(&event).unwrap()).unwrap();

        // then:
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_encode_uses_tag_and_capitalised_fields() {
        // given:
        let event = chat_event();

        // when:
        let frame = encode(&event).unwrap();

        // then:
        assert!(frame.starts_with("ChatMessage|{"));
        assert!(frame.contains("\"Producer\":\"alice\""));
        assert!(frame.contains("\"Text\":\"hello there\""));
        assert!(frame.contains("\"Time\":"));
    }

    #[test]
    fn test_decode_rejects_frame_without_separator() {
        // given / when:
        let result = decode("ChatMessage");

        // then:
        assert!(matches!(result, Err(CodecError::MalformedFrame)));
    }

    #[test]
    fn test_decode_rejects_empty_tag() {
        // given / when:
        let result = decode("|{\"Text\":\"x\",\"Time\":\"2024-05-01T00:00:00Z\"}");

        // then:
        assert!(matches!(result, Err(CodecError::MalformedFrame)));
    }

    #[test]
    fn test_decode_rejects_empty_payload() {
        // given / when:
        let result = decode("ChatMessage|");

        // then:
        assert!(matches!(result, Err(CodecError::MalformedFrame)));
    }

    #[test]
    fn test_decode_rejects_unknown_tag() {
        // given / when:
        let result = decode("Whoami|{}");

        // then:
        match result {
            Err(CodecError::UnknownTag(tag)) => assert_eq!(tag, "Whoami"),
            other => panic!("expected UnknownTag, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_malformed_payload() {
        // given / when:
        let result = decode("ChatMessage|{not json");

        // then:
        assert!(matches!(result, Err(CodecError::MalformedPayload(_))));
    }

    #[test]
    fn test_decode_accepts_payload_with_pipes() {
        // given: only the first pipe separates tag from payload
        let frame = "SystemNotice|{\"Text\":\"a|b\",\"Time\":\"2024-05-01T00:00:00Z\"}";

        // when:
        let event = decode(frame).unwrap();

        // then:
        match event {
            Event::System(notice) => assert_eq!(notice.text, "a|b"),
            other => panic!("expected SystemNotice, got {:?}", other),
        }
    }
}
