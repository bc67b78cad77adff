//! Shared types for BatGPT: the message model and session change events.

mod message;

pub use message::{ConversationId, Message, MessageId, Sender};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wrapper for events emitted after a committed session transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMsg {
    /// Unique id for the event.
    pub id: Uuid,
    /// Timestamp when the event was created.
    pub created_at: DateTime<Utc>,
    /// Event payload content.
    pub payload: EventPayload,
}

impl EventMsg {
    /// Wrap a payload with a fresh id and timestamp.
    pub fn new(payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            payload,
        }
    }
}

/// All transitions the session store can commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "payload")]
pub enum EventPayload {
    /// A message was appended to the live transcript.
    MessageAppended { message: Message },
    /// The transcript was replaced by a copy of a saved conversation.
    ConversationLoaded { conversation_id: ConversationId },
    /// The transcript was saved as a new conversation at the front of history.
    ConversationSaved { conversation_id: ConversationId },
    /// The transcript was reset to the welcome message.
    SessionReset,
}

impl EventPayload {
    /// Whether the payload changed the live transcript.
    pub fn changes_transcript(&self) -> bool {
        !matches!(self, EventPayload::ConversationSaved { .. })
    }
}

/// Sink interface for session change events.
pub trait EventSink: Send + Sync {
    /// Emit an event to downstream listeners.
    fn emit(&self, event: EventMsg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn sender_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Sender::User).expect("user"), json!("user"));
        assert_eq!(
            serde_json::to_value(Sender::Assistant).expect("assistant"),
            json!("assistant")
        );
        assert_eq!(Sender::Assistant.as_str(), "assistant");
    }

    #[test]
    fn event_payload_is_tagged() {
        let event = EventMsg::new(EventPayload::ConversationLoaded {
            conversation_id: ConversationId::from("conv-2"),
        });
        let encoded = serde_json::to_value(&event).expect("serialize");
        assert_eq!(
            encoded["payload"],
            json!({ "type": "conversation_loaded", "payload": { "conversation_id": "conv-2" } })
        );
    }

    #[test]
    fn reidentified_message_keeps_content() {
        let original = Message::user("hello");
        let copy = original.reidentified();
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.from, original.from);
        assert_eq!(copy.text, original.text);
    }

    #[test]
    fn generated_conversation_ids_are_distinct() {
        let first = ConversationId::generate();
        let second = ConversationId::generate();
        assert_ne!(first, second);
        assert!(first.as_str().starts_with("conv-"));
    }

    #[test]
    fn only_saves_leave_transcript_untouched() {
        assert!(EventPayload::SessionReset.changes_transcript());
        assert!(
            !EventPayload::ConversationSaved {
                conversation_id: ConversationId::from("conv-9"),
            }
            .changes_transcript()
        );
    }
}
