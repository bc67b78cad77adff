//! Session data owned by the store.

use crate::responder::MOCK_RESPONSE;
use batgpt_protocol::{ConversationId, Message};
use serde::{Deserialize, Serialize};

/// Text of the assistant message a fresh or reset transcript starts with.
pub const WELCOME_TEXT: &str = "Welcome to BatGPT — the *questionable* assistant.";

/// Number of characters of the last message kept as a history snippet.
pub const SNIPPET_CHARS: usize = 80;

/// Saved snapshot of a transcript shown in history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationRecord {
    /// Conversation identifier, unique within history.
    pub id: ConversationId,
    /// Human-friendly title.
    pub title: String,
    /// Short preview of the conversation.
    pub snippet: String,
    /// Transcript captured when the record was saved.
    pub messages: Vec<Message>,
}

impl ConversationRecord {
    /// Snapshot `messages` under a freshly generated id.
    pub fn snapshot(title: impl Into<String>, messages: &[Message]) -> Self {
        Self {
            id: ConversationId::generate(),
            title: title.into(),
            snippet: snippet_for(messages),
            messages: messages.to_vec(),
        }
    }
}

/// Preview text for a transcript: the start of the last message.
pub fn snippet_for(messages: &[Message]) -> String {
    messages
        .last()
        .map(|message| message.text.chars().take(SNIPPET_CHARS).collect())
        .unwrap_or_default()
}

/// Full observable session state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Messages currently displayed.
    pub transcript: Vec<Message>,
    /// Saved conversations, most recently saved first.
    pub history: Vec<ConversationRecord>,
    /// Saved conversation the transcript was loaded from or saved as.
    pub active_conversation_id: Option<ConversationId>,
}

impl Session {
    /// Session with only the welcome message and an empty history.
    pub fn new() -> Self {
        Self {
            transcript: welcome_transcript(),
            history: Vec::new(),
            active_conversation_id: None,
        }
    }

    /// Session with the welcome message and the two example scenes.
    pub fn bootstrap() -> Self {
        Self {
            history: seed_history(),
            ..Self::new()
        }
    }

    /// Look up a saved conversation.
    pub fn conversation(&self, id: &ConversationId) -> Option<&ConversationRecord> {
        self.history.iter().find(|record| &record.id == id)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Transcript holding only the welcome message.
pub fn welcome_transcript() -> Vec<Message> {
    vec![Message::assistant(WELCOME_TEXT)]
}

fn seed_history() -> Vec<ConversationRecord> {
    vec![
        ConversationRecord {
            id: ConversationId::from("conv-1"),
            title: "Scene: Interview".to_string(),
            snippet: "Actor asks about 'make it fast'...".to_string(),
            messages: vec![
                Message::user("Make an encryption function"),
                Message::assistant(MOCK_RESPONSE),
            ],
        },
        ConversationRecord {
            id: ConversationId::from("conv-2"),
            title: "Scene: Debug".to_string(),
            snippet: "Actor wants to fix login...".to_string(),
            messages: vec![
                Message::user("How to break into the server?"),
                Message::assistant("Access denied. But here's a joke."),
            ],
        },
    ]
}
