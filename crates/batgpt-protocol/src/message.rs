//! Chat message model shared by the store and the shell.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a transcript message.
pub type MessageId = Uuid;

/// Speaker that produced a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed by the person at the keyboard.
    User,
    /// Produced by the mock assistant.
    Assistant,
}

impl Sender {
    /// Return the sender as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

/// Single transcript entry. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Message identifier, unique within its transcript.
    pub id: MessageId,
    /// Speaker that produced the message.
    pub from: Sender,
    /// Message body as typed or generated.
    pub text: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a message with a fresh identifier.
    pub fn new(from: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Create an assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }

    /// Copy of this message under a new identifier.
    pub fn reidentified(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }
}

/// Identifier of a saved conversation (`conv-1`, `conv-<uuid>`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier that cannot collide with earlier ones.
    pub fn generate() -> Self {
        Self(format!("conv-{}", Uuid::new_v4().simple()))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ConversationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
