//! Error types for the session store.

use batgpt_protocol::ConversationId;
use thiserror::Error;

/// Errors returned by session transitions.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Conversation id is not present in history.
    #[error("unknown conversation: {0}")]
    UnknownConversation(ConversationId),
    /// No tokio runtime is available to schedule the deferred reply.
    #[error("no async runtime available to schedule the reply")]
    SchedulerUnavailable,
}
