//! Session state for BatGPT.
//!
//! This crate owns the conversation model (transcript, saved history, active
//! selection), the transitions over it, and the mock responder that answers
//! every prompt after a short delay.

pub mod error;
pub mod responder;
pub mod store;
pub mod types;

pub use batgpt_protocol::EventSink;
pub use error::CoreError;
pub use responder::{MOCK_RESPONSE, MockResponder, Responder};
pub use store::{SessionStore, SubscriptionId};
pub use types::{ConversationRecord, Session, WELCOME_TEXT};
