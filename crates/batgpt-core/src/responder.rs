//! Canned reply generation.

/// Reply returned for every prompt.
pub const MOCK_RESPONSE: &str = "YOU ARE GOING TO JAIL!";

/// Produces the assistant reply for a user prompt.
pub trait Responder: Send + Sync {
    /// Build the reply text for `prompt`.
    fn respond(&self, prompt: &str) -> String;
}

/// Responder that ignores the prompt and returns [`MOCK_RESPONSE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MockResponder;

impl Responder for MockResponder {
    fn respond(&self, _prompt: &str) -> String {
        MOCK_RESPONSE.to_string()
    }
}
