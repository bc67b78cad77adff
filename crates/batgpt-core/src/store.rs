//! Session store: the single owner of session state and its transitions.

use crate::error::CoreError;
use crate::responder::{MockResponder, Responder};
use crate::types::{ConversationRecord, Session, welcome_transcript};
use batgpt_config::BatgptConfig;
use batgpt_protocol::{ConversationId, EventMsg, EventPayload, EventSink, Message, MessageId};
use log::{debug, info, warn};
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;

/// Delay before the mock reply lands when no config overrides it.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(650);

/// Handle returned by [`SessionStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Shared session store.
///
/// Clones share the same state. Every committed transition is followed by
/// exactly one event to each subscriber, emitted after the state lock is
/// released so listeners may read the store.
#[derive(Clone)]
pub struct SessionStore {
    session: Arc<RwLock<Session>>,
    listeners: Arc<RwLock<Vec<(SubscriptionId, Arc<dyn EventSink>)>>>,
    next_subscription: Arc<AtomicU64>,
    responder: Arc<dyn Responder>,
    reply_delay: Duration,
}

impl SessionStore {
    /// Create a store over an initial session with the mock responder.
    pub fn new(initial: Session) -> Self {
        Self {
            session: Arc::new(RwLock::new(initial)),
            listeners: Arc::new(RwLock::new(Vec::new())),
            next_subscription: Arc::new(AtomicU64::new(1)),
            responder: Arc::new(MockResponder),
            reply_delay: DEFAULT_REPLY_DELAY,
        }
    }

    /// Create a store seeded and timed according to `config`.
    pub fn from_config(config: &BatgptConfig) -> Self {
        let initial = if config.history.seed_examples {
            Session::bootstrap()
        } else {
            Session::new()
        };
        info!(
            "session store created (seeded={}, reply_delay_ms={})",
            config.history.seed_examples, config.reply.delay_ms
        );
        Self::new(initial).with_reply_delay(Duration::from_millis(config.reply.delay_ms))
    }

    /// Replace the delay used for deferred replies.
    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    /// Replace the responder used for deferred replies.
    pub fn with_responder(mut self, responder: Arc<dyn Responder>) -> Self {
        self.responder = responder;
        self
    }

    /// Delay applied to deferred replies.
    pub fn reply_delay(&self) -> Duration {
        self.reply_delay
    }

    /// Register a listener notified after every committed transition.
    pub fn subscribe(&self, listener: Arc<dyn EventSink>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, listener));
        debug!("listener subscribed (subscription_id={})", id.0);
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        before != listeners.len()
    }

    /// Deep copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.session.read().clone()
    }

    /// Copy of the live transcript.
    pub fn transcript(&self) -> Vec<Message> {
        self.session.read().transcript.clone()
    }

    /// Copy of the saved conversations, most recent first.
    pub fn history(&self) -> Vec<ConversationRecord> {
        self.session.read().history.clone()
    }

    /// Conversation currently selected, if any.
    pub fn active_conversation_id(&self) -> Option<ConversationId> {
        self.session.read().active_conversation_id.clone()
    }

    /// Copy of a saved conversation.
    pub fn conversation(&self, id: &ConversationId) -> Option<ConversationRecord> {
        self.session.read().conversation(id).cloned()
    }

    /// Append a user message and schedule the mock reply.
    ///
    /// Blank input is ignored and returns `Ok(None)`. The reply is appended
    /// by a timer task after [`reply_delay`](Self::reply_delay); replies to
    /// overlapping sends land in timer completion order and cannot be
    /// cancelled.
    ///
    /// # Errors
    /// Returns [`CoreError::SchedulerUnavailable`] when called outside a tokio
    /// runtime. The transcript is left untouched in that case.
    pub fn append_user_message(
        &self,
        text: impl Into<String>,
    ) -> Result<Option<MessageId>, CoreError> {
        let text = text.into();
        if text.trim().is_empty() {
            debug!("ignoring blank user message");
            return Ok(None);
        }
        let runtime = Handle::try_current().map_err(|_| {
            warn!("no runtime available for deferred reply");
            CoreError::SchedulerUnavailable
        })?;

        let message = Message::user(text.clone());
        let message_id = message.id;
        self.append(message);
        self.schedule_reply(&runtime, text);
        Ok(Some(message_id))
    }

    /// Append an assistant message. This is the transition a fired reply
    /// timer invokes.
    pub fn append_assistant_message(&self, text: impl Into<String>) -> MessageId {
        let message = Message::assistant(text);
        let message_id = message.id;
        self.append(message);
        message_id
    }

    /// Replace the transcript with a copy of a saved conversation.
    ///
    /// The copy gets fresh message ids so the live transcript never aliases
    /// the stored record.
    ///
    /// # Errors
    /// Returns [`CoreError::UnknownConversation`] without changing state when
    /// `id` is not in history.
    pub fn load_conversation(&self, id: &ConversationId) -> Result<(), CoreError> {
        {
            let mut session = self.session.write();
            let transcript: Vec<Message> = session
                .conversation(id)
                .ok_or_else(|| CoreError::UnknownConversation(id.clone()))?
                .messages
                .iter()
                .map(Message::reidentified)
                .collect();
            info!(
                "loading conversation (conversation_id={}, message_count={})",
                id,
                transcript.len()
            );
            session.transcript = transcript;
            session.active_conversation_id = Some(id.clone());
        }
        self.emit(EventPayload::ConversationLoaded {
            conversation_id: id.clone(),
        });
        Ok(())
    }

    /// Save the transcript as a new conversation at the front of history and
    /// select it. Empty transcripts are saved too.
    pub fn save_current_to_history(&self, title: impl Into<String>) -> ConversationId {
        let conversation_id = {
            let mut session = self.session.write();
            let record = ConversationRecord::snapshot(title, &session.transcript);
            let conversation_id = record.id.clone();
            info!(
                "saving conversation (conversation_id={}, message_count={})",
                conversation_id,
                record.messages.len()
            );
            session.history.insert(0, record);
            session.active_conversation_id = Some(conversation_id.clone());
            conversation_id
        };
        self.emit(EventPayload::ConversationSaved {
            conversation_id: conversation_id.clone(),
        });
        conversation_id
    }

    /// Reset the transcript to the welcome message and clear the selection.
    /// History is kept.
    pub fn reset_session(&self) {
        {
            let mut session = self.session.write();
            session.transcript = welcome_transcript();
            session.active_conversation_id = None;
        }
        info!("session reset");
        self.emit(EventPayload::SessionReset);
    }

    /// Append a message; the transcript no longer matches any saved record.
    fn append(&self, message: Message) {
        {
            let mut session = self.session.write();
            debug!(
                "appending message (from={}, text_len={})",
                message.from.as_str(),
                message.text.len()
            );
            session.transcript.push(message.clone());
            session.active_conversation_id = None;
        }
        self.emit(EventPayload::MessageAppended { message });
    }

    fn schedule_reply(&self, runtime: &Handle, prompt: String) {
        let store = self.clone();
        let delay = self.reply_delay;
        debug!(
            "scheduling reply (delay_ms={}, prompt_len={})",
            delay.as_millis(),
            prompt.len()
        );
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let reply = store.responder.respond(&prompt);
            store.append_assistant_message(reply);
        });
    }

    fn emit(&self, payload: EventPayload) {
        let listeners: Vec<Arc<dyn EventSink>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        let event = EventMsg::new(payload);
        for listener in listeners {
            listener.emit(event.clone());
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Session::bootstrap())
    }
}
