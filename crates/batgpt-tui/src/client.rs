//! Session client used by the TUI.

use crate::event::AppEvent;
use crate::event_bus::EventBus;
use anyhow::Result;
use batgpt_core::{Session, SessionStore};
use batgpt_protocol::{ConversationId, EventMsg};
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Client that owns the session store handle and its event subscription.
#[derive(Clone)]
pub struct SessionClient {
    store: SessionStore,
    events: EventBus,
}

impl SessionClient {
    /// Create a new client and subscribe the event bus to the store.
    pub fn new(store: SessionStore, events: EventBus) -> Self {
        store.subscribe(Arc::new(events.clone()));
        Self { store, events }
    }

    /// Copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.store.snapshot()
    }

    /// Send a prompt. Returns false when the prompt was blank and ignored.
    pub fn send_message(&self, prompt: String) -> Result<bool> {
        debug!("sending message (prompt_len={})", prompt.len());
        Ok(self.store.append_user_message(prompt)?.is_some())
    }

    /// Load a saved conversation into the transcript.
    pub fn load_conversation(&self, id: &ConversationId) -> Result<()> {
        Ok(self.store.load_conversation(id)?)
    }

    /// Save the transcript under `title`.
    pub fn save_conversation(&self, title: &str) -> ConversationId {
        self.store.save_current_to_history(title)
    }

    /// Reset the transcript to the welcome message.
    pub fn reset(&self) {
        self.store.reset_session();
    }

    /// Open a receiver on the event bus.
    pub fn subscribe_events(&self) -> broadcast::Receiver<EventMsg> {
        self.events.subscribe()
    }

    /// Forward session events to the app until the bus closes.
    pub async fn stream_events(
        mut receiver: broadcast::Receiver<EventMsg>,
        sender: mpsc::Sender<AppEvent>,
    ) -> Result<()> {
        info!("forwarding session events");
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if sender.send(AppEvent::Session(event)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("session stream lagged (skipped={})", skipped);
                    if sender.send(AppEvent::Resync).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        info!("session event stream closed");
        Ok(())
    }
}
