//! TUI event types for input and session messages.

use batgpt_protocol::EventMsg;
use crossterm::event::KeyEvent;

/// Application event emitted by input handlers or the session stream.
#[derive(Debug)]
pub enum AppEvent {
    /// Keyboard input event.
    Input(KeyEvent),
    /// Periodic tick event.
    Tick,
    /// Change event committed by the session store.
    Session(EventMsg),
    /// Events were dropped; re-read the whole session.
    Resync,
    /// Scroll event in the chat view.
    Scroll(i16),
}
