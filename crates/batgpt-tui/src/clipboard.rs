//! Clipboard access for the TUI.
//!
//! Tries transports in order:
//! 1. OSC 52 terminal escape sequence (works over SSH)
//! 2. System clipboard via `arboard`

use std::io::Write;
use thiserror::Error;

/// Write-only clipboard used by the copy action.
pub trait Clipboard: Send + Sync {
    /// Place `text` on the clipboard.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard operation errors.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// OSC 52 write failed.
    #[error("OSC 52 clipboard failed: {0}")]
    Osc52(String),
    /// System clipboard operation failed.
    #[error("system clipboard failed: {0}")]
    System(String),
}

/// Clipboard backed by the terminal and the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if Self::copy_osc52(text).is_ok() {
            return Ok(());
        }
        Self::copy_system(text)
    }
}

impl SystemClipboard {
    /// Copy using the OSC 52 escape sequence; the terminal intercepts it.
    fn copy_osc52(text: &str) -> Result<(), ClipboardError> {
        use base64::Engine;

        let encoded = base64::engine::general_purpose::STANDARD.encode(text);

        // ESC ] 52 ; c ; <base64> ESC \
        let mut stdout = std::io::stdout();
        write!(stdout, "\x1b]52;c;{encoded}\x1b\\")
            .map_err(|e| ClipboardError::Osc52(e.to_string()))?;
        stdout
            .flush()
            .map_err(|e| ClipboardError::Osc52(e.to_string()))?;
        Ok(())
    }

    fn copy_system(text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::System(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::System(e.to_string()))?;
        Ok(())
    }
}
