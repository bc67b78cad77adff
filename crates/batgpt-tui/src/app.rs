//! Application state for the BatGPT TUI.

use batgpt_core::Session;
use batgpt_protocol::{ConversationId, Message, Sender};
use log::debug;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::cmp::min;
use std::time::{Duration, Instant};

/// Panel that receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Text composer at the bottom.
    Composer,
    /// Saved conversation list.
    History,
    /// Chat transcript.
    Transcript,
}

impl Focus {
    /// Next panel in Tab order.
    fn next(self) -> Self {
        match self {
            Focus::Composer => Focus::History,
            Focus::History => Focus::Transcript,
            Focus::Transcript => Focus::Composer,
        }
    }
}

/// Severity of a status notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Short-lived message shown in the status bar.
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    expires_at: Instant,
}

/// Top-level application state for the TUI.
pub struct App {
    /// Last session snapshot read from the store.
    pub session: Session,
    /// Composer contents. Owned by the shell, never by the session.
    pub input: String,
    /// Panel receiving keys.
    pub focus: Focus,
    /// Index of the highlighted history entry.
    pub selected_history: usize,
    /// Transcript index of the highlighted assistant message.
    pub selected_message: Option<usize>,
    /// Whether to show the slash command palette.
    pub show_slash_commands: bool,
    /// Current status notice.
    pub notice: Option<Notice>,
    /// Display name in the header.
    pub user_name: String,
    /// Current scroll offset.
    pub scroll: u16,
    /// Whether to auto-scroll to the bottom.
    pub auto_scroll: bool,
    /// Maximum scroll offset for the chat view.
    pub chat_max_scroll: u16,
    notice_ttl: Duration,
}

impl App {
    /// Create application state over an initial session snapshot.
    ///
    /// The composer starts focused.
    pub fn new(session: Session, notice_ttl: Duration) -> Self {
        Self {
            session,
            input: String::new(),
            focus: Focus::Composer,
            selected_history: 0,
            selected_message: None,
            show_slash_commands: false,
            notice: None,
            user_name: "user".to_string(),
            scroll: 0,
            auto_scroll: true,
            chat_max_scroll: 0,
            notice_ttl,
        }
    }

    /// Replace the session snapshot after a store change.
    pub fn sync(&mut self, session: Session, transcript_changed: bool) {
        debug!(
            "syncing session (messages={}, history={}, transcript_changed={})",
            session.transcript.len(),
            session.history.len(),
            transcript_changed
        );
        self.session = session;
        if self.selected_history >= self.session.history.len() {
            self.selected_history = self.session.history.len().saturating_sub(1);
        }
        if let Some(active) = &self.session.active_conversation_id
            && let Some(idx) = self.session.history.iter().position(|r| &r.id == active)
        {
            self.selected_history = idx;
        }
        if transcript_changed {
            let still_valid = self
                .selected_message
                .and_then(|idx| self.session.transcript.get(idx))
                .is_some_and(|m| m.from == Sender::Assistant);
            if !still_valid {
                self.selected_message = None;
            }
            self.enable_auto_scroll();
        }
    }

    /// Show a status notice that expires after the configured ttl.
    pub fn notify(&mut self, text: impl Into<String>, kind: NoticeKind) {
        self.notice = Some(Notice {
            text: text.into(),
            kind,
            expires_at: Instant::now() + self.notice_ttl,
        });
    }

    /// Drop the notice once it has expired.
    pub fn expire_notice(&mut self, now: Instant) {
        if self
            .notice
            .as_ref()
            .is_some_and(|notice| notice.expires_at <= now)
        {
            self.notice = None;
        }
    }

    /// Move focus to the next panel.
    pub fn cycle_focus(&mut self) {
        self.set_focus(self.focus.next());
    }

    /// Move focus, selecting the last assistant message when entering the
    /// transcript.
    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        if focus == Focus::Transcript && self.selected_message.is_none() {
            self.selected_message = self.assistant_indices().last().copied();
        }
    }

    /// Whether `id` is the conversation currently selected in the store.
    pub fn is_active(&self, id: &ConversationId) -> bool {
        self.session.active_conversation_id.as_ref() == Some(id)
    }

    /// Id of the highlighted history entry.
    pub fn selected_conversation(&self) -> Option<ConversationId> {
        self.session
            .history
            .get(self.selected_history)
            .map(|record| record.id.clone())
    }

    /// Highlight the previous history entry.
    pub fn select_previous_history(&mut self) {
        self.selected_history = self.selected_history.saturating_sub(1);
    }

    /// Highlight the next history entry.
    pub fn select_next_history(&mut self) {
        if self.selected_history + 1 < self.session.history.len() {
            self.selected_history += 1;
        }
    }

    /// Highlight the previous assistant message.
    pub fn select_previous_message(&mut self) {
        let indices = self.assistant_indices();
        self.selected_message = match self.selected_message {
            Some(current) => indices
                .iter()
                .rev()
                .find(|idx| **idx < current)
                .copied()
                .or(Some(current)),
            None => indices.last().copied(),
        };
    }

    /// Highlight the next assistant message.
    pub fn select_next_message(&mut self) {
        let indices = self.assistant_indices();
        self.selected_message = match self.selected_message {
            Some(current) => indices
                .iter()
                .find(|idx| **idx > current)
                .copied()
                .or(Some(current)),
            None => indices.last().copied(),
        };
    }

    /// The highlighted assistant message.
    pub fn selected_message(&self) -> Option<&Message> {
        self.selected_message
            .and_then(|idx| self.session.transcript.get(idx))
    }

    /// Append message text to the composer and focus it.
    pub fn use_text(&mut self, text: &str) {
        self.input.push_str(text);
        self.focus = Focus::Composer;
        self.show_slash_commands = self.input.trim_start().starts_with('/');
    }

    fn assistant_indices(&self) -> Vec<usize> {
        self.session
            .transcript
            .iter()
            .enumerate()
            .filter(|(_, message)| message.from == Sender::Assistant)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Scroll the chat view upward by a number of lines.
    pub fn scroll_up(&mut self, lines: u16) {
        self.auto_scroll = false;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Scroll the chat view downward by a number of lines.
    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = min(self.scroll.saturating_add(lines), self.chat_max_scroll);
        if self.scroll >= self.chat_max_scroll {
            self.auto_scroll = true;
        }
    }

    /// Scroll to the top of the chat view.
    pub fn scroll_to_top(&mut self) {
        self.auto_scroll = false;
        self.scroll = 0;
    }

    /// Pin the chat view to the bottom.
    pub fn enable_auto_scroll(&mut self) {
        self.auto_scroll = true;
        self.scroll = self.chat_max_scroll;
    }

    /// Update scroll bounds after layout changes.
    ///
    /// Snaps to the new bottom only when `auto_scroll` is on or the view was
    /// already at the exact bottom, so a user who scrolled up stays put.
    pub fn update_scroll_bounds(&mut self, max_scroll: u16) {
        let was_at_bottom = self.scroll >= self.chat_max_scroll;
        self.chat_max_scroll = max_scroll;
        if self.auto_scroll || was_at_bottom {
            self.scroll = max_scroll;
            self.auto_scroll = true;
        } else {
            self.scroll = self.scroll.min(max_scroll);
        }
    }

    /// Render transcript messages into styled lines for the UI.
    pub fn render_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if self.session.transcript.is_empty() {
            lines.push(Line::from(Span::styled(
                " Nothing here yet. Type a line below to start the scene.",
                Style::default().fg(Color::Rgb(128, 128, 128)),
            )));
            return lines;
        }

        let transcript_focused = self.focus == Focus::Transcript;
        for (idx, message) in self.session.transcript.iter().enumerate() {
            let selected = transcript_focused && self.selected_message == Some(idx);
            let marker = if selected { "▶" } else { " " };
            let marker_style = Style::default().fg(Color::Rgb(255, 215, 0));

            match message.from {
                Sender::Assistant => {
                    lines.push(Line::from(vec![
                        Span::styled(marker, marker_style),
                        Span::styled(
                            " BatGPT ",
                            Style::default()
                                .fg(Color::Rgb(10, 10, 10))
                                .bg(Color::Rgb(255, 215, 0))
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(" (mock)", Style::default().fg(Color::Rgb(128, 128, 128))),
                    ]));
                    let code_style = Style::default().fg(Color::Rgb(152, 195, 121));
                    let gutter_style = Style::default().fg(Color::Rgb(60, 60, 60));
                    for line in message.text.lines() {
                        lines.push(Line::from(vec![
                            Span::styled("  │ ", gutter_style),
                            Span::styled(line.to_string(), code_style),
                        ]));
                    }
                    if selected {
                        lines.push(Line::from(Span::styled(
                            "  [c] copy  [u] use",
                            Style::default()
                                .fg(Color::Rgb(128, 128, 128))
                                .add_modifier(Modifier::ITALIC),
                        )));
                    }
                }
                Sender::User => {
                    lines.push(Line::from(vec![
                        Span::styled(marker, marker_style),
                        Span::styled(
                            " You ",
                            Style::default()
                                .fg(Color::Rgb(10, 10, 10))
                                .bg(Color::Rgb(107, 161, 230))
                                .add_modifier(Modifier::BOLD),
                        ),
                    ]));
                    let text_style = Style::default().fg(Color::Rgb(238, 238, 238));
                    for line in message.text.lines() {
                        lines.push(Line::from(Span::styled(format!("  {line}"), text_style)));
                    }
                }
            }

            if idx + 1 < self.session.transcript.len() {
                lines.push(Line::from(Span::raw("")));
            }
        }

        // Trailing padding so the last message always scrolls fully into view.
        lines.push(Line::from(Span::raw("")));

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batgpt_protocol::Message;
    use pretty_assertions::assert_eq;

    fn app_with(transcript: Vec<Message>) -> App {
        let mut session = Session::bootstrap();
        session.transcript = transcript;
        App::new(session, Duration::from_millis(100))
    }

    #[test]
    fn starts_with_composer_focus() {
        let app = App::new(Session::bootstrap(), Duration::from_secs(1));
        assert_eq!(app.focus, Focus::Composer);
        assert!(app.auto_scroll);
    }

    #[test]
    fn message_selection_skips_user_messages() {
        let mut app = app_with(vec![
            Message::assistant("a0"),
            Message::user("u1"),
            Message::assistant("a2"),
            Message::user("u3"),
        ]);
        app.set_focus(Focus::Transcript);
        assert_eq!(app.selected_message, Some(2));
        app.select_previous_message();
        assert_eq!(app.selected_message, Some(0));
        app.select_previous_message();
        assert_eq!(app.selected_message, Some(0));
        app.select_next_message();
        assert_eq!(app.selected_message, Some(2));
        app.select_next_message();
        assert_eq!(app.selected_message, Some(2));
        assert_eq!(app.selected_message().map(|m| m.text.as_str()), Some("a2"));
    }

    #[test]
    fn use_text_appends_and_focuses_composer() {
        let mut app = app_with(vec![Message::assistant("payload")]);
        app.input = "draft: ".to_string();
        app.set_focus(Focus::Transcript);
        app.use_text("payload");
        assert_eq!(app.input, "draft: payload");
        assert_eq!(app.focus, Focus::Composer);
    }

    #[test]
    fn transcript_change_pins_view_to_bottom() {
        let mut app = app_with(vec![Message::assistant("a")]);
        app.update_scroll_bounds(10);
        app.scroll_up(5);
        assert!(!app.auto_scroll);

        let mut next = app.session.clone();
        next.transcript.push(Message::user("b"));
        app.sync(next, true);
        assert!(app.auto_scroll);
        assert_eq!(app.scroll, 10);
    }

    #[test]
    fn history_only_change_keeps_scroll() {
        let mut app = app_with(vec![Message::assistant("a")]);
        app.update_scroll_bounds(10);
        app.scroll_up(5);
        let session = app.session.clone();
        app.sync(session, false);
        assert!(!app.auto_scroll);
        assert_eq!(app.scroll, 5);
    }

    #[test]
    fn sync_highlights_active_conversation() {
        let mut app = app_with(Vec::new());
        let mut session = app.session.clone();
        session.active_conversation_id = Some(ConversationId::from("conv-2"));
        app.sync(session, true);
        assert_eq!(app.selected_history, 1);
        assert!(app.is_active(&ConversationId::from("conv-2")));
    }

    #[test]
    fn notice_expires() {
        let mut app = app_with(Vec::new());
        app.notify("Copied to clipboard", NoticeKind::Info);
        app.expire_notice(Instant::now());
        assert!(app.notice.is_some());
        app.expire_notice(Instant::now() + Duration::from_millis(200));
        assert!(app.notice.is_none());
    }

    #[test]
    fn empty_transcript_renders_placeholder() {
        let app = app_with(Vec::new());
        let lines = app.render_lines();
        assert_eq!(lines.len(), 1);
    }
}
