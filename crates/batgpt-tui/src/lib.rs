//! Library entry point for the BatGPT TUI.
//!
//! Provides a reusable [`run`] function that launches the Ratatui terminal UI
//! against a pre-configured [`SessionStore`].

mod app;
mod client;
pub mod clipboard;
mod event;
mod event_bus;
mod ui;

pub use event_bus::EventBus;

use anyhow::{Context, anyhow};
use app::{App, Focus, NoticeKind};
use batgpt_config::{BatgptConfig, LayeredConfigOptions};
use batgpt_core::SessionStore;
use batgpt_protocol::{ConversationId, EventMsg};
use client::SessionClient;
use clipboard::{Clipboard, SystemClipboard};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode, KeyEvent,
    KeyEventKind, KeyModifiers, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use event::AppEvent;
use log::{debug, info, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};

const ENV_USER: &str = "USER";
const ENV_USERNAME: &str = "USERNAME";
const EVENT_BUFFER: usize = 256;

/// Supported slash commands in the TUI input box.
#[derive(Debug, PartialEq, Eq)]
enum SlashCommand {
    Save(Option<String>),
    Reset,
    Load(ConversationId),
    History,
}

/// Configuration for the BatGPT TUI session.
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// Title used by `Ctrl+S` and a bare `/save`.
    pub default_title: String,
    /// How long status notices stay visible.
    pub notice_ttl: Duration,
    /// Interval of the tick that expires notices.
    pub tick_rate: Duration,
    /// Display name for the current user.
    pub user_name: Option<String>,
}

impl TuiConfig {
    /// Derive shell settings from the loaded config.
    pub fn from_config(config: &BatgptConfig) -> Self {
        Self {
            default_title: config.history.default_title.clone(),
            notice_ttl: Duration::from_millis(config.ui.notice_ms),
            tick_rate: Duration::from_millis(config.ui.tick_ms),
            user_name: config.ui.user_name.clone(),
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self::from_config(&BatgptConfig::default())
    }
}

/// Load the layered config, applying `config_path` as the top runtime layer.
///
/// # Errors
/// Returns an error when a layer cannot be read or the merged config is invalid.
pub fn load_config(
    options: LayeredConfigOptions,
    config_path: Option<&Path>,
) -> anyhow::Result<BatgptConfig> {
    let options = match config_path {
        Some(path) => {
            info!("applying config override (path={})", path.display());
            options.with_runtime_path(path)
        }
        None => options,
    };
    let layered = BatgptConfig::load_layered_with_options(options)
        .context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    Ok(layered.config)
}

/// Handles the shell needs to act on input.
struct Shell {
    client: SessionClient,
    clipboard: Box<dyn Clipboard>,
    default_title: String,
}

impl Shell {
    fn new(client: SessionClient, clipboard: Box<dyn Clipboard>, config: &TuiConfig) -> Self {
        Self {
            client,
            clipboard,
            default_title: config.default_title.clone(),
        }
    }

    /// Fresh app state over the current session.
    fn mount(&self, config: &TuiConfig) -> App {
        let mut app = App::new(self.client.snapshot(), config.notice_ttl);
        app.user_name = config.user_name.clone().unwrap_or_else(resolve_user_name);
        app
    }
}

/// Launch the BatGPT TUI against a session store.
///
/// The caller is responsible for initializing logging (e.g. `env_logger`)
/// before calling `run`.
///
/// # Errors
/// Returns an error if terminal setup or the event loop fails.
pub async fn run(store: SessionStore, config: TuiConfig) -> anyhow::Result<()> {
    let events = EventBus::new(EVENT_BUFFER);
    let client = SessionClient::new(store, events);
    let session_events = client.subscribe_events();
    let shell = Shell::new(client, Box::new(SystemClipboard), &config);
    let mut app = shell.mount(&config);

    let mut terminal = setup_terminal()?;
    let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
    spawn_input_handler(tx.clone());
    spawn_tick(tx.clone(), config.tick_rate);
    spawn_session_stream(session_events, tx);

    info!("tui started (user={})", app.user_name);
    let outcome = async {
        loop {
            terminal.draw(|frame| ui::draw(frame, &mut app))?;
            let event = rx
                .recv()
                .await
                .ok_or_else(|| anyhow!("event channel closed unexpectedly"))?;
            if handle_app_event(event, &shell, &mut app)? {
                break;
            }
        }
        anyhow::Ok(())
    }
    .await;

    restore_terminal(&mut terminal)?;
    outcome
}

/// Dispatch a UI event and return true when the app should exit.
fn handle_app_event(event: AppEvent, shell: &Shell, app: &mut App) -> anyhow::Result<bool> {
    match event {
        AppEvent::Input(key) => handle_input(key, shell, app),
        AppEvent::Session(event) => {
            debug!("session event (id={})", event.id);
            app.sync(shell.client.snapshot(), event.payload.changes_transcript());
            Ok(false)
        }
        AppEvent::Resync => {
            app.sync(shell.client.snapshot(), true);
            Ok(false)
        }
        AppEvent::Scroll(delta) => {
            if delta < 0 {
                app.scroll_up(delta.unsigned_abs());
            } else if delta > 0 {
                app.scroll_down(delta.unsigned_abs());
            }
            Ok(false)
        }
        AppEvent::Tick => {
            app.expire_notice(Instant::now());
            Ok(false)
        }
    }
}

/// Handle keyboard input and dispatch actions.
fn handle_input(key: KeyEvent, shell: &Shell, app: &mut App) -> anyhow::Result<bool> {
    if key.kind == KeyEventKind::Release {
        return Ok(false);
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => return Ok(true),
        KeyCode::Char('s') if ctrl => {
            let title = shell.default_title.clone();
            save_conversation(shell, app, &title);
            return Ok(false);
        }
        KeyCode::Char('r') if ctrl => {
            reset_session(shell, app);
            return Ok(false);
        }
        KeyCode::Esc => {
            if app.show_slash_commands {
                app.show_slash_commands = false;
                app.input.clear();
            } else {
                app.set_focus(Focus::Composer);
            }
            return Ok(false);
        }
        KeyCode::Tab => {
            app.cycle_focus();
            return Ok(false);
        }
        KeyCode::PageUp => {
            app.scroll_up(5);
            return Ok(false);
        }
        KeyCode::PageDown => {
            app.scroll_down(5);
            return Ok(false);
        }
        KeyCode::Home => {
            app.scroll_to_top();
            return Ok(false);
        }
        KeyCode::End => {
            app.enable_auto_scroll();
            return Ok(false);
        }
        _ => {}
    }

    match app.focus {
        Focus::Composer => handle_composer_input(key, shell, app),
        Focus::History => handle_history_input(key, shell, app),
        Focus::Transcript => handle_transcript_input(key, shell, app),
    }
}

/// Handle keyboard input while the composer has focus.
fn handle_composer_input(key: KeyEvent, shell: &Shell, app: &mut App) -> anyhow::Result<bool> {
    match key.code {
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            app.input.push('\n');
        }
        KeyCode::Enter => {
            if app.input.trim().is_empty() {
                app.show_slash_commands = false;
                return Ok(false);
            }
            app.show_slash_commands = false;
            // Text that is not a known command is sent as a prompt.
            match parse_slash_command(&app.input) {
                Ok(Some(command)) => {
                    app.input.clear();
                    handle_slash_command(shell, app, command);
                }
                Ok(None) => send_message(shell, app),
                Err(err) => app.notify(err, NoticeKind::Error),
            }
        }
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::Backspace => {
            app.input.pop();
            app.show_slash_commands = app.input.trim_start().starts_with('/');
        }
        KeyCode::Char(ch) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL) {
                app.input.push(ch);
                app.show_slash_commands = app.input.trim_start().starts_with('/');
            }
        }
        _ => {}
    }
    Ok(false)
}

/// Handle keyboard input while the history panel has focus.
fn handle_history_input(key: KeyEvent, shell: &Shell, app: &mut App) -> anyhow::Result<bool> {
    match key.code {
        KeyCode::Up => app.select_previous_history(),
        KeyCode::Down => app.select_next_history(),
        KeyCode::Enter => {
            if let Some(id) = app.selected_conversation() {
                load_conversation(shell, app, &id);
            }
        }
        _ => {}
    }
    Ok(false)
}

/// Handle keyboard input while the transcript has focus.
fn handle_transcript_input(key: KeyEvent, shell: &Shell, app: &mut App) -> anyhow::Result<bool> {
    match key.code {
        KeyCode::Up => app.select_previous_message(),
        KeyCode::Down => app.select_next_message(),
        KeyCode::Char('c') => copy_selected_message(shell, app),
        KeyCode::Char('u') => {
            if let Some(text) = app.selected_message().map(|m| m.text.clone()) {
                app.use_text(&text);
            }
        }
        _ => {}
    }
    Ok(false)
}

/// Run a slash command entered in the input box.
fn handle_slash_command(shell: &Shell, app: &mut App, command: SlashCommand) {
    debug!("handling slash command ({command:?})");
    match command {
        SlashCommand::Save(title) => {
            let title = title.unwrap_or_else(|| shell.default_title.clone());
            save_conversation(shell, app, &title);
        }
        SlashCommand::Reset => reset_session(shell, app),
        SlashCommand::Load(id) => load_conversation(shell, app, &id),
        SlashCommand::History => app.set_focus(Focus::History),
    }
}

/// Parse a slash command from the input line.
///
/// Returns `Ok(None)` for anything that is not a known command word, such as
/// a pasted path, so the caller can send it as a prompt.
fn parse_slash_command(input: &str) -> Result<Option<SlashCommand>, String> {
    let trimmed = input.trim();
    let Some(body) = trimmed.strip_prefix('/') else {
        return Ok(None);
    };
    let (command, rest) = match body.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (body, ""),
    };
    if command.is_empty() {
        return Ok(None);
    }
    match command.to_lowercase().as_str() {
        "save" => Ok(Some(SlashCommand::Save(
            (!rest.is_empty()).then(|| rest.to_string()),
        ))),
        "reset" | "new" => Ok(Some(SlashCommand::Reset)),
        "history" => Ok(Some(SlashCommand::History)),
        "load" => {
            let mut parts = rest.split_whitespace();
            let (Some(id), None) = (parts.next(), parts.next()) else {
                return Err("usage: /load <id>".to_string());
            };
            Ok(Some(SlashCommand::Load(ConversationId::from(id))))
        }
        _ => Ok(None),
    }
}

/// Send the composer text; the composer is only cleared when the store accepts it.
fn send_message(shell: &Shell, app: &mut App) {
    match shell.client.send_message(app.input.clone()) {
        Ok(true) => {
            app.input.clear();
            app.enable_auto_scroll();
        }
        Ok(false) => {}
        Err(err) => {
            warn!("send failed (error={err})");
            app.notify(format!("Send failed: {err}"), NoticeKind::Error);
        }
    }
}

fn save_conversation(shell: &Shell, app: &mut App, title: &str) {
    let id = shell.client.save_conversation(title);
    app.notify(format!("Saved \"{title}\" as {id}"), NoticeKind::Info);
}

fn reset_session(shell: &Shell, app: &mut App) {
    shell.client.reset();
    app.notify("New scene", NoticeKind::Info);
}

fn load_conversation(shell: &Shell, app: &mut App, id: &ConversationId) {
    match shell.client.load_conversation(id) {
        Ok(()) => info!("conversation loaded (conversation_id={id})"),
        Err(err) => app.notify(err.to_string(), NoticeKind::Error),
    }
}

/// Copy the highlighted assistant message. Never touches session state.
fn copy_selected_message(shell: &Shell, app: &mut App) {
    let Some(text) = app.selected_message().map(|m| m.text.clone()) else {
        return;
    };
    match shell.clipboard.write_text(&text) {
        Ok(()) => app.notify("Copied to clipboard", NoticeKind::Info),
        Err(err) => {
            warn!("clipboard write failed (error={err})");
            app.notify(format!("Copy failed: {err}"), NoticeKind::Error);
        }
    }
}

/// Spawn a task that forwards store events into the app channel.
fn spawn_session_stream(
    receiver: broadcast::Receiver<EventMsg>,
    sender: mpsc::Sender<AppEvent>,
) {
    tokio::spawn(async move {
        if let Err(err) = SessionClient::stream_events(receiver, sender).await {
            warn!("session stream failed (error={err})");
        }
    });
}

/// Spawn a task to poll for input events.
fn spawn_input_handler(sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        const MOUSE_SCROLL_LINES: i16 = 3;
        loop {
            if matches!(crossterm::event::poll(Duration::from_millis(30)), Ok(true)) {
                while matches!(crossterm::event::poll(Duration::from_millis(0)), Ok(true)) {
                    let event = match crossterm::event::read() {
                        Ok(event) => event,
                        Err(_) => break,
                    };
                    match event {
                        CrosstermEvent::Key(key) => {
                            let _ = sender.send(AppEvent::Input(key)).await;
                        }
                        CrosstermEvent::Mouse(mouse) => {
                            let lines = if mouse.modifiers.contains(KeyModifiers::SHIFT) {
                                MOUSE_SCROLL_LINES.saturating_mul(2)
                            } else {
                                MOUSE_SCROLL_LINES
                            };
                            match mouse.kind {
                                MouseEventKind::ScrollUp => {
                                    let _ = sender.send(AppEvent::Scroll(-lines)).await;
                                }
                                MouseEventKind::ScrollDown => {
                                    let _ = sender.send(AppEvent::Scroll(lines)).await;
                                }
                                _ => {}
                            }
                        }
                        _ => {}
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    });
}

/// Spawn a periodic tick event generator.
fn spawn_tick(sender: mpsc::Sender<AppEvent>, rate: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(rate);
        loop {
            interval.tick().await;
            if sender.send(AppEvent::Tick).await.is_err() {
                break;
            }
        }
    });
}

fn resolve_user_name() -> String {
    std::env::var(ENV_USER)
        .or_else(|_| std::env::var(ENV_USERNAME))
        .unwrap_or_else(|_| "user".to_string())
}

/// Configure terminal in raw mode with alternate screen.
fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    debug!("setting up terminal");
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal state on exit.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    debug!("restoring terminal");
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use batgpt_core::{MOCK_RESPONSE, Session, WELCOME_TEXT};
    use batgpt_protocol::Sender;
    use clipboard::ClipboardError;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingClipboard(Arc<Mutex<Vec<String>>>);

    impl Clipboard for RecordingClipboard {
        fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            self.0.lock().expect("lock").push(text.to_string());
            Ok(())
        }
    }

    struct FailingClipboard;

    impl Clipboard for FailingClipboard {
        fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::System("no display".to_string()))
        }
    }

    fn shell_with(clipboard: Box<dyn Clipboard>) -> (Shell, App) {
        let store = SessionStore::new(Session::bootstrap());
        let client = SessionClient::new(store, EventBus::new(16));
        let config = TuiConfig {
            user_name: Some("actor".to_string()),
            ..TuiConfig::default()
        };
        let shell = Shell::new(client, clipboard, &config);
        let app = shell.mount(&config);
        (shell, app)
    }

    fn press(shell: &Shell, app: &mut App, code: KeyCode) -> bool {
        press_with(shell, app, code, KeyModifiers::NONE)
    }

    fn press_with(shell: &Shell, app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
        handle_app_event(
            AppEvent::Input(KeyEvent::new(code, modifiers)),
            shell,
            app,
        )
        .expect("handle input")
    }

    fn type_text(shell: &Shell, app: &mut App, text: &str) {
        for ch in text.chars() {
            press(shell, app, KeyCode::Char(ch));
        }
    }

    fn resync(shell: &Shell, app: &mut App) {
        handle_app_event(AppEvent::Resync, shell, app).expect("resync");
    }

    #[tokio::test(start_paused = true)]
    async fn enter_sends_and_clears_composer() {
        let (shell, mut app) = shell_with(Box::new(RecordingClipboard::default()));
        let mut events = shell.client.subscribe_events();
        type_text(&shell, &mut app, "Make an encryption function");
        press(&shell, &mut app, KeyCode::Enter);

        assert_eq!(app.input, "");
        let transcript = shell.client.snapshot().transcript;
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].text, "Make an encryption function");

        // user message, then the deferred reply
        events.recv().await.expect("user event");
        events.recv().await.expect("reply event");
        resync(&shell, &mut app);
        let last = app.session.transcript.last().expect("reply");
        assert_eq!(last.from, Sender::Assistant);
        assert_eq!(last.text, MOCK_RESPONSE);
    }

    #[tokio::test]
    async fn blank_enter_keeps_composer_and_state() {
        let (shell, mut app) = shell_with(Box::new(RecordingClipboard::default()));
        type_text(&shell, &mut app, "   ");
        press(&shell, &mut app, KeyCode::Enter);
        assert_eq!(app.input, "   ");
        assert_eq!(shell.client.snapshot().transcript.len(), 1);
    }

    #[test]
    fn send_without_runtime_keeps_composer_and_reports() {
        let (shell, mut app) = shell_with(Box::new(RecordingClipboard::default()));
        type_text(&shell, &mut app, "hi");
        press(&shell, &mut app, KeyCode::Enter);
        assert_eq!(app.input, "hi");
        assert_eq!(shell.client.snapshot().transcript.len(), 1);
        let notice = app.notice.as_ref().expect("notice");
        assert_eq!(notice.kind, NoticeKind::Error);
    }

    #[test]
    fn shift_enter_inserts_newline() {
        let (shell, mut app) = shell_with(Box::new(RecordingClipboard::default()));
        type_text(&shell, &mut app, "line one");
        press_with(&shell, &mut app, KeyCode::Enter, KeyModifiers::SHIFT);
        type_text(&shell, &mut app, "line two");
        assert_eq!(app.input, "line one\nline two");
        assert_eq!(shell.client.snapshot().transcript.len(), 1);
    }

    #[test]
    fn use_inserts_message_text_into_composer() {
        let (shell, mut app) = shell_with(Box::new(RecordingClipboard::default()));
        press(&shell, &mut app, KeyCode::Tab);
        press(&shell, &mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Transcript);
        press(&shell, &mut app, KeyCode::Char('u'));
        assert_eq!(app.input, WELCOME_TEXT);
        assert_eq!(app.focus, Focus::Composer);
    }

    #[test]
    fn copy_writes_selected_message() {
        let clipboard = RecordingClipboard::default();
        let written = clipboard.0.clone();
        let (shell, mut app) = shell_with(Box::new(clipboard));
        app.set_focus(Focus::Transcript);
        press(&shell, &mut app, KeyCode::Char('c'));

        assert_eq!(*written.lock().expect("lock"), vec![WELCOME_TEXT.to_string()]);
        let notice = app.notice.as_ref().expect("notice");
        assert_eq!(notice.text, "Copied to clipboard");
        assert_eq!(notice.kind, NoticeKind::Info);
    }

    #[test]
    fn copy_failure_shows_notice_and_keeps_state() {
        let (shell, mut app) = shell_with(Box::new(FailingClipboard));
        let before = shell.client.snapshot();
        app.set_focus(Focus::Transcript);
        press(&shell, &mut app, KeyCode::Char('c'));

        let notice = app.notice.as_ref().expect("notice");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "Copy failed: system clipboard failed: no display");
        assert_eq!(shell.client.snapshot(), before);
    }

    #[test]
    fn history_enter_loads_selected_record() {
        let (shell, mut app) = shell_with(Box::new(RecordingClipboard::default()));
        press(&shell, &mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::History);
        press(&shell, &mut app, KeyCode::Down);
        press(&shell, &mut app, KeyCode::Enter);

        let session = shell.client.snapshot();
        assert_eq!(
            session.active_conversation_id,
            Some(ConversationId::from("conv-2"))
        );
        assert_eq!(session.transcript[0].text, "How to break into the server?");
    }

    #[test]
    fn ctrl_s_saves_with_default_title() {
        let (shell, mut app) = shell_with(Box::new(RecordingClipboard::default()));
        press_with(&shell, &mut app, KeyCode::Char('s'), KeyModifiers::CONTROL);
        let session = shell.client.snapshot();
        assert_eq!(session.history.len(), 3);
        assert_eq!(session.history[0].title, "Saved Scene");
        assert_eq!(session.active_conversation_id, Some(session.history[0].id.clone()));
    }

    #[test]
    fn slash_commands_drive_the_store() {
        let (shell, mut app) = shell_with(Box::new(RecordingClipboard::default()));
        type_text(&shell, &mut app, "/load conv-1");
        assert!(app.show_slash_commands);
        press(&shell, &mut app, KeyCode::Enter);
        assert_eq!(app.input, "");
        assert!(!app.show_slash_commands);
        assert_eq!(shell.client.snapshot().transcript.len(), 2);

        type_text(&shell, &mut app, "/save Rooftop take 2");
        press(&shell, &mut app, KeyCode::Enter);
        assert_eq!(shell.client.snapshot().history[0].title, "Rooftop take 2");

        type_text(&shell, &mut app, "/reset");
        press(&shell, &mut app, KeyCode::Enter);
        let session = shell.client.snapshot();
        assert_eq!(session.transcript.len(), 1);
        assert_eq!(session.active_conversation_id, None);

        type_text(&shell, &mut app, "/history");
        press(&shell, &mut app, KeyCode::Enter);
        assert_eq!(app.focus, Focus::History);
    }

    #[tokio::test(start_paused = true)]
    async fn slash_prefixed_prompt_is_sent() {
        let (shell, mut app) = shell_with(Box::new(RecordingClipboard::default()));
        type_text(&shell, &mut app, "/etc/shadow decrypt it");
        assert!(app.show_slash_commands);
        press(&shell, &mut app, KeyCode::Enter);

        assert_eq!(app.input, "");
        assert!(!app.show_slash_commands);
        assert!(app.notice.is_none());
        let transcript = shell.client.snapshot().transcript;
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].from, Sender::User);
        assert_eq!(transcript[1].text, "/etc/shadow decrypt it");
    }

    #[test]
    fn malformed_command_keeps_composer() {
        let (shell, mut app) = shell_with(Box::new(RecordingClipboard::default()));
        let before = shell.client.snapshot();
        type_text(&shell, &mut app, "/load");
        press(&shell, &mut app, KeyCode::Enter);

        assert_eq!(app.input, "/load");
        let notice = app.notice.as_ref().expect("notice");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "usage: /load <id>");
        assert_eq!(shell.client.snapshot(), before);
    }

    #[test]
    fn unknown_conversation_is_reported() {
        let (shell, mut app) = shell_with(Box::new(RecordingClipboard::default()));
        let before = shell.client.snapshot();
        type_text(&shell, &mut app, "/load conv-404");
        press(&shell, &mut app, KeyCode::Enter);
        let notice = app.notice.as_ref().expect("notice");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.text.contains("conv-404"));
        assert_eq!(shell.client.snapshot(), before);
    }

    #[test]
    fn esc_closes_palette_then_returns_focus() {
        let (shell, mut app) = shell_with(Box::new(RecordingClipboard::default()));
        type_text(&shell, &mut app, "/sa");
        press(&shell, &mut app, KeyCode::Esc);
        assert!(!app.show_slash_commands);
        assert_eq!(app.input, "");

        press(&shell, &mut app, KeyCode::Tab);
        press(&shell, &mut app, KeyCode::Esc);
        assert_eq!(app.focus, Focus::Composer);
    }

    #[test]
    fn ctrl_c_quits() {
        let (shell, mut app) = shell_with(Box::new(RecordingClipboard::default()));
        assert!(press_with(
            &shell,
            &mut app,
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        ));
    }

    #[test]
    fn config_flag_overrides_cwd_layers() {
        let temp = tempfile::TempDir::new().expect("tmp");
        let cwd = temp.path();
        std::fs::write(
            cwd.join("batgpt.json5"),
            "{ reply: { delay_ms: 300 }, ui: { notice_ms: 10 } }",
        )
        .expect("write");
        let flag = cwd.join("rehearsal.json5");
        std::fs::write(&flag, "{ reply: { delay_ms: 5 } }").expect("write");

        let options = || LayeredConfigOptions::new(cwd).with_user_path(None);
        let config = load_config(options(), Some(&flag)).expect("config");
        assert_eq!(config.reply.delay_ms, 5);
        assert_eq!(config.ui.notice_ms, 10);

        let config = load_config(options(), None).expect("config");
        assert_eq!(config.reply.delay_ms, 300);

        let missing = cwd.join("absent.json5");
        assert!(load_config(options(), Some(&missing)).is_err());
    }

    #[test]
    fn parses_slash_commands() {
        assert_eq!(parse_slash_command("/save"), Ok(Some(SlashCommand::Save(None))));
        assert_eq!(
            parse_slash_command("  /save  Final cut "),
            Ok(Some(SlashCommand::Save(Some("Final cut".to_string()))))
        );
        assert_eq!(
            parse_slash_command("/LOAD conv-2"),
            Ok(Some(SlashCommand::Load(ConversationId::from("conv-2"))))
        );
        assert_eq!(parse_slash_command("/reset"), Ok(Some(SlashCommand::Reset)));
        assert_eq!(parse_slash_command("/history"), Ok(Some(SlashCommand::History)));
        assert_eq!(parse_slash_command("/"), Ok(None));
        assert_eq!(parse_slash_command("hello"), Ok(None));
        assert!(parse_slash_command("/load").is_err());
        assert!(parse_slash_command("/load a b").is_err());
        assert_eq!(parse_slash_command("/dance"), Ok(None));
        assert_eq!(parse_slash_command("/etc/shadow decrypt it"), Ok(None));
    }
}
