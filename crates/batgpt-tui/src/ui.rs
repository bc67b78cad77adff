//! Rendering routines for the BatGPT TUI.

use crate::app::{App, Focus, NoticeKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};

// ── Theme colors (dark mode) ──────────────────────────

const PRIMARY: Color = Color::Rgb(255, 215, 0); // #FFD700
const SECONDARY: Color = Color::Rgb(229, 192, 123); // #e5c07b
const TEXT: Color = Color::Rgb(238, 238, 238); // #eeeeee
const TEXT_MUTED: Color = Color::Rgb(128, 128, 128); // #808080
const BORDER: Color = Color::Rgb(60, 60, 60); // #3c3c3c
const BORDER_ACTIVE: Color = Color::Rgb(255, 215, 0);
const ERROR: Color = Color::Rgb(255, 110, 110);

const SLASH_PALETTE_HEIGHT: u16 = 10;
const HEADER_HEIGHT: u16 = 6; // 4 inner lines + 2 border lines
const SIDEBAR_WIDTH: u16 = 34;
const COMPOSER_MAX_LINES: u16 = 6;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HERO_ART: [&str; 2] = [
    " █▀▀▄ █▀▀█ ▀█▀ █▀▀▀ █▀▀█ ▀█▀",
    " █▄▄▀ █▄▄█  █  █▄▄█ █▀▀▀  █ ",
];

const PLACEHOLDER: &str = "Type a line for BatGPT. Enter to send, Shift+Enter for newline...";

/// Draw the entire TUI frame.
pub fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    let composer_height = composer_lines(app).min(COMPOSER_MAX_LINES) + 2;

    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),   // header bar
            Constraint::Min(0),                  // sidebar + chat
            Constraint::Length(composer_height), // composer
            Constraint::Length(1),               // status bar
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(root[1]);

    draw_header(frame, app, root[0]);
    draw_sidebar(frame, app, body[0]);
    draw_chat(frame, app, body[1]);
    if app.show_slash_commands {
        draw_slash_palette(frame, body[1]);
    }
    draw_input(frame, app, root[2]);
    draw_status_bar(frame, app, root[3]);
}

fn composer_lines(app: &App) -> u16 {
    let count = app.input.split('\n').count();
    u16::try_from(count).unwrap_or(u16::MAX).max(1)
}

/// Draw the brand header.
fn draw_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(28)])
        .split(inner);

    let art_style = Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line<'_>> = HERO_ART
        .iter()
        .map(|art_line| Line::from(Span::styled(*art_line, art_style)))
        .collect();
    lines.push(Line::from(vec![
        Span::styled(" BatGPT", Style::default().fg(TEXT).add_modifier(Modifier::BOLD)),
        Span::styled("  Mock AI for film", Style::default().fg(TEXT_MUTED)),
        Span::styled(format!("  v{VERSION}"), Style::default().fg(BORDER)),
    ]));
    frame.render_widget(Paragraph::new(lines), cols[0]);

    let right = vec![
        Line::from(Span::styled(
            "Scene Chat",
            Style::default().fg(SECONDARY).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("actor ", Style::default().fg(TEXT_MUTED)),
            Span::styled(app.user_name.clone(), Style::default().fg(TEXT)),
        ]),
    ];
    frame.render_widget(Paragraph::new(right), cols[1]);
}

/// Draw the saved conversation list.
fn draw_sidebar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let focused = app.focus == Focus::History;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused { BORDER_ACTIVE } else { BORDER }))
        .title(Span::styled(
            " Conversations ",
            Style::default().fg(if focused { PRIMARY } else { TEXT_MUTED }),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let mut lines = Vec::new();
    if app.session.history.is_empty() {
        lines.push(Line::from(Span::styled(
            " No saved scenes. Ctrl+S to save.",
            Style::default().fg(TEXT_MUTED),
        )));
    }
    for (idx, record) in app.session.history.iter().enumerate() {
        let selected = focused && idx == app.selected_history;
        let active = app.is_active(&record.id);
        let marker = if selected {
            "▶ "
        } else if active {
            "● "
        } else {
            "  "
        };
        let title_style = if active || selected {
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT)
        };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(PRIMARY)),
            Span::styled(record.title.clone(), title_style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("  {}", record.snippet),
            Style::default().fg(TEXT_MUTED),
        )));
        lines.push(Line::from(""));
    }

    let list = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(list, parts[0]);

    let footer = Paragraph::new(Line::from(Span::styled(
        " Actor mode • No real AI",
        Style::default().fg(TEXT_MUTED).add_modifier(Modifier::ITALIC),
    )));
    frame.render_widget(footer, parts[1]);
}

/// Draw the chat transcript with border and scrollbar.
fn draw_chat(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let lines = app.render_lines();
    let focused = app.focus == Focus::Transcript;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused { BORDER_ACTIVE } else { BORDER }))
        .title(Span::styled(
            " Chat ",
            Style::default().fg(if focused { PRIMARY } else { TEXT_MUTED }),
        ));

    let inner = block.inner(area);
    let content_width = inner.width.saturating_sub(1); // -1 for scrollbar
    let content_height = inner.height as usize;

    // Use ratatui's own line_count to get the exact wrapped line total.
    let total_lines = Paragraph::new(lines.clone())
        .wrap(Wrap { trim: false })
        .line_count(content_width)
        .max(1);

    let max_scroll = u16::try_from(total_lines.saturating_sub(content_height)).unwrap_or(u16::MAX);
    app.update_scroll_bounds(max_scroll);
    let scroll = app.scroll;

    let chat_inner = Rect {
        width: inner.width.saturating_sub(1),
        ..inner
    };

    let chat = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(block, area);
    frame.render_widget(chat, chat_inner);

    if total_lines > content_height {
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(total_lines)
            .position(scroll as usize)
            .viewport_content_length(content_height);
        let scrollbar_area = Rect {
            x: inner.x + inner.width.saturating_sub(1),
            y: inner.y,
            width: 1,
            height: inner.height,
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .style(Style::default().fg(BORDER))
                .thumb_style(Style::default().fg(TEXT_MUTED)),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }
}

/// Draw the multi-line composer and place the cursor when it has focus.
fn draw_input(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let is_active = app.focus == Focus::Composer;
    let border_color = if is_active { BORDER_ACTIVE } else { BORDER };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            " Input ",
            Style::default().fg(if is_active { SECONDARY } else { TEXT_MUTED }),
        ));

    let inner = block.inner(area);

    let prompt_style = Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD);
    let lines: Vec<Line<'_>> = if app.input.is_empty() {
        vec![Line::from(vec![
            Span::styled(" ", prompt_style),
            Span::styled(PLACEHOLDER, Style::default().fg(TEXT_MUTED)),
        ])]
    } else {
        app.input
            .split('\n')
            .map(|line| {
                Line::from(vec![
                    Span::styled(" ", prompt_style),
                    Span::styled(line, Style::default().fg(TEXT)),
                ])
            })
            .collect()
    };

    // Keep the last lines visible once the composer is at its maximum height.
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let offset = total.saturating_sub(inner.height);
    let paragraph = Paragraph::new(lines).scroll((offset, 0));
    frame.render_widget(block, area);
    frame.render_widget(paragraph, inner);

    if is_active {
        let last_line = app.input.rsplit('\n').next().unwrap_or_default();
        let column = u16::try_from(last_line.chars().count()).unwrap_or(u16::MAX);
        let row = total.saturating_sub(1).saturating_sub(offset);
        frame.set_cursor_position((
            inner.x.saturating_add(1).saturating_add(column),
            inner.y + row.min(inner.height.saturating_sub(1)),
        ));
    }
}

/// Draw the status bar at the bottom.
fn draw_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let key = Style::default().fg(TEXT_MUTED);
    let desc = Style::default().fg(BORDER);
    let shortcuts = match app.focus {
        Focus::Composer => vec![
            Span::styled(" Enter", key),
            Span::styled(" send", desc),
            Span::styled("  Ctrl+S", key),
            Span::styled(" save", desc),
            Span::styled("  Ctrl+R", key),
            Span::styled(" reset", desc),
            Span::styled("  Tab", key),
            Span::styled(" focus", desc),
            Span::styled("  /", key),
            Span::styled(" commands", desc),
            Span::styled("  Ctrl+C", key),
            Span::styled(" quit", desc),
        ],
        Focus::History => vec![
            Span::styled(" Up/Down", key),
            Span::styled(" select", desc),
            Span::styled("  Enter", key),
            Span::styled(" load", desc),
            Span::styled("  Esc", key),
            Span::styled(" back", desc),
        ],
        Focus::Transcript => vec![
            Span::styled(" Up/Down", key),
            Span::styled(" select", desc),
            Span::styled("  c", key),
            Span::styled(" copy", desc),
            Span::styled("  u", key),
            Span::styled(" use", desc),
            Span::styled("  PgUp/PgDn", key),
            Span::styled(" scroll", desc),
            Span::styled("  Esc", key),
            Span::styled(" back", desc),
        ],
    };

    let (right_text, right_color) = match &app.notice {
        Some(notice) => (
            format!(" {} ", notice.text),
            match notice.kind {
                NoticeKind::Info => PRIMARY,
                NoticeKind::Error => ERROR,
            },
        ),
        None => (String::new(), TEXT_MUTED),
    };

    let right_len = u16::try_from(right_text.chars().count()).unwrap_or(u16::MAX);
    let left_area = Rect {
        width: area.width.saturating_sub(right_len),
        ..area
    };
    let right_area = Rect {
        x: area.x + area.width.saturating_sub(right_len),
        width: right_len.min(area.width),
        ..area
    };

    let left = Paragraph::new(Line::from(shortcuts));
    let right = Paragraph::new(Line::from(Span::styled(
        right_text,
        Style::default().fg(right_color),
    )));

    frame.render_widget(left, left_area);
    frame.render_widget(right, right_area);
}

fn draw_slash_palette(frame: &mut Frame<'_>, area: Rect) {
    let cmd_style = Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(TEXT_MUTED);
    let hint_style = Style::default()
        .fg(TEXT_MUTED)
        .add_modifier(Modifier::ITALIC);

    let lines = vec![
        Line::from(vec![]),
        Line::from(vec![
            Span::styled("  /save [title]", cmd_style),
            Span::styled("  ", desc_style),
            Span::styled("Save the scene to history", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  /reset", cmd_style),
            Span::styled("         ", desc_style),
            Span::styled("Start a fresh scene", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  /load <id>", cmd_style),
            Span::styled("     ", desc_style),
            Span::styled("Load a saved scene", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  /history", cmd_style),
            Span::styled("       ", desc_style),
            Span::styled("Browse saved scenes", desc_style),
        ]),
        Line::from(vec![]),
        Line::from(Span::styled("  Esc to close", hint_style)),
    ];

    let height = SLASH_PALETTE_HEIGHT
        .min(area.height)
        .min(lines.len() as u16 + 2); // +2 for border

    let palette_area = Rect {
        x: area.x + 1,
        y: area.y + area.height.saturating_sub(height),
        width: area.width.saturating_sub(2).min(50),
        height,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(PRIMARY))
        .title(Span::styled(
            " Commands ",
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(Color::Rgb(20, 20, 20)));

    let palette = Paragraph::new(lines).block(block);
    frame.render_widget(palette, palette_area);
}
