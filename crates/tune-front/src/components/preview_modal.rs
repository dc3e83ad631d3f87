//! PreviewModal — the track currently in the preview slot.
//!
//! Playback itself belongs to whatever player the user points at the URL;
//! the modal shows what would play and offers favorite / copy / close.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};
use tune_front::action::Action;

use crate::component::{Command, Component, UiContext};
use crate::theme::{style_accent, style_default, style_muted, style_secondary, C_PRIMARY, C_STARS};
use crate::widgets::pane_chrome::{pane_chrome, Badge};

pub struct PreviewModal;

impl PreviewModal {
    pub fn new() -> Self {
        Self
    }

    /// Where the modal goes inside `area`.
    pub fn area(area: Rect) -> Rect {
        centered_rect(60, 11, area)
    }
}

impl Default for PreviewModal {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for PreviewModal {
    fn handle_key(&mut self, key: KeyEvent, ctx: &UiContext<'_>) -> Vec<Command> {
        let Some(handle) = &ctx.snapshot.preview else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Char('f') => vec![Command::Core(Action::ToggleFavorite)],
            KeyCode::Char('y') => handle
                .track
                .full_version_link()
                .map(|link| vec![Command::Copy(link)])
                .unwrap_or_default(),
            KeyCode::Esc | KeyCode::Char('q') => {
                vec![Command::Core(Action::ClosePreview(handle.generation))]
            }
            _ => Vec::new(),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, ctx: &UiContext<'_>) {
        let Some(handle) = &ctx.snapshot.preview else {
            return;
        };
        let track = &handle.track;
        let popup = Self::area(area);

        let badge = ctx.snapshot.preview_is_favorite.then_some(Badge {
            text: "★",
            color: C_STARS,
        });
        let block = pane_chrome("preview", focused, badge);
        let inner = block.inner(popup);
        frame.render_widget(Clear, popup);
        frame.render_widget(block, popup);

        let album = track
            .album
            .as_ref()
            .map(|a| a.title.as_str())
            .unwrap_or("—");
        let lines = vec![
            Line::from(Span::styled(
                format!(" {}", track.title),
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format!(" {}", track.artist_name()), style_secondary())),
            Line::from(""),
            detail_row("album", album),
            detail_row("length", &format_duration(track.duration)),
            detail_row("released", track.release_date.as_deref().unwrap_or("—")),
            detail_row("source", track.playable_url().unwrap_or("no preview available")),
            Line::from(""),
            Line::from(vec![
                Span::styled(" f ", style_accent()),
                Span::styled(
                    if ctx.snapshot.preview_is_favorite { "unfavorite" } else { "favorite" },
                    style_muted(),
                ),
                Span::styled("   y ", style_accent()),
                Span::styled("copy full-version link", style_muted()),
                Span::styled("   esc ", style_accent()),
                Span::styled("close", style_muted()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

fn detail_row<'a>(label: &'a str, value: &str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!(" {:<10}", label), style_muted()),
        Span::styled(value.to_string(), style_default()),
    ])
}

/// `m:ss`, or a dash when the length is unknown (0).
fn format_duration(secs: u32) -> String {
    if secs == 0 {
        return "—".to_string();
    }
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}
