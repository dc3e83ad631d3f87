//! QueryInput — tui-input wrapper used for the search field.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_INPUT_BG, C_INPUT_FG, C_MUTED};

#[derive(Debug, PartialEq)]
pub enum QueryEdit {
    /// The text changed; carries the full new value.
    Changed(String),
    Submitted,
    Cancelled,
    /// Cursor movement or a key the input ignored.
    Unchanged,
}

pub struct QueryInput {
    input: Input,
    placeholder: String,
}

impl QueryInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            placeholder: placeholder.into(),
        }
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> QueryEdit {
        match key.code {
            KeyCode::Esc => QueryEdit::Cancelled,
            KeyCode::Enter => QueryEdit::Submitted,
            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(&Event::Key(key));
                if self.input.value() == before {
                    QueryEdit::Unchanged
                } else {
                    QueryEdit::Changed(self.input.value().to_string())
                }
            }
        }
    }

    /// Render into `area` (one row).  The cursor is only placed when `active`.
    pub fn draw(&self, frame: &mut Frame, area: Rect, active: bool) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let scroll = self
            .input
            .visual_scroll(area.width.saturating_sub(4) as usize);
        let value = self.input.value();
        let display = if value.is_empty() {
            Span::styled(format!("/ {}", self.placeholder), Style::default().fg(C_MUTED))
        } else {
            Span::styled(
                format!("/ {}", value.get(scroll..).unwrap_or_default()),
                Style::default().fg(C_INPUT_FG),
            )
        };

        let paragraph =
            Paragraph::new(Line::from(vec![display])).style(Style::default().bg(C_INPUT_BG));
        frame.render_widget(paragraph, area);

        if active {
            let cursor_x = area.x + 2 + self.input.visual_cursor().saturating_sub(scroll) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}
