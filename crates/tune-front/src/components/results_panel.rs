//! ResultsPanel — floating list under the search input.

use ratatui::crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Clear, List, ListItem, ListState},
    Frame,
};
use tune_front::action::Action;
use tune_front::panel::PanelRow;

use crate::component::{Command, Component, Pane, UiContext};
use crate::theme::{
    style_default, style_muted, style_secondary, style_selected, style_selected_focused, C_ARTIST,
    C_RECORDING,
};
use crate::widgets::pane_chrome::{pane_chrome, Badge};

pub struct ResultsPanel {
    selected: usize,
    list_state: ListState,
}

impl ResultsPanel {
    pub fn new() -> Self {
        Self {
            selected: 0,
            list_state: ListState::default(),
        }
    }

    /// Rows plus borders, capped by whatever room is left below the input.
    pub fn height_for(&self, ctx: &UiContext<'_>, available: u16) -> u16 {
        let rows = ctx.snapshot.visible_rows().len() as u16;
        if rows == 0 {
            return 0;
        }
        (rows + 2).min(available)
    }

    fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

impl Default for ResultsPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ResultsPanel {
    fn handle_key(&mut self, key: KeyEvent, ctx: &UiContext<'_>) -> Vec<Command> {
        let len = ctx.snapshot.visible_rows().len();
        self.clamp(len);
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < len {
                    self.selected += 1;
                }
                Vec::new()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.selected == 0 {
                    return vec![Command::Focus(Pane::Search)];
                }
                self.selected -= 1;
                Vec::new()
            }
            KeyCode::Enter if len > 0 => vec![Command::Core(Action::SelectRow(self.selected))],
            KeyCode::Esc => vec![Command::Core(Action::Escape)],
            KeyCode::Char('/') => vec![Command::Focus(Pane::Search)],
            _ => Vec::new(),
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, ctx: &UiContext<'_>) -> Vec<Command> {
        // One border row above the first result.
        let Some(offset) = event.row.checked_sub(area.y + 1) else {
            return Vec::new();
        };
        let index = offset as usize + self.list_state.offset();
        if index >= ctx.snapshot.visible_rows().len() {
            return Vec::new();
        }
        self.selected = index;
        vec![Command::Core(Action::SelectRow(index))]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, ctx: &UiContext<'_>) {
        let rows = ctx.snapshot.visible_rows();
        if rows.is_empty() || area.height == 0 {
            return;
        }
        self.clamp(rows.len());

        let selectable = rows.iter().filter(|r| r.is_selectable()).count();
        let count = selectable.to_string();
        let badge = (selectable > 0).then(|| Badge {
            text: &count,
            color: C_RECORDING,
        });
        let block = pane_chrome("results", focused, badge);
        let inner = block.inner(area);
        frame.render_widget(Clear, area);
        frame.render_widget(block, area);

        let items: Vec<ListItem> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let line = row_line(row);
                let item = ListItem::new(line);
                match (i == self.selected && row.is_selectable(), focused) {
                    (true, true) => item.style(style_selected_focused()),
                    (true, false) => item.style(style_selected()),
                    _ => item,
                }
            })
            .collect();

        self.list_state.select(Some(self.selected));
        frame.render_stateful_widget(List::new(items), inner, &mut self.list_state);
    }
}

fn row_line(row: &PanelRow) -> Line<'_> {
    match row {
        PanelRow::Loading => Line::from(Span::styled(" searching…", style_muted())),
        PanelRow::NoResults => Line::from(Span::styled(" no results", style_muted())),
        PanelRow::Artist(artist) => Line::from(vec![
            Span::styled(" ◆ ", ratatui::style::Style::default().fg(C_ARTIST)),
            Span::styled(artist.name.as_str(), style_default()),
        ]),
        PanelRow::Recording(recording) => Line::from(vec![
            Span::styled(" ♪ ", ratatui::style::Style::default().fg(C_RECORDING)),
            Span::styled(recording.title.as_str(), style_default()),
            Span::styled(format!("  {}", recording.artist_label()), style_secondary()),
        ]),
    }
}
