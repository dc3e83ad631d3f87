//! FavoritesList — the saved tracks, newest last.

use ratatui::crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use tune_front::action::Action;

use crate::component::{Command, Component, Pane, UiContext};
use crate::theme::{
    style_default, style_muted, style_secondary, style_selected, style_selected_focused, C_STARS,
};
use crate::widgets::pane_chrome::{pane_chrome, Badge};

pub struct FavoritesList {
    selected: usize,
    list_state: ListState,
}

impl FavoritesList {
    pub fn new() -> Self {
        Self {
            selected: 0,
            list_state: ListState::default(),
        }
    }
}

impl Default for FavoritesList {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for FavoritesList {
    fn handle_key(&mut self, key: KeyEvent, ctx: &UiContext<'_>) -> Vec<Command> {
        let favorites = &ctx.snapshot.favorites;
        self.selected = self.selected.min(favorites.len().saturating_sub(1));
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < favorites.len() {
                    self.selected += 1;
                }
                Vec::new()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                Vec::new()
            }
            KeyCode::Enter => favorites
                .get(self.selected)
                .map(|e| vec![Command::Core(Action::PreviewTrack(e.track().clone()))])
                .unwrap_or_default(),
            KeyCode::Char('d') | KeyCode::Delete => favorites
                .get(self.selected)
                .map(|e| vec![Command::Core(Action::RemoveFavorite(e.id().to_string()))])
                .unwrap_or_default(),
            KeyCode::Char('/') | KeyCode::Tab => vec![Command::Focus(Pane::Search)],
            KeyCode::Char('q') => vec![Command::Quit],
            _ => Vec::new(),
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, ctx: &UiContext<'_>) -> Vec<Command> {
        let Some(offset) = event.row.checked_sub(area.y + 1) else {
            return vec![Command::Focus(Pane::Favorites)];
        };
        let index = offset as usize + self.list_state.offset();
        match ctx.snapshot.favorites.get(index) {
            Some(entry) => {
                self.selected = index;
                vec![
                    Command::Focus(Pane::Favorites),
                    Command::Core(Action::PreviewTrack(entry.track().clone())),
                ]
            }
            None => vec![Command::Focus(Pane::Favorites)],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, ctx: &UiContext<'_>) {
        let favorites = &ctx.snapshot.favorites;
        let count = favorites.len().to_string();
        let block = pane_chrome(
            "favorites",
            focused,
            Some(Badge {
                text: &count,
                color: C_STARS,
            }),
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if favorites.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(" nothing saved yet, preview a track and press f", style_muted())),
                inner,
            );
            return;
        }
        self.selected = self.selected.min(favorites.len() - 1);

        let items: Vec<ListItem> = favorites
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let track = entry.track();
                let item = ListItem::new(Line::from(vec![
                    Span::styled(format!(" {}", track.title), style_default()),
                    Span::styled(format!("  {}", track.artist_name()), style_secondary()),
                    Span::styled(
                        format!("  {}", entry.added_at().format("%Y-%m-%d")),
                        style_muted(),
                    ),
                ]));
                match (i == self.selected, focused) {
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
