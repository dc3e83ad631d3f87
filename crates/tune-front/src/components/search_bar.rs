//! SearchBar — the search input.
//!
//! On wide terminals it is always on screen.  On narrow ones the header only
//! shows a trigger; the same input is drawn inside the overlay once the core
//! reports the mobile panel open.

use ratatui::crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tune_front::action::Action;
use tune_front::panel::PanelState;

use crate::component::{Command, Component, Pane, UiContext};
use crate::theme::{style_muted, C_ACCENT, C_INPUT_BG};
use crate::widgets::pane_chrome::pane_chrome;
use crate::widgets::query_input::{QueryEdit, QueryInput};

pub struct SearchBar {
    input: QueryInput,
    breakpoint: u16,
}

impl SearchBar {
    pub fn new(breakpoint: u16) -> Self {
        Self {
            input: QueryInput::new("artists, songs…"),
            breakpoint,
        }
    }

    /// The core emptied the query; mirror it in the input buffer.
    pub fn clear(&mut self) {
        self.input.clear();
    }

    /// Whether the header shows the trigger instead of the input.
    pub fn is_collapsed(&self, ctx: &UiContext<'_>) -> bool {
        ctx.viewport.is_narrow(self.breakpoint)
    }
}

impl Component for SearchBar {
    fn handle_key(&mut self, key: KeyEvent, ctx: &UiContext<'_>) -> Vec<Command> {
        match key.code {
            KeyCode::Down => return vec![Command::Focus(Pane::Results)],
            KeyCode::Tab => return vec![Command::Focus(Pane::Favorites)],
            _ => {}
        }

        match self.input.handle_key(key) {
            QueryEdit::Changed(text) => vec![Command::Core(Action::QueryChanged {
                text,
                viewport: ctx.viewport,
            })],
            QueryEdit::Submitted if ctx.snapshot.results_visible => {
                vec![Command::Focus(Pane::Results)]
            }
            QueryEdit::Cancelled => vec![Command::Core(Action::Escape)],
            QueryEdit::Submitted | QueryEdit::Unchanged => Vec::new(),
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, ctx: &UiContext<'_>) -> Vec<Command> {
        if self.is_collapsed(ctx) && ctx.snapshot.panel != PanelState::OpenMobile {
            return vec![Command::Core(Action::OpenSearch)];
        }
        // The overlay's close button sits at the right end of its top border.
        let close_x = area.x + area.width.saturating_sub(5);
        if ctx.snapshot.panel == PanelState::OpenMobile && event.row == area.y && event.column >= close_x {
            return vec![Command::Core(Action::CloseSearch)];
        }
        vec![Command::Focus(Pane::Search)]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, ctx: &UiContext<'_>) {
        let overlay = ctx.snapshot.panel == PanelState::OpenMobile;
        if self.is_collapsed(ctx) && !overlay {
            let trigger = Paragraph::new(Line::from(vec![
                Span::styled(" [/] ", Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)),
                Span::styled("search", style_muted()),
            ]))
            .style(Style::default().bg(C_INPUT_BG));
            frame.render_widget(trigger, area);
            return;
        }

        let mut block = pane_chrome("search", focused, None);
        if overlay {
            block = block.title_top(Line::from(Span::styled(" [x] ", style_muted())).right_aligned());
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.input.draw(frame, inner, focused);
    }
}
