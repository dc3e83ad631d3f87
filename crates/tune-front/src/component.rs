//! Component trait — the interface every pane of the shell implements.
//!
//! - Components own their local UI state (cursor, input buffer) only.
//! - Everything else comes from the core's `Snapshot`, read-only.
//! - Components return `Vec<Command>`; the App forwards core actions to the
//!   `SearchCore` and carries out the shell-local ones itself.

use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};
use tune_front::action::Action;
use tune_front::panel::Viewport;
use tune_front::snapshot::Snapshot;

/// Focusable panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Search,
    Results,
    Favorites,
}

/// What a component asks the App to do.
#[derive(Debug)]
pub enum Command {
    /// Forward to the search core.
    Core(Action),
    /// Put text on the system clipboard.
    Copy(String),
    Focus(Pane),
    Quit,
}

/// Read-only context for one event or frame.
pub struct UiContext<'a> {
    pub snapshot: &'a Snapshot,
    pub viewport: Viewport,
}

pub trait Component {
    /// Handle a key event.  Only called while this component has focus.
    fn handle_key(&mut self, key: KeyEvent, ctx: &UiContext<'_>) -> Vec<Command>;

    /// Handle a mouse press inside `area`.
    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _ctx: &UiContext<'_>) -> Vec<Command> {
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, ctx: &UiContext<'_>);
}

/// True when (`col`, `row`) lies inside `r`.
pub fn hit(r: Rect, col: u16, row: u16) -> bool {
    r.width > 0
        && r.height > 0
        && col >= r.x
        && col < r.x + r.width
        && row >= r.y
        && row < r.y + r.height
}
