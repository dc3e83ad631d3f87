//! Snapshot — read-only view of the search core handed to renderers.
//!
//! Renderers read this but never mutate it.  The `SearchCore` loop is the only
//! writer and replaces the whole snapshot after every action it applies.

use tune_proto::model::FavoriteEntry;

use crate::focus::SearchInput;
use crate::panel::{PanelRow, PanelState};
use crate::preview::PreviewHandle;

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    // ── Search region ───────────────────────────────────────────────────────
    pub query_text: String,
    pub panel: PanelState,
    pub focused_input: Option<SearchInput>,
    /// True when the panel should render `rows`.
    pub results_visible: bool,
    pub loading: bool,
    pub rows: Vec<PanelRow>,

    // ── Preview ─────────────────────────────────────────────────────────────
    pub preview: Option<PreviewHandle>,
    pub preview_is_favorite: bool,

    // ── Favorites ───────────────────────────────────────────────────────────
    pub favorites: Vec<FavoriteEntry>,
}

impl Snapshot {
    /// Rows as they should be drawn right now (empty while hidden).
    pub fn visible_rows(&self) -> &[PanelRow] {
        if self.results_visible {
            &self.rows
        } else {
            &[]
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|e| e.id() == id)
    }
}
