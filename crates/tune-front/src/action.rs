//! Action enum — everything that flows into the search core, and what
//! flows back out.

use tune_proto::model::{ArtistSummary, RecordingSummary, SearchResponse, Track};

use crate::bridge::NavigationIntent;
use crate::catalog::CatalogError;
use crate::focus::SearchInput;
use crate::panel::Viewport;
use crate::search::FetchToken;

/// All inputs into the `SearchCore` loop.
/// Front-ends produce Actions; the core applies them in arrival order.
#[derive(Debug)]
pub enum Action {
    // ── Search input ─────────────────────────────────────────────────────────
    /// The search field now contains `text` (one per keystroke).
    QueryChanged { text: String, viewport: Viewport },
    /// The narrow-layout search trigger was pressed.
    OpenSearch,
    /// Explicit close of the search overlay.
    CloseSearch,
    /// Pointer pressed; `inside` is true when the target is in the search region.
    PointerDown { inside: bool, viewport: Viewport },
    /// Escape pressed.
    Escape,
    /// The search input lost focus.
    Blur,
    /// A search input regained focus without a keystroke.
    FocusInput(SearchInput),

    // ── Selection / preview ──────────────────────────────────────────────────
    /// Activate the n-th visible result row.
    SelectRow(usize),
    SelectArtist(ArtistSummary),
    SelectRecording(RecordingSummary),
    /// Preview a track chosen outside the search (catalog rows).
    PreviewTrack(Track),
    /// The preview surface closed; carries the generation it was opened with.
    ClosePreview(u64),

    // ── Favorites ────────────────────────────────────────────────────────────
    /// Toggle the track currently in the preview slot.
    ToggleFavorite,
    AddFavorite(Track),
    RemoveFavorite(String),

    // ── Internal ─────────────────────────────────────────────────────────────
    /// A catalog fetch finished (successfully or not).
    SearchSettled {
        token: FetchToken,
        outcome: Result<SearchResponse, CatalogError>,
    },
    Shutdown,
}

/// One-off notifications broadcast by the core.  Ongoing state is published
/// separately as a `Snapshot`.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreMessage {
    /// The router should move to another view.
    Navigate(NavigationIntent),
    /// Focus must move to this input now.
    FocusInput(SearchInput),
    /// A favorite was added (`favorite: true`) or removed.
    FavoritesChanged { id: String, favorite: bool },
    /// Persisting a favorites change failed.
    FavoritesError(String),
}
