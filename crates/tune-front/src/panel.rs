//! Result interaction controller — visibility of the floating results panel.
//!
//! ```text
//!  Closed ──type (wide)──▶ OpenDesktop ──outside click / empty query──▶ Closed
//!  Closed ──open_mobile──▶ OpenMobile  ──outside click (narrow) / Esc / close──▶ Closed
//! ```
//!
//! Which variant applies is decided from the viewport width at the time of
//! each event, since the viewport can be resized while the panel is open.

use tune_proto::model::{ArtistSummary, RecordingSummary};

use crate::focus::{FocusTracker, SearchInput};
use crate::search::SearchView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Closed,
    /// Results under the persistent input.
    OpenDesktop,
    /// Full input + results overlay.
    OpenMobile,
}

impl PanelState {
    pub fn is_open(self) -> bool {
        self != Self::Closed
    }
}

/// Width of the rendering surface when an event happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
}

impl Viewport {
    pub fn new(width: u16) -> Self {
        Self { width }
    }

    pub fn is_narrow(self, breakpoint: u16) -> bool {
        self.width < breakpoint
    }
}

/// Side effects the owner of the panel has to carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEffect {
    /// Move keyboard focus to this input now.
    FocusInput(SearchInput),
    /// The query text was emptied; pending and in-flight searches must go.
    QueryCleared,
}

/// One rendered line of the results panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelRow {
    Loading,
    NoResults,
    Artist(ArtistSummary),
    Recording(RecordingSummary),
}

impl PanelRow {
    pub fn is_selectable(&self) -> bool {
        matches!(self, Self::Artist(_) | Self::Recording(_))
    }
}

/// Rows for `view`: a loading line, a "no results" line, or artists followed
/// by recordings.
pub fn rows(view: SearchView<'_>) -> Vec<PanelRow> {
    match view {
        SearchView::Idle => Vec::new(),
        SearchView::Loading { .. } => vec![PanelRow::Loading],
        SearchView::Ready(results) if results.is_empty() => vec![PanelRow::NoResults],
        SearchView::Ready(results) => results
            .artists
            .iter()
            .cloned()
            .map(PanelRow::Artist)
            .chain(results.recordings.iter().cloned().map(PanelRow::Recording))
            .collect(),
    }
}

#[derive(Debug)]
pub struct SearchPanel {
    state: PanelState,
    text: String,
    breakpoint: u16,
    focus: FocusTracker,
}

impl SearchPanel {
    pub fn new(breakpoint: u16) -> Self {
        Self {
            state: PanelState::Closed,
            text: String::new(),
            breakpoint,
            focus: FocusTracker::new(),
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn breakpoint(&self) -> u16 {
        self.breakpoint
    }

    pub fn focused_input(&self) -> Option<SearchInput> {
        self.focus.current()
    }

    /// Rows are only shown while the panel is open and there is a query.
    pub fn results_visible(&self) -> bool {
        self.state.is_open() && !self.text.trim().is_empty()
    }

    /// The input text changed.
    pub fn type_text(&mut self, text: &str, viewport: Viewport) {
        self.text = text.to_string();
        match self.state {
            PanelState::OpenMobile => {}
            _ if viewport.is_narrow(self.breakpoint) => {
                // The only input on a narrow layout lives in the overlay.
                self.state = PanelState::OpenMobile;
                self.focus.focus(SearchInput::Mobile);
            }
            _ => {
                self.state = if self.text.trim().is_empty() {
                    PanelState::Closed
                } else {
                    PanelState::OpenDesktop
                };
                self.focus.focus(SearchInput::Desktop);
            }
        }
    }

    /// The search trigger was pressed: open the overlay and focus its input.
    pub fn open_mobile(&mut self) -> PanelEffect {
        self.state = PanelState::OpenMobile;
        self.focus.focus(SearchInput::Mobile);
        PanelEffect::FocusInput(SearchInput::Mobile)
    }

    /// Explicit close of the overlay.  Returns whether anything changed.
    pub fn close(&mut self) -> bool {
        if self.state != PanelState::OpenMobile {
            return false;
        }
        self.state = PanelState::Closed;
        self.focus.release(SearchInput::Mobile);
        true
    }

    /// Pointer pressed somewhere; `inside` tells whether the target lies
    /// within the search region.
    pub fn pointer_down(&mut self, inside: bool, viewport: Viewport) -> Option<PanelEffect> {
        if inside || !self.state.is_open() {
            return None;
        }

        self.text.clear();
        match self.state {
            PanelState::OpenDesktop => self.state = PanelState::Closed,
            PanelState::OpenMobile if viewport.is_narrow(self.breakpoint) => {
                self.state = PanelState::Closed;
                self.focus.release(SearchInput::Mobile);
            }
            _ => {}
        }
        Some(PanelEffect::QueryCleared)
    }

    /// Escape pressed.  Only acts while one of the inputs has focus.
    pub fn escape(&mut self) -> Option<PanelEffect> {
        if !self.focus.has_focus() {
            return None;
        }

        self.text.clear();
        if self.state == PanelState::OpenMobile {
            self.focus.release(SearchInput::Mobile);
        }
        self.state = PanelState::Closed;
        Some(PanelEffect::QueryCleared)
    }

    /// Leave the search entirely (e.g. navigating away): empty and closed.
    pub fn dismiss(&mut self) -> PanelEffect {
        self.text.clear();
        self.state = PanelState::Closed;
        self.focus.release(SearchInput::Mobile);
        PanelEffect::QueryCleared
    }

    /// Hide the panel but keep the typed text (a preview opened on top).
    pub fn collapse(&mut self) {
        self.state = PanelState::Closed;
        self.focus.release(SearchInput::Mobile);
    }

    /// An input regained focus without typing (keyboard or pointer).  The
    /// mobile input only exists while the overlay is open.
    pub fn focus_input(&mut self, input: SearchInput) {
        if input == SearchInput::Mobile && self.state != PanelState::OpenMobile {
            return;
        }
        self.focus.focus(input);
    }

    pub fn blur(&mut self) {
        self.focus.blur();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tune_proto::model::SearchResultSet;

    const BREAKPOINT: u16 = 1280;
    const WIDE: Viewport = Viewport { width: 1440 };
    const NARROW: Viewport = Viewport { width: 390 };

    #[test]
    fn desktop_panel_follows_the_query_text() {
        let mut panel = SearchPanel::new(BREAKPOINT);
        panel.type_text("moon", WIDE);
        assert_eq!(panel.state(), PanelState::OpenDesktop);
        assert!(panel.results_visible());

        panel.type_text("", WIDE);
        assert_eq!(panel.state(), PanelState::Closed);
        assert!(!panel.results_visible());
    }

    #[test]
    fn opening_the_overlay_focuses_its_input() {
        let mut panel = SearchPanel::new(BREAKPOINT);
        assert_eq!(panel.open_mobile(), PanelEffect::FocusInput(SearchInput::Mobile));
        assert_eq!(panel.focused_input(), Some(SearchInput::Mobile));
        assert_eq!(panel.state(), PanelState::OpenMobile);
        // Open but nothing typed yet.
        assert!(!panel.results_visible());
    }

    #[test]
    fn outside_click_closes_the_mobile_overlay_and_clears_text() {
        let mut panel = SearchPanel::new(BREAKPOINT);
        panel.open_mobile();
        panel.type_text("moon", NARROW);

        assert_eq!(panel.pointer_down(false, NARROW), Some(PanelEffect::QueryCleared));
        assert_eq!(panel.state(), PanelState::Closed);
        assert_eq!(panel.text(), "");
        assert_eq!(panel.focused_input(), None);
    }

    #[test]
    fn outside_click_on_a_wide_viewport_keeps_the_overlay_open() {
        let mut panel = SearchPanel::new(BREAKPOINT);
        panel.open_mobile();
        panel.type_text("moon", NARROW);

        // Resized wider before the click: the breakpoint is checked now.
        assert_eq!(panel.pointer_down(false, WIDE), Some(PanelEffect::QueryCleared));
        assert_eq!(panel.state(), PanelState::OpenMobile);
        assert_eq!(panel.text(), "");
    }

    #[test]
    fn outside_click_closes_the_desktop_panel() {
        let mut panel = SearchPanel::new(BREAKPOINT);
        panel.type_text("moon", WIDE);
        assert_eq!(panel.pointer_down(false, WIDE), Some(PanelEffect::QueryCleared));
        assert_eq!(panel.state(), PanelState::Closed);
        assert_eq!(panel.text(), "");
    }

    #[test]
    fn clicks_inside_or_while_closed_do_nothing() {
        let mut panel = SearchPanel::new(BREAKPOINT);
        assert_eq!(panel.pointer_down(false, NARROW), None);

        panel.type_text("moon", WIDE);
        assert_eq!(panel.pointer_down(true, WIDE), None);
        assert_eq!(panel.text(), "moon");

        panel.collapse();
        assert_eq!(panel.pointer_down(false, WIDE), None);
        assert_eq!(panel.text(), "moon");
    }

    #[test]
    fn escape_clears_and_closes_mobile() {
        let mut panel = SearchPanel::new(BREAKPOINT);
        panel.open_mobile();
        panel.type_text("moon", NARROW);
        assert_eq!(panel.escape(), Some(PanelEffect::QueryCleared));
        assert_eq!(panel.text(), "");
        assert_eq!(panel.state(), PanelState::Closed);
    }

    #[test]
    fn escape_on_desktop_hides_the_panel_by_emptying_the_query() {
        let mut panel = SearchPanel::new(BREAKPOINT);
        panel.type_text("moon", WIDE);
        assert_eq!(panel.escape(), Some(PanelEffect::QueryCleared));
        assert_eq!(panel.text(), "");
        assert!(!panel.results_visible());
        // The desktop input keeps focus.
        assert_eq!(panel.focused_input(), Some(SearchInput::Desktop));
    }

    #[test]
    fn escape_without_focus_is_ignored() {
        let mut panel = SearchPanel::new(BREAKPOINT);
        panel.type_text("moon", WIDE);
        panel.blur();
        assert_eq!(panel.escape(), None);
        assert_eq!(panel.text(), "moon");
    }

    #[test]
    fn escape_works_again_once_the_input_is_refocused() {
        let mut panel = SearchPanel::new(BREAKPOINT);
        panel.type_text("moon", WIDE);
        panel.blur();
        panel.focus_input(SearchInput::Desktop);
        assert_eq!(panel.escape(), Some(PanelEffect::QueryCleared));
        assert_eq!(panel.text(), "");
    }

    #[test]
    fn mobile_focus_needs_the_overlay() {
        let mut panel = SearchPanel::new(BREAKPOINT);
        panel.focus_input(SearchInput::Mobile);
        assert_eq!(panel.focused_input(), None);

        panel.open_mobile();
        panel.type_text("moon", NARROW);
        panel.blur();
        panel.focus_input(SearchInput::Mobile);
        assert_eq!(panel.escape(), Some(PanelEffect::QueryCleared));
        assert_eq!(panel.state(), PanelState::Closed);
    }

    #[test]
    fn narrow_typing_opens_the_overlay() {
        let mut panel = SearchPanel::new(BREAKPOINT);
        panel.type_text("m", NARROW);
        assert_eq!(panel.state(), PanelState::OpenMobile);
        assert_eq!(panel.focused_input(), Some(SearchInput::Mobile));
    }

    #[test]
    fn rows_list_artists_before_recordings() {
        let results = SearchResultSet {
            query: "moon".into(),
            artists: vec![ArtistSummary {
                id: "a1".into(),
                name: "Moonchild".into(),
            }],
            recordings: vec![RecordingSummary {
                id: "r1".into(),
                title: "Moonlight".into(),
                ..RecordingSummary::default()
            }],
        };
        let rendered = rows(SearchView::Ready(&results));
        assert!(matches!(&rendered[0], PanelRow::Artist(a) if a.id == "a1"));
        assert!(matches!(&rendered[1], PanelRow::Recording(r) if r.id == "r1"));

        assert_eq!(rows(SearchView::Loading { query: "moon" }), vec![PanelRow::Loading]);
        assert_eq!(
            rows(SearchView::Ready(&SearchResultSet::empty("moon"))),
            vec![PanelRow::NoResults]
        );
        assert!(rows(SearchView::Idle).is_empty());
    }
}
