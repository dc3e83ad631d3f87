//! FocusTracker — which search input (if any) holds keyboard focus.

/// The two text fields the search region can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchInput {
    /// Persistent field shown on wide layouts.
    Desktop,
    /// Field inside the overlay opened from the search trigger.
    Mobile,
}

#[derive(Debug, Default)]
pub struct FocusTracker {
    current: Option<SearchInput>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<SearchInput> {
        self.current
    }

    pub fn focus(&mut self, input: SearchInput) {
        self.current = Some(input);
    }

    pub fn blur(&mut self) {
        self.current = None;
    }

    /// Drop focus only if `input` is the one holding it (e.g. its overlay closed).
    pub fn release(&mut self, input: SearchInput) {
        if self.current == Some(input) {
            self.current = None;
        }
    }

    pub fn is_focused(&self, input: SearchInput) -> bool {
        self.current == Some(input)
    }

    pub fn has_focus(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_only_affects_the_focused_input() {
        let mut focus = FocusTracker::new();
        focus.focus(SearchInput::Desktop);
        focus.release(SearchInput::Mobile);
        assert!(focus.is_focused(SearchInput::Desktop));
        focus.release(SearchInput::Desktop);
        assert!(!focus.has_focus());
    }
}
