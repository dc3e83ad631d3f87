//! Selection/preview bridge — what happens when a search result is chosen.
//!
//! An artist turns into a navigation intent for the router; a recording is
//! normalized into a [`Track`] and published to the preview slot.

use tracing::info;
use tune_proto::model::{ArtistSummary, RecordingSummary, Track};

use crate::panel::{PanelEffect, SearchPanel};
use crate::preview::{PreviewHandle, PreviewSlot};

/// Where the router should go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationIntent {
    /// Artist detail view.  `name_hint` lets the destination render a title
    /// before its own fetch completes.
    Artist { id: String, name_hint: String },
}

pub struct PreviewBridge {
    slot: PreviewSlot,
}

impl PreviewBridge {
    pub fn new(slot: PreviewSlot) -> Self {
        Self { slot }
    }

    /// Leave the search for the artist's page.  The query is cleared and the
    /// panel closed; the returned effect tells the caller to drop searches.
    pub fn select_artist(
        &mut self,
        panel: &mut SearchPanel,
        artist: &ArtistSummary,
    ) -> (NavigationIntent, PanelEffect) {
        info!("bridge: navigating to artist {:?}", artist.id);
        let effect = panel.dismiss();
        let intent = NavigationIntent::Artist {
            id: artist.id.clone(),
            name_hint: artist.name.clone(),
        };
        (intent, effect)
    }

    /// Preview a recording from the results panel.  The panel closes; the
    /// query text stays so the user can reopen the same results.
    pub fn select_recording(
        &mut self,
        panel: &mut SearchPanel,
        recording: &RecordingSummary,
    ) -> PreviewHandle {
        panel.collapse();
        self.preview_track(Track::from_recording(recording))
    }

    /// Preview a track picked anywhere else (album pages, trending lists).
    pub fn preview_track(&mut self, track: Track) -> PreviewHandle {
        info!("bridge: previewing {:?} ({})", track.id, track.title);
        self.slot.publish(track)
    }

    /// Called by the preview surface when it is dismissed.
    pub fn close_preview(&mut self, generation: u64) -> bool {
        self.slot.close(generation)
    }

    pub fn active_preview(&self) -> Option<PreviewHandle> {
        self.slot.current()
    }

    pub fn slot(&self) -> &PreviewSlot {
        &self.slot
    }
}
