//! PreviewSlot — the single, explicitly owned "currently previewed track".
//!
//! Writers replace the whole slot at once (`watch::Sender::send_replace`), so
//! a subscriber never observes a half-updated track.  Each publish gets a new
//! generation; the preview surface closes with the generation it was opened
//! with, which lets a close from an already-replaced preview be ignored.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;
use tune_proto::model::Track;

/// What the preview surface gets: the track plus the token it must close with.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewHandle {
    pub track: Arc<Track>,
    pub generation: u64,
}

pub struct PreviewSlot {
    tx: watch::Sender<Option<PreviewHandle>>,
    generation: u64,
}

impl PreviewSlot {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx, generation: 0 }
    }

    /// Put `track` in the slot, replacing whatever was previewed before.
    pub fn publish(&mut self, track: Track) -> PreviewHandle {
        self.generation += 1;
        let handle = PreviewHandle {
            track: Arc::new(track),
            generation: self.generation,
        };
        debug!(
            "preview: publishing {:?} (generation {})",
            handle.track.id, handle.generation
        );
        self.tx.send_replace(Some(handle.clone()));
        handle
    }

    /// Close the preview opened as `generation`.  Returns `false` (and leaves
    /// the slot alone) when a newer preview has replaced it since.
    pub fn close(&mut self, generation: u64) -> bool {
        let is_current = self
            .tx
            .borrow()
            .as_ref()
            .is_some_and(|h| h.generation == generation);
        if !is_current {
            debug!("preview: ignoring close for stale generation {}", generation);
            return false;
        }
        self.tx.send_replace(None);
        true
    }

    pub fn current(&self) -> Option<PreviewHandle> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<PreviewHandle>> {
        self.tx.subscribe()
    }
}

impl Default for PreviewSlot {
    fn default() -> Self {
        Self::new()
    }
}
