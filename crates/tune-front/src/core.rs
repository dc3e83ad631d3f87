/// SearchCore — single-owner event loop for all search and preview state.
///
/// Front-ends send `Action`s into an mpsc channel; the core applies them one
/// at a time, so no state here is ever shared or locked.  The only suspension
/// points live outside the loop: catalog fetches run as spawned tasks and
/// report back with `Action::SearchSettled`, and the loop sleeps until the
/// debounce deadline when a keystroke is pending.
///
/// After every applied action the core replaces its `Snapshot` on a
/// `tokio::sync::watch` channel; one-off events (navigation, focus requests,
/// favorites changes) go out on a `broadcast` channel.
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, error, info};
use tune_proto::config::Config;
use tune_proto::favorites::FavoritesBackend;

use crate::action::{Action, CoreMessage};
use crate::bridge::PreviewBridge;
use crate::catalog::CatalogApi;
use crate::debounce::{Commit, Debouncer};
use crate::favorites::Favorites;
use crate::panel::{self, PanelEffect, PanelRow, SearchPanel};
use crate::preview::{PreviewHandle, PreviewSlot};
use crate::search::{FetchTicket, SearchCoordinator, Settled};
use crate::snapshot::Snapshot;

/// Tunables the core needs from the configuration.
#[derive(Debug, Clone, Copy)]
pub struct CoreSettings {
    pub debounce: Duration,
    /// Viewport width below which the mobile variant applies.
    pub breakpoint: u16,
}

impl CoreSettings {
    /// Pixel breakpoint, for front-ends that report widths in px.
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce: config.search.debounce(),
            breakpoint: config.layout.mobile_breakpoint,
        }
    }

    /// Column breakpoint for terminal front-ends.
    pub fn for_terminal(config: &Config) -> Self {
        Self {
            breakpoint: config.layout.terminal_breakpoint,
            ..Self::from_config(config)
        }
    }
}

// ── SearchCore ────────────────────────────────────────────────────────────────

pub struct SearchCore<B> {
    debouncer: Debouncer,
    search: SearchCoordinator,
    panel: SearchPanel,
    bridge: PreviewBridge,
    favorites: Favorites<B>,
    catalog: Arc<dyn CatalogApi>,
    /// Fetch tasks report back through this.  Weak so the loop still ends
    /// once every front-end sender is gone.
    action_tx: mpsc::WeakSender<Action>,
    snapshot_tx: watch::Sender<Snapshot>,
    message_tx: broadcast::Sender<CoreMessage>,
}

impl<B: FavoritesBackend> SearchCore<B> {
    pub fn new(
        settings: CoreSettings,
        catalog: Arc<dyn CatalogApi>,
        favorites: B,
        action_tx: &mpsc::Sender<Action>,
    ) -> Self {
        let (snapshot_tx, _) = watch::channel(Snapshot::default());
        let (message_tx, _) = broadcast::channel(64);
        let core = Self {
            debouncer: Debouncer::new(settings.debounce),
            search: SearchCoordinator::new(),
            panel: SearchPanel::new(settings.breakpoint),
            bridge: PreviewBridge::new(PreviewSlot::new()),
            favorites: Favorites::new(favorites),
            catalog,
            action_tx: action_tx.downgrade(),
            snapshot_tx,
            message_tx,
        };
        core.publish_snapshot();
        core
    }

    pub fn subscribe_snapshot(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn subscribe_messages(&self) -> broadcast::Receiver<CoreMessage> {
        self.message_tx.subscribe()
    }

    pub fn subscribe_preview(&self) -> watch::Receiver<Option<PreviewHandle>> {
        self.bridge.slot().subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Run the core event loop.  Returns on `Action::Shutdown` or once every
    /// sender has been dropped.
    pub async fn run(mut self, mut action_rx: mpsc::Receiver<Action>) -> anyhow::Result<()> {
        info!("SearchCore: starting event loop");

        loop {
            let deadline = self.debouncer.deadline();
            tokio::select! {
                action = action_rx.recv() => match action {
                    None => {
                        info!("SearchCore: action channel closed, shutting down");
                        break;
                    }
                    Some(Action::Shutdown) => {
                        info!("SearchCore: shutdown requested");
                        break;
                    }
                    Some(action) => self.handle(action),
                },

                _ = wait_until(deadline) => {
                    self.poll_debounce(Instant::now());
                }
            }
        }

        Ok(())
    }

    /// Apply one action.
    pub fn handle(&mut self, action: Action) {
        match action {
            Action::QueryChanged { text, viewport } => {
                self.panel.type_text(&text, viewport);
                if let Some(commit) = self.debouncer.input(&text, Instant::now()) {
                    self.apply_commit(commit);
                }
            }

            Action::OpenSearch => {
                let effect = self.panel.open_mobile();
                self.apply_effect(effect);
            }

            Action::CloseSearch => {
                self.panel.close();
            }

            Action::PointerDown { inside, viewport } => {
                if let Some(effect) = self.panel.pointer_down(inside, viewport) {
                    self.apply_effect(effect);
                }
            }

            Action::Escape => {
                if let Some(effect) = self.panel.escape() {
                    self.apply_effect(effect);
                }
            }

            Action::Blur => self.panel.blur(),

            Action::FocusInput(input) => self.panel.focus_input(input),

            Action::SelectRow(index) => self.select_row(index),

            Action::SelectArtist(artist) => {
                let (intent, effect) = self.bridge.select_artist(&mut self.panel, &artist);
                self.apply_effect(effect);
                self.broadcast(CoreMessage::Navigate(intent));
            }

            Action::SelectRecording(recording) => {
                self.bridge.select_recording(&mut self.panel, &recording);
            }

            Action::PreviewTrack(track) => {
                self.bridge.preview_track(track);
            }

            Action::ClosePreview(generation) => {
                self.bridge.close_preview(generation);
            }

            Action::ToggleFavorite => self.toggle_favorite(),

            Action::AddFavorite(track) => {
                let result = self.favorites.add_favorite(&track);
                self.report_favorite(&track.id, true, result);
            }

            Action::RemoveFavorite(id) => {
                let result = self.favorites.remove_favorite(&id);
                self.report_favorite(&id, false, result);
            }

            Action::SearchSettled { token, outcome } => {
                if self.search.settle(token, outcome) == Settled::Stale {
                    // Nothing observable changed.
                    return;
                }
            }

            Action::Shutdown => {}
        }

        self.publish_snapshot();
    }

    /// Commit the pending keystroke if its quiet interval is over.
    pub fn poll_debounce(&mut self, now: Instant) {
        if let Some(commit) = self.debouncer.poll(now) {
            self.apply_commit(commit);
            self.publish_snapshot();
        }
    }

    // ── Search ────────────────────────────────────────────────────────────────

    fn apply_commit(&mut self, commit: Commit) {
        match commit {
            Commit::Clear => self.clear_search(),
            Commit::Query(query) => {
                if let Some(ticket) = self.search.commit(&query) {
                    self.spawn_fetch(ticket);
                }
            }
        }
    }

    fn apply_effect(&mut self, effect: PanelEffect) {
        match effect {
            PanelEffect::QueryCleared => self.clear_search(),
            PanelEffect::FocusInput(input) => self.broadcast(CoreMessage::FocusInput(input)),
        }
    }

    fn clear_search(&mut self) {
        self.debouncer.cancel();
        self.search.clear();
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let Some(tx) = self.action_tx.upgrade() else {
            debug!("SearchCore: not fetching {:?}, loop is shutting down", ticket.query);
            return;
        };
        let catalog = Arc::clone(&self.catalog);
        tokio::spawn(async move {
            let outcome = catalog.search(&ticket.query).await;
            let _ = tx
                .send(Action::SearchSettled {
                    token: ticket.token,
                    outcome,
                })
                .await;
        });
    }

    fn current_rows(&self) -> Vec<PanelRow> {
        panel::rows(self.search.view())
    }

    fn select_row(&mut self, index: usize) {
        if !self.panel.results_visible() {
            return;
        }
        match self.current_rows().into_iter().nth(index) {
            Some(PanelRow::Artist(artist)) => self.handle(Action::SelectArtist(artist)),
            Some(PanelRow::Recording(recording)) => self.handle(Action::SelectRecording(recording)),
            _ => debug!("SearchCore: row {} is not selectable", index),
        }
    }

    // ── Favorites ─────────────────────────────────────────────────────────────

    fn toggle_favorite(&mut self) {
        let Some(handle) = self.bridge.active_preview() else {
            debug!("SearchCore: favorite toggled with nothing in preview");
            return;
        };
        let was_favorite = self.favorites.is_favorite(&handle.track.id);
        let result = self.favorites.toggle(&handle.track).map(|_| ());
        self.report_favorite(&handle.track.id, !was_favorite, result);
    }

    fn report_favorite(
        &self,
        id: &str,
        favorite: bool,
        result: Result<(), tune_proto::favorites::FavoritesError>,
    ) {
        match result {
            Ok(()) => self.broadcast(CoreMessage::FavoritesChanged {
                id: id.to_string(),
                favorite,
            }),
            Err(e) => {
                error!("SearchCore: favorites update for {:?} failed: {}", id, e);
                self.broadcast(CoreMessage::FavoritesError(e.to_string()));
            }
        }
    }

    // ── Publishing ────────────────────────────────────────────────────────────

    fn broadcast(&self, msg: CoreMessage) {
        // No subscribers is fine.
        let _ = self.message_tx.send(msg);
    }

    fn publish_snapshot(&self) {
        let preview = self.bridge.active_preview();
        let preview_is_favorite = preview
            .as_ref()
            .is_some_and(|h| self.favorites.is_favorite(&h.track.id));

        self.snapshot_tx.send_replace(Snapshot {
            query_text: self.panel.text().to_string(),
            panel: self.panel.state(),
            focused_input: self.panel.focused_input(),
            results_visible: self.panel.results_visible(),
            loading: self.search.is_loading(),
            rows: self.current_rows(),
            preview,
            preview_is_favorite,
            favorites: self.favorites.list(),
        });
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
