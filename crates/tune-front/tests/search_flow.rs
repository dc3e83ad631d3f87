//! End-to-end behaviour of the search core: debouncing, stale-response
//! handling, panel dismissal and the selection → preview → favorite path.
//!
//! Time is paused, and the scripted catalog only answers when a test releases
//! a specific query, so completion order is fully controlled.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tune_front::action::{Action, CoreMessage};
use tune_front::bridge::NavigationIntent;
use tune_front::catalog::{CatalogApi, CatalogError};
use tune_front::core::{CoreSettings, SearchCore};
use tune_front::focus::SearchInput;
use tune_front::panel::{PanelRow, PanelState, Viewport};
use tune_front::snapshot::Snapshot;
use tune_proto::favorites::{FavoritesBackend, JsonFavorites, MemoryFavorites};
use tune_proto::model::{ArtistSummary, RecordingSummary, SearchResponse};

const DEBOUNCE: Duration = Duration::from_millis(300);
const WIDE: Viewport = Viewport { width: 1440 };
const NARROW: Viewport = Viewport { width: 390 };

type Outcome = Result<SearchResponse, CatalogError>;

// ── Scripted catalog ──────────────────────────────────────────────────────────

struct ScriptedCatalog {
    issued: mpsc::UnboundedSender<String>,
    pending: Mutex<HashMap<String, oneshot::Sender<Outcome>>>,
}

impl ScriptedCatalog {
    fn resolve(&self, query: &str, outcome: Outcome) {
        let tx = self
            .pending
            .lock()
            .unwrap()
            .remove(query)
            .unwrap_or_else(|| panic!("no fetch in flight for {:?}", query));
        let _ = tx.send(outcome);
    }
}

#[async_trait]
impl CatalogApi for ScriptedCatalog {
    async fn search(&self, query: &str) -> Result<SearchResponse, CatalogError> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().insert(query.to_string(), tx);
        let _ = self.issued.send(query.to_string());
        rx.await.unwrap_or(Err(CatalogError::Status(499)))
    }
}

// ── Harness ───────────────────────────────────────────────────────────────────

struct Harness {
    tx: mpsc::Sender<Action>,
    snapshots: watch::Receiver<Snapshot>,
    messages: broadcast::Receiver<CoreMessage>,
    issued: mpsc::UnboundedReceiver<String>,
    catalog: Arc<ScriptedCatalog>,
}

fn start<B: FavoritesBackend + Send + 'static>(favorites: B) -> Harness {
    let (issued_tx, issued) = mpsc::unbounded_channel();
    let catalog = Arc::new(ScriptedCatalog {
        issued: issued_tx,
        pending: Mutex::new(HashMap::new()),
    });
    let (tx, rx) = mpsc::channel(64);
    let settings = CoreSettings {
        debounce: DEBOUNCE,
        breakpoint: 1280,
    };
    let core = SearchCore::new(settings, catalog.clone(), favorites, &tx);
    let snapshots = core.subscribe_snapshot();
    let messages = core.subscribe_messages();
    tokio::spawn(core.run(rx));
    Harness {
        tx,
        snapshots,
        messages,
        issued,
        catalog,
    }
}

impl Harness {
    async fn send(&self, action: Action) {
        self.tx.send(action).await.unwrap();
    }

    async fn type_text(&self, text: &str, viewport: Viewport) {
        self.send(Action::QueryChanged {
            text: text.to_string(),
            viewport,
        })
        .await;
    }

    async fn next_fetch(&mut self) -> String {
        tokio::time::timeout(Duration::from_secs(5), self.issued.recv())
            .await
            .expect("no fetch was issued")
            .unwrap()
    }

    async fn until(&mut self, mut pred: impl FnMut(&Snapshot) -> bool) -> Snapshot {
        let snap = tokio::time::timeout(Duration::from_secs(5), self.snapshots.wait_for(|s| pred(s)))
            .await
            .expect("snapshot never matched")
            .unwrap();
        (*snap).clone()
    }

    /// Let the core drain whatever is queued.
    async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    fn current(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }
}

fn recording(id: &str, title: &str, artist: &str) -> RecordingSummary {
    RecordingSummary {
        id: id.into(),
        title: title.into(),
        artist: Some(artist.into()),
        ..RecordingSummary::default()
    }
}

fn response(recordings: Vec<RecordingSummary>) -> Outcome {
    Ok(SearchResponse {
        artists: Vec::new(),
        recordings,
    })
}

fn titles(snapshot: &Snapshot) -> Vec<String> {
    snapshot
        .visible_rows()
        .iter()
        .filter_map(|r| match r {
            PanelRow::Recording(rec) => Some(rec.title.clone()),
            _ => None,
        })
        .collect()
}

// ── Debouncing ────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn typing_inside_the_quiet_interval_fetches_once() {
    let mut h = start(MemoryFavorites::new());

    for text in ["m", "mo", "moo", "moon"] {
        h.type_text(text, WIDE).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    tokio::time::sleep(DEBOUNCE).await;

    assert_eq!(h.next_fetch().await, "moon");
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(h.issued.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn recommitting_the_same_query_does_not_refetch() {
    let mut h = start(MemoryFavorites::new());

    h.type_text("moon", WIDE).await;
    assert_eq!(h.next_fetch().await, "moon");

    h.type_text("moon ", WIDE).await;
    tokio::time::sleep(DEBOUNCE * 2).await;
    assert!(h.issued.try_recv().is_err());
}

// ── Race safety ───────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn a_late_response_for_an_old_query_is_discarded() {
    let mut h = start(MemoryFavorites::new());

    h.type_text("moon", WIDE).await;
    assert_eq!(h.next_fetch().await, "moon");
    h.type_text("nova", WIDE).await;
    assert_eq!(h.next_fetch().await, "nova");

    h.catalog
        .resolve("nova", response(vec![recording("r2", "Supernova", "Nova")]));
    let snap = h.until(|s| !s.loading).await;
    assert_eq!(titles(&snap), ["Supernova"]);

    h.catalog
        .resolve("moon", response(vec![recording("r1", "Moonlight", "Luna")]));
    h.settle().await;
    assert_eq!(titles(&h.current()), ["Supernova"]);
}

#[tokio::test(start_paused = true)]
async fn an_older_response_arriving_first_never_shows() {
    let mut h = start(MemoryFavorites::new());

    h.type_text("moon", WIDE).await;
    assert_eq!(h.next_fetch().await, "moon");
    h.type_text("nova", WIDE).await;
    assert_eq!(h.next_fetch().await, "nova");

    h.catalog
        .resolve("moon", response(vec![recording("r1", "Moonlight", "Luna")]));
    h.settle().await;
    let snap = h.current();
    assert!(snap.loading);
    assert_eq!(snap.visible_rows(), [PanelRow::Loading]);

    h.catalog
        .resolve("nova", response(vec![recording("r2", "Supernova", "Nova")]));
    let snap = h.until(|s| !s.loading).await;
    assert_eq!(titles(&snap), ["Supernova"]);
}

#[tokio::test(start_paused = true)]
async fn clearing_the_query_hides_results_immediately() {
    let mut h = start(MemoryFavorites::new());

    h.type_text("moon", WIDE).await;
    assert_eq!(h.next_fetch().await, "moon");

    h.type_text("", WIDE).await;
    let snap = h.until(|s| s.query_text.is_empty()).await;
    assert!(!snap.loading);
    assert!(snap.rows.is_empty());
    assert_eq!(snap.panel, PanelState::Closed);

    h.catalog
        .resolve("moon", response(vec![recording("r1", "Moonlight", "Luna")]));
    h.settle().await;
    assert!(h.current().rows.is_empty());
}

#[tokio::test(start_paused = true)]
async fn a_failed_fetch_reads_as_no_results() {
    let mut h = start(MemoryFavorites::new());

    h.type_text("moon", WIDE).await;
    assert_eq!(h.next_fetch().await, "moon");
    h.catalog.resolve("moon", Err(CatalogError::Status(500)));

    let snap = h.until(|s| !s.loading).await;
    assert_eq!(snap.visible_rows(), [PanelRow::NoResults]);
}

// ── Dismissal ─────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn outside_click_clears_and_closes_the_desktop_panel() {
    let mut h = start(MemoryFavorites::new());

    h.type_text("moon", WIDE).await;
    h.until(|s| s.panel == PanelState::OpenDesktop).await;

    h.send(Action::PointerDown {
        inside: true,
        viewport: WIDE,
    })
    .await;
    h.settle().await;
    assert_eq!(h.current().panel, PanelState::OpenDesktop);

    h.send(Action::PointerDown {
        inside: false,
        viewport: WIDE,
    })
    .await;
    let snap = h.until(|s| s.panel == PanelState::Closed).await;
    assert_eq!(snap.query_text, "");
    assert!(snap.visible_rows().is_empty());
}

#[tokio::test(start_paused = true)]
async fn mobile_overlay_focuses_its_input_and_closes_on_escape() {
    let mut h = start(MemoryFavorites::new());

    h.send(Action::OpenSearch).await;
    assert_eq!(
        h.messages.recv().await.unwrap(),
        CoreMessage::FocusInput(SearchInput::Mobile)
    );

    h.type_text("nova", NARROW).await;
    let snap = h.until(|s| s.query_text == "nova").await;
    assert_eq!(snap.panel, PanelState::OpenMobile);

    h.send(Action::Escape).await;
    let snap = h.until(|s| s.panel == PanelState::Closed).await;
    assert_eq!(snap.query_text, "");
    assert_eq!(snap.focused_input, None);
}

#[tokio::test(start_paused = true)]
async fn outside_click_on_a_widened_viewport_keeps_the_overlay_open() {
    let mut h = start(MemoryFavorites::new());

    h.send(Action::OpenSearch).await;
    h.type_text("nova", NARROW).await;
    h.until(|s| s.query_text == "nova").await;

    h.send(Action::PointerDown {
        inside: false,
        viewport: WIDE,
    })
    .await;
    let snap = h.until(|s| s.query_text.is_empty()).await;
    assert_eq!(snap.panel, PanelState::OpenMobile);
}

#[tokio::test(start_paused = true)]
async fn escape_clears_the_query_after_leaving_and_refocusing_the_input() {
    let mut h = start(MemoryFavorites::new());

    h.type_text("moon", WIDE).await;
    h.until(|s| s.panel == PanelState::OpenDesktop).await;

    h.send(Action::Blur).await;
    h.send(Action::Escape).await;
    h.settle().await;
    assert_eq!(h.current().query_text, "moon");

    h.send(Action::FocusInput(SearchInput::Desktop)).await;
    h.send(Action::Escape).await;
    let snap = h.until(|s| s.query_text.is_empty()).await;
    assert_eq!(snap.panel, PanelState::Closed);
    assert_eq!(snap.focused_input, Some(SearchInput::Desktop));
}

#[tokio::test(start_paused = true)]
async fn refocused_mobile_overlay_still_closes_on_escape() {
    let mut h = start(MemoryFavorites::new());

    h.send(Action::OpenSearch).await;
    h.type_text("nova", NARROW).await;
    h.until(|s| s.query_text == "nova").await;

    h.send(Action::Blur).await;
    h.send(Action::FocusInput(SearchInput::Mobile)).await;
    h.send(Action::Escape).await;
    let snap = h.until(|s| s.panel == PanelState::Closed).await;
    assert_eq!(snap.query_text, "");
}

// ── Selection → preview → favorites ──────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn choosing_an_artist_navigates_and_clears_the_search() {
    let mut h = start(MemoryFavorites::new());

    h.type_text("moon", WIDE).await;
    assert_eq!(h.next_fetch().await, "moon");
    h.catalog.resolve(
        "moon",
        Ok(SearchResponse {
            artists: vec![ArtistSummary {
                id: "a7".into(),
                name: "Moonchild".into(),
            }],
            recordings: Vec::new(),
        }),
    );
    h.until(|s| !s.loading).await;

    h.send(Action::SelectRow(0)).await;
    assert_eq!(
        h.messages.recv().await.unwrap(),
        CoreMessage::Navigate(NavigationIntent::Artist {
            id: "a7".into(),
            name_hint: "Moonchild".into(),
        })
    );
    let snap = h.until(|s| s.query_text.is_empty()).await;
    assert_eq!(snap.panel, PanelState::Closed);
    assert!(snap.preview.is_none());
}

#[tokio::test(start_paused = true)]
async fn recording_to_preview_to_persisted_favorite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.json");
    let mut h = start(JsonFavorites::open(&path));

    h.type_text("moon", WIDE).await;
    assert_eq!(h.next_fetch().await, "moon");
    h.catalog
        .resolve("moon", response(vec![recording("r1", "Moonlight", "Luna")]));
    h.until(|s| !s.loading).await;

    h.send(Action::SelectRow(0)).await;
    let snap = h.until(|s| s.preview.is_some()).await;
    let Some(preview) = &snap.preview else {
        unreachable!()
    };
    let track = &preview.track;
    assert_eq!(track.id, "r1");
    assert_eq!(track.title, "Moonlight");
    assert_eq!(track.artist.name, "Luna");
    assert_eq!(track.duration, 0);
    assert_eq!(track.rank, 0);
    assert_eq!(track.release_date, None);
    assert_eq!(snap.panel, PanelState::Closed);
    assert_eq!(snap.query_text, "moon");
    assert!(!snap.preview_is_favorite);

    h.send(Action::ToggleFavorite).await;
    let snap = h.until(|s| !s.favorites.is_empty()).await;
    assert!(snap.preview_is_favorite);
    assert_eq!(snap.favorites.len(), 1);
    assert!(snap.is_favorite("r1"));
    assert_eq!(
        h.messages.recv().await.unwrap(),
        CoreMessage::FavoritesChanged {
            id: "r1".into(),
            favorite: true,
        }
    );

    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let entry = &on_disk[0];
    assert_eq!(entry["id"], "r1");
    assert!(entry["addedAt"].as_str().is_some_and(|s| s.ends_with('Z')));
    assert!(entry["release_date"].is_string());

    // The preview surface closing with its own generation empties the slot.
    h.send(Action::ClosePreview(preview.generation)).await;
    let snap = h.until(|s| s.preview.is_none()).await;
    assert_eq!(snap.favorites.len(), 1);
}
