//! App — terminal shell over the search core.
//!
//! Architecture:
//! - `App` owns the components and the latest `Snapshot` from the core.
//! - Keyboard/mouse events arrive from a blocking reader task over mpsc.
//! - Snapshots arrive on a `watch` channel, one-off `CoreMessage`s on a
//!   `broadcast` channel.
//! - Components return `Vec<Command>`; core actions go out on `action_tx`.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Terminal,
};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, warn};
use tune_front::action::{Action, CoreMessage};
use tune_front::bridge::NavigationIntent;
use tune_front::focus::SearchInput;
use tune_front::panel::{PanelState, Viewport};
use tune_front::snapshot::Snapshot;

use crate::{
    component::{hit, Command, Component, Pane, UiContext},
    components::{
        favorites_list::FavoritesList, preview_modal::PreviewModal, results_panel::ResultsPanel,
        search_bar::SearchBar,
    },
    theme::{style_muted, C_ACCENT, C_BG},
    widgets::toast::ToastManager,
};

/// Screen regions from the last frame, for mouse hit-testing.
#[derive(Debug, Clone, Default)]
struct Areas {
    search: Rect,
    results: Rect,
    /// Whole-screen mobile overlay (zero when not shown).
    overlay: Rect,
    favorites: Rect,
    preview: Rect,
}

pub struct App {
    action_tx: mpsc::Sender<Action>,
    snapshot_rx: watch::Receiver<Snapshot>,
    snapshot: Snapshot,
    focus: Pane,
    width: u16,
    areas: Areas,
    search_bar: SearchBar,
    results: ResultsPanel,
    favorites: FavoritesList,
    preview: PreviewModal,
    toast: ToastManager,
    should_quit: bool,
}

impl App {
    pub fn new(
        action_tx: mpsc::Sender<Action>,
        snapshot_rx: watch::Receiver<Snapshot>,
        breakpoint: u16,
    ) -> Self {
        let snapshot = snapshot_rx.borrow().clone();
        Self {
            action_tx,
            snapshot_rx,
            snapshot,
            focus: Pane::Favorites,
            width: 0,
            areas: Areas::default(),
            search_bar: SearchBar::new(breakpoint),
            results: ResultsPanel::new(),
            favorites: FavoritesList::new(),
            preview: PreviewModal::new(),
            toast: ToastManager::new(),
            should_quit: false,
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.width)
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self, mut messages: broadcast::Receiver<CoreMessage>) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        self.width = terminal.size()?.width;
        debug!("run(): terminal ready, width={}", self.width);

        // ── Background task: keyboard/mouse events ────────────────────────────
        let (event_tx, mut event_rx) = mpsc::channel::<Event>(256);
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(ev).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        let mut toast_tick = tokio::time::interval(Duration::from_millis(250));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(ev) = event_rx.recv() => {
                    self.handle_event(ev).await;
                    needs_redraw = true;
                }

                changed = self.snapshot_rx.changed() => {
                    if changed.is_err() {
                        info!("search core stopped, leaving");
                        break;
                    }
                    self.snapshot = self.snapshot_rx.borrow_and_update().clone();
                    self.follow_snapshot();
                    needs_redraw = true;
                }

                msg = messages.recv() => match msg {
                    Ok(msg) => {
                        self.on_core_message(msg);
                        needs_redraw = true;
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("core message receiver lagged by {} messages", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },

                _ = toast_tick.tick() => {
                    needs_redraw = self.toast.tick();
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        let _ = self.action_tx.send(Action::Shutdown).await;
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    async fn handle_event(&mut self, ev: Event) {
        let commands = match ev {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, _) => {
                self.width = w;
                Vec::new()
            }
            _ => Vec::new(),
        };
        for command in commands {
            self.dispatch(command).await;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Command::Quit];
        }

        let ctx = UiContext {
            snapshot: &self.snapshot,
            viewport: Viewport::new(self.width),
        };

        // The preview modal captures the keyboard while it is up.
        if self.snapshot.preview.is_some() {
            return self.preview.handle_key(key, &ctx);
        }

        match self.focus {
            Pane::Search => self.search_bar.handle_key(key, &ctx),
            Pane::Results => self.results.handle_key(key, &ctx),
            Pane::Favorites => self.favorites.handle_key(key, &ctx),
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Command> {
        if !matches!(event.kind, MouseEventKind::Down(_)) {
            return Vec::new();
        }
        let (col, row) = (event.column, event.row);
        let areas = self.areas.clone();

        let inside = hit(areas.overlay, col, row)
            || hit(areas.search, col, row)
            || hit(areas.results, col, row);
        let mut commands = vec![Command::Core(Action::PointerDown {
            inside,
            viewport: self.viewport(),
        })];

        let ctx = UiContext {
            snapshot: &self.snapshot,
            viewport: Viewport::new(self.width),
        };

        if hit(areas.preview, col, row) {
            return commands;
        }
        if hit(areas.results, col, row) {
            commands.extend(self.results.handle_mouse(event, areas.results, &ctx));
        } else if hit(areas.search, col, row) {
            commands.extend(self.search_bar.handle_mouse(event, areas.search, &ctx));
        } else if hit(areas.favorites, col, row) && areas.overlay.width == 0 {
            commands.extend(self.favorites.handle_mouse(event, areas.favorites, &ctx));
        }
        commands
    }

    async fn dispatch(&mut self, command: Command) {
        match command {
            Command::Core(action) => {
                self.before_core(&action);
                if self.action_tx.send(action).await.is_err() {
                    warn!("search core is gone, dropping action");
                    self.should_quit = true;
                }
            }
            Command::Copy(text) => self.copy_to_clipboard(text),
            Command::Focus(pane) => self.set_focus(pane).await,
            Command::Quit => self.should_quit = true,
        }
    }

    /// Mirror query clears the core is about to make in the local input
    /// buffer, so a stale buffer never re-sends the old text.
    fn before_core(&mut self, action: &Action) {
        let clears = match action {
            Action::Escape => self.snapshot.focused_input.is_some(),
            Action::PointerDown { inside: false, .. } => self.snapshot.panel.is_open(),
            _ => false,
        };
        if clears {
            self.search_bar.clear();
            if self.focus == Pane::Results {
                self.focus = Pane::Search;
            }
        }
    }

    async fn set_focus(&mut self, pane: Pane) {
        if pane == Pane::Search && self.search_bar.is_collapsed(&UiContext {
            snapshot: &self.snapshot,
            viewport: self.viewport(),
        }) && self.snapshot.panel != PanelState::OpenMobile
        {
            // The narrow-layout input only exists inside the overlay.
            let _ = self.action_tx.send(Action::OpenSearch).await;
            return;
        }
        if pane == Pane::Results && self.snapshot.visible_rows().is_empty() {
            return;
        }
        if pane == Pane::Favorites && self.focus != Pane::Favorites {
            let _ = self.action_tx.send(Action::Blur).await;
        }
        if pane == Pane::Search {
            let input = if self.snapshot.panel == PanelState::OpenMobile {
                SearchInput::Mobile
            } else {
                SearchInput::Desktop
            };
            let _ = self.action_tx.send(Action::FocusInput(input)).await;
        }
        self.focus = pane;
    }

    // ── Core output ───────────────────────────────────────────────────────────

    /// Keep local focus consistent with what the core now shows.
    fn follow_snapshot(&mut self) {
        if self.focus == Pane::Results && !self.snapshot.results_visible {
            self.focus = if self.snapshot.panel.is_open() {
                Pane::Search
            } else {
                Pane::Favorites
            };
        }
        if self.focus == Pane::Search
            && self.snapshot.panel == PanelState::Closed
            && self.search_bar.is_collapsed(&UiContext {
                snapshot: &self.snapshot,
                viewport: self.viewport(),
            })
        {
            self.focus = Pane::Favorites;
        }
    }

    fn on_core_message(&mut self, msg: CoreMessage) {
        match msg {
            CoreMessage::FocusInput(SearchInput::Mobile | SearchInput::Desktop) => {
                self.focus = Pane::Search;
            }
            CoreMessage::Navigate(NavigationIntent::Artist { id, name_hint }) => {
                info!("navigate: artist {:?} ({})", id, name_hint);
                self.search_bar.clear();
                self.focus = Pane::Favorites;
                self.toast.info(format!("artist: {}", name_hint));
            }
            CoreMessage::FavoritesChanged { favorite: true, .. } => {
                self.toast.success("added to favorites");
            }
            CoreMessage::FavoritesChanged { favorite: false, .. } => {
                self.toast.info("removed from favorites");
            }
            CoreMessage::FavoritesError(e) => {
                self.toast.error(format!("favorites: {}", e));
            }
        }
    }

    fn copy_to_clipboard(&mut self, text: String) {
        match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
            Ok(()) => {
                let display = if text.chars().count() > 40 {
                    format!("{}…", text.chars().take(40).collect::<String>())
                } else {
                    text
                };
                self.toast.success(format!("copied: {}", display));
            }
            Err(e) => {
                warn!("clipboard error: {}", e);
                self.toast.error(format!("clipboard error: {}", e));
            }
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        self.width = area.width;
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let snapshot = self.snapshot.clone();
        let ctx = UiContext {
            snapshot: &snapshot,
            viewport: Viewport::new(area.width),
        };
        let mut areas = Areas::default();

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        let (header_area, body_area, keys_area) = (outer[0], outer[1], outer[2]);

        // ── Header: title + search ────────────────────────────────────────────
        let header = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(9), Constraint::Min(0)])
            .split(header_area);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " tunes",
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            ))),
            Rect { y: header[0].y + 1, height: 1, ..header[0] },
        );

        let collapsed = self.search_bar.is_collapsed(&ctx);
        let overlay = snapshot.panel == PanelState::OpenMobile;
        if collapsed && !overlay {
            // Trigger only.
            areas.search = Rect { y: header[1].y + 1, height: 1, width: header[1].width.min(12), ..header[1] };
            self.search_bar.draw(frame, areas.search, false, &ctx);
        } else if !overlay {
            areas.search = header[1];
            self.search_bar.draw(frame, areas.search, self.focus == Pane::Search, &ctx);
        }

        // ── Body: favorites ───────────────────────────────────────────────────
        areas.favorites = body_area;
        self.favorites.draw(frame, body_area, self.focus == Pane::Favorites, &ctx);

        // ── Floating results (desktop) ────────────────────────────────────────
        if !overlay && snapshot.results_visible {
            let height = self.results.height_for(&ctx, body_area.height);
            areas.results = Rect {
                x: areas.search.x,
                y: body_area.y,
                width: areas.search.width,
                height,
            };
            self.results.draw(frame, areas.results, self.focus == Pane::Results, &ctx);
        }

        // ── Mobile overlay ────────────────────────────────────────────────────
        if overlay {
            areas.overlay = area;
            frame.render_widget(Clear, area);
            frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);
            areas.search = Rect { height: 3, ..area };
            self.search_bar.draw(frame, areas.search, self.focus == Pane::Search, &ctx);
            if snapshot.results_visible {
                let below = area.height.saturating_sub(3);
                areas.results = Rect {
                    y: area.y + 3,
                    height: self.results.height_for(&ctx, below),
                    ..area
                };
                self.results.draw(frame, areas.results, self.focus == Pane::Results, &ctx);
            }
        }

        // ── Preview modal ─────────────────────────────────────────────────────
        if snapshot.preview.is_some() {
            areas.preview = PreviewModal::area(area);
            self.preview.draw(frame, area, true, &ctx);
        }

        // ── Keys bar ──────────────────────────────────────────────────────────
        if !overlay {
            let hint = match self.focus {
                Pane::Search => " type to search · ↓ results · tab favorites · esc clear",
                Pane::Results => " ↑↓ move · enter open · esc clear",
                Pane::Favorites => " / search · enter preview · d remove · q quit",
            };
            frame.render_widget(Paragraph::new(Span::styled(hint, style_muted())), keys_area);
        }

        self.toast.draw(frame, area);
        self.areas = areas;
    }
}
