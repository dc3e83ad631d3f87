mod app;
mod component;
mod components;
mod theme;
mod widgets;

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tune_front::action::Action;
use tune_front::catalog::HttpCatalog;
use tune_front::core::{CoreSettings, SearchCore};
use tune_proto::config::Config;
use tune_proto::favorites::JsonFavorites;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let data_dir = tune_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;

    let log_path = data_dir.join("tunes.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // RUST_LOG wins; otherwise debug, with the HTTP client stack held at warn.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("tunes log: {}", log_path.display());
    tracing::info!("tunes starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config: {:#}, using defaults", e);
        Config::default()
    });

    // ── Catalog + favorites ──────────────────────────────────────────────────
    let catalog = HttpCatalog::from_config(&config.catalog)?;
    tracing::info!("catalog: {}", catalog.search_url());
    let favorites = JsonFavorites::open(config.paths.favorites_file.clone());

    // ── Action channel (shell → SearchCore) ─────────────────────────────────
    let (action_tx, action_rx) = mpsc::channel::<Action>(256);

    let settings = CoreSettings::for_terminal(&config);
    let core = SearchCore::new(settings, Arc::new(catalog), favorites, &action_tx);
    let snapshot_rx = core.subscribe_snapshot();
    let messages = core.subscribe_messages();

    // ── Spawn SearchCore event loop ──────────────────────────────────────────
    let core_task = tokio::spawn(async move {
        if let Err(e) = core.run(action_rx).await {
            tracing::error!("SearchCore exited with error: {}", e);
        }
    });

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(action_tx, snapshot_rx, settings.breakpoint);
    app.run(messages).await?;

    let _ = core_task.await;
    tracing::info!("tunes stopped");
    Ok(())
}
