//! Favorites store — the only way the core mutates the favorites collection.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use tune_proto::favorites::{FavoritesBackend, FavoritesError};
use tune_proto::model::{FavoriteEntry, Track};

pub struct Favorites<B> {
    backend: B,
}

impl<B: FavoritesBackend> Favorites<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Save `track`.  Missing duration/rank/release date are backfilled and
    /// `addedAt` is stamped.  A track that is already saved is left exactly as
    /// it was, including its original `addedAt`.
    pub fn add_favorite(&mut self, track: &Track) -> Result<(), FavoritesError> {
        self.add_favorite_at(track, Utc::now())
    }

    pub fn add_favorite_at(
        &mut self,
        track: &Track,
        now: DateTime<Utc>,
    ) -> Result<(), FavoritesError> {
        if self.backend.has(&track.id) {
            debug!("favorites: {:?} already saved", track.id);
            return Ok(());
        }
        info!("favorites: adding {:?} ({})", track.id, track.title);
        self.backend.add(FavoriteEntry::new(track.clone(), now))
    }

    /// Forget `id`.  Not being a favorite is not an error.
    pub fn remove_favorite(&mut self, id: &str) -> Result<(), FavoritesError> {
        if !self.backend.has(id) {
            return Ok(());
        }
        info!("favorites: removing {:?}", id);
        self.backend.remove(id)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.backend.has(id)
    }

    /// Flip membership of `track`.  Returns whether it is a favorite afterwards.
    pub fn toggle(&mut self, track: &Track) -> Result<bool, FavoritesError> {
        if self.is_favorite(&track.id) {
            self.remove_favorite(&track.id)?;
            Ok(false)
        } else {
            self.add_favorite(track)?;
            Ok(true)
        }
    }

    pub fn list(&self) -> Vec<FavoriteEntry> {
        self.backend.list()
    }
}
