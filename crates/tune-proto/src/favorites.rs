//! Favorites persistence backends.
//!
//! A backend only has to honour set semantics keyed by track id; timestamps
//! and field backfills are applied by the caller before an entry gets here.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::model::FavoriteEntry;

#[derive(Debug, thiserror::Error)]
pub enum FavoritesError {
    #[error("favorites file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("favorites file could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Storage behind the favorites collection.
pub trait FavoritesBackend {
    /// Insert `entry`, replacing any entry with the same id in place.
    fn add(&mut self, entry: FavoriteEntry) -> Result<(), FavoritesError>;
    /// Remove the entry with `id`.  Removing a non-member succeeds.
    fn remove(&mut self, id: &str) -> Result<(), FavoritesError>;
    fn has(&self, id: &str) -> bool;
    /// Entries in insertion order.
    fn list(&self) -> Vec<FavoriteEntry>;
}

/// In-memory collection.  Lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryFavorites {
    entries: Vec<FavoriteEntry>,
}

impl MemoryFavorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = FavoriteEntry>) -> Self {
        let mut favorites = Self::new();
        for entry in entries {
            favorites.insert(entry);
        }
        favorites
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, entry: FavoriteEntry) {
        match self.entries.iter_mut().find(|e| e.id() == entry.id()) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    fn delete(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id() != id);
        self.entries.len() != before
    }
}

impl FavoritesBackend for MemoryFavorites {
    fn add(&mut self, entry: FavoriteEntry) -> Result<(), FavoritesError> {
        self.insert(entry);
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<(), FavoritesError> {
        self.delete(id);
        Ok(())
    }

    fn has(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id() == id)
    }

    fn list(&self) -> Vec<FavoriteEntry> {
        self.entries.clone()
    }
}

/// JSON file backend.  Every mutation is written through to disk.
pub struct JsonFavorites {
    entries: MemoryFavorites,
    path: PathBuf,
}

impl JsonFavorites {
    /// Open (or start) the collection at `path`.  A missing file is an empty
    /// collection; an unreadable one is logged and treated the same way.
    /// Entries that fail to decode are skipped, and the file is first copied
    /// to `<name>.bak` so a later save cannot lose them.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = MemoryFavorites::from_entries(Self::load(&path));
        debug!("favorites: loaded {} entries from {}", entries.len(), path.display());
        Self { entries, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Vec<FavoriteEntry> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("favorites: failed to read {}: {}", path.display(), e);
                return Vec::new();
            }
        };
        let raw = match serde_json::from_str::<Vec<serde_json::Value>>(&content) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("favorites: ignoring malformed {}: {}", path.display(), e);
                Self::keep_backup(path);
                return Vec::new();
            }
        };

        // Undecodable entries are dropped; the rest of the collection stays.
        let total = raw.len();
        let entries: Vec<FavoriteEntry> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| match serde_json::from_value::<FavoriteEntry>(value) {
                Ok(entry) => Some(entry.backfilled()),
                Err(e) => {
                    warn!("favorites: skipping entry {} in {}: {}", i, path.display(), e);
                    None
                }
            })
            .collect();
        if entries.len() != total {
            Self::keep_backup(path);
        }
        entries
    }

    /// Copy the file on disk to `<name>.bak` before the next save replaces it.
    fn keep_backup(path: &Path) {
        let backup = sibling(path, ".bak");
        match std::fs::copy(path, &backup) {
            Ok(_) => warn!("favorites: previous file kept at {}", backup.display()),
            Err(e) => warn!("favorites: could not back up {}: {}", path.display(), e),
        }
    }

    fn save(&self) -> Result<(), FavoritesError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries.entries)?;
        let tmp = sibling(&self.path, ".tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// `path` with `suffix` appended to its file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

impl FavoritesBackend for JsonFavorites {
    fn add(&mut self, entry: FavoriteEntry) -> Result<(), FavoritesError> {
        self.entries.insert(entry);
        self.save()
    }

    fn remove(&mut self, id: &str) -> Result<(), FavoritesError> {
        if self.entries.delete(id) {
            self.save()?;
        }
        Ok(())
    }

    fn has(&self, id: &str) -> bool {
        self.entries.has(id)
    }

    fn list(&self) -> Vec<FavoriteEntry> {
        self.entries.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Track;
    use chrono::{TimeZone, Utc};

    fn entry(id: &str, title: &str) -> FavoriteEntry {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        FavoriteEntry::new(
            Track {
                id: id.into(),
                title: title.into(),
                ..Track::default()
            },
            now,
        )
    }

    #[test]
    fn memory_backend_replaces_instead_of_duplicating() {
        let mut favorites = MemoryFavorites::new();
        favorites.add(entry("a", "First")).unwrap();
        favorites.add(entry("b", "Second")).unwrap();
        favorites.add(entry("a", "First (remaster)")).unwrap();

        let list = favorites.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id(), "a");
        assert_eq!(list[0].track().title, "First (remaster)");
        assert_eq!(list[1].id(), "b");
    }

    #[test]
    fn removing_a_non_member_is_fine() {
        let mut favorites = MemoryFavorites::new();
        favorites.remove("missing").unwrap();
        assert!(!favorites.has("missing"));
    }
}
