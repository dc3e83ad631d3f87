use chrono::{TimeZone, Utc};
use tune_proto::favorites::{FavoritesBackend, JsonFavorites};
use tune_proto::model::{ArtistRef, FavoriteEntry, Track};

fn track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: format!("Track {id}"),
        display_name: format!("Track {id}"),
        artist: ArtistRef::named("Nova"),
        ..Track::default()
    }
}

#[test]
fn entries_survive_a_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("favorites.json");
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();

    {
        let mut favorites = JsonFavorites::open(&path);
        favorites.add(FavoriteEntry::new(track("r1"), now)).unwrap();
        favorites.add(FavoriteEntry::new(track("r2"), now)).unwrap();
        favorites.remove("r2").unwrap();
    }

    let reopened = JsonFavorites::open(&path);
    let list = reopened.list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id(), "r1");
    assert_eq!(list[0].added_at(), now);
    assert_eq!(list[0].release_date(), "2026-10-16T08:00:00.000Z");
    assert_eq!(list[0].track().artist.name, "Nova");
}

#[test]
fn file_uses_the_front_end_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.json");
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();

    let mut favorites = JsonFavorites::open(&path);
    favorites.add(FavoriteEntry::new(track("r1"), now)).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let first = &raw[0];
    assert_eq!(first["id"], "r1");
    assert_eq!(first["name"], "Track r1");
    assert_eq!(first["artist"]["name"], "Nova");
    assert_eq!(first["addedAt"], "2026-10-16T08:00:00.000Z");
    assert_eq!(first["release_date"], "2026-10-16T08:00:00.000Z");
    assert_eq!(first["rank"], 0);
}

#[test]
fn legacy_entries_are_normalized_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.json");
    std::fs::write(
        &path,
        r#"[{"id": 7, "title": "Old", "artist": "Someone", "addedAt": "2025-01-02T03:04:05.000Z"}]"#,
    )
    .unwrap();

    let favorites = JsonFavorites::open(&path);
    assert!(favorites.has("7"));
    let entry = &favorites.list()[0];
    assert_eq!(entry.track().artist, ArtistRef::named("Someone"));
    assert_eq!(entry.track().duration, 0);
    assert_eq!(entry.release_date(), "2025-01-02T03:04:05.000Z");
}

#[test]
fn malformed_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.json");
    std::fs::write(&path, "not json").unwrap();

    let favorites = JsonFavorites::open(&path);
    assert!(favorites.list().is_empty());
    let backup = dir.path().join("favorites.json.bak");
    assert_eq!(std::fs::read_to_string(backup).unwrap(), "not json");
}

#[test]
fn one_bad_entry_does_not_cost_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.json");
    let original = r#"[
        {"id": "keep", "title": "Kept", "artist": "Nova", "addedAt": "2025-01-02T03:04:05.000Z"},
        {"title": "No id", "addedAt": "2025-01-02T03:04:05.000Z"}
    ]"#;
    std::fs::write(&path, original).unwrap();

    let mut favorites = JsonFavorites::open(&path);
    assert!(favorites.has("keep"));
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();
    favorites.add(FavoriteEntry::new(track("new"), now)).unwrap();

    let reopened = JsonFavorites::open(&path);
    let ids: Vec<_> = reopened.list().iter().map(|e| e.id().to_string()).collect();
    assert_eq!(ids, ["keep", "new"]);

    let backup = dir.path().join("favorites.json.bak");
    assert_eq!(std::fs::read_to_string(backup).unwrap(), original);
    assert!(!dir.path().join("favorites.json.tmp").exists());
}
