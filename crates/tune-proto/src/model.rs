//! Catalog data model shared by the search core and its front-ends.
//!
//! Wire shapes follow the catalog API (camelCase result rows, ids that may be
//! strings or integers). Everything is normalized on the way in so the rest
//! of the workspace never has to narrow a polymorphic field again.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Display fallback for a track whose artist is missing or blank.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Display fallback for a search row whose artist is missing or blank.
pub const UNKNOWN: &str = "Unknown";

/// Artist id used when the source only gave us a bare artist name.
pub const ANONYMOUS_ARTIST_ID: &str = "0";

const FULL_VERSION_SEARCH_URL: &str = "https://www.youtube.com/results";

// ── Search results ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistSummary {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingSummary {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

impl RecordingSummary {
    /// Artist name for a result row, `"Unknown"` when missing or blank.
    pub fn artist_label(&self) -> &str {
        non_blank(self.artist.as_deref()).unwrap_or(UNKNOWN)
    }
}

/// Raw body of a catalog search call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub artists: Vec<ArtistSummary>,
    #[serde(default)]
    pub recordings: Vec<RecordingSummary>,
}

/// A settled search, tagged with the query that produced it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResultSet {
    pub query: String,
    pub artists: Vec<ArtistSummary>,
    pub recordings: Vec<RecordingSummary>,
}

impl SearchResultSet {
    pub fn from_response(query: impl Into<String>, response: SearchResponse) -> Self {
        Self {
            query: query.into(),
            artists: response.artists,
            recordings: response.recordings,
        }
    }

    /// A settled set with nothing in it.  Also what a failed fetch turns into.
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty() && self.recordings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.artists.len() + self.recordings.len()
    }
}

// ── Tracks ────────────────────────────────────────────────────────────────────

/// Normalized artist reference carried by a [`Track`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

impl ArtistRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: ANONYMOUS_ARTIST_ID.to_string(),
            name: name.into(),
        }
    }
}

/// The artist field as it arrives on the wire: sometimes a bare name,
/// sometimes an object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ArtistField {
    Named(String),
    Detailed {
        #[serde(default, deserialize_with = "de_opt_id")]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl ArtistField {
    pub fn normalize(self) -> ArtistRef {
        match self {
            Self::Named(name) => ArtistRef::named(name),
            Self::Detailed { id, name } => ArtistRef {
                id: id.unwrap_or_else(|| ANONYMOUS_ARTIST_ID.to_string()),
                name: name.unwrap_or_default(),
            },
        }
    }
}

impl From<ArtistField> for ArtistRef {
    fn from(field: ArtistField) -> Self {
        field.normalize()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlbumSummary {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

/// The unit that gets previewed and favorited.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Track {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "name", default)]
    pub display_name: String,
    #[serde(default, deserialize_with = "de_artist")]
    pub artist: ArtistRef,
    #[serde(default)]
    pub link: String,
    #[serde(default, deserialize_with = "de_or_zero")]
    pub duration: u32,
    #[serde(default, deserialize_with = "de_or_zero")]
    pub rank: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<AlbumSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl Track {
    /// Build a previewable track from a search row.
    ///
    /// Duration and rank default to 0.  The release date is carried over when
    /// the row has one and is otherwise left absent.
    pub fn from_recording(recording: &RecordingSummary) -> Self {
        let link = recording.link.clone().unwrap_or_default();
        Self {
            id: recording.id.clone(),
            title: recording.title.clone(),
            display_name: recording.title.clone(),
            artist: ArtistRef::named(recording.artist_label()),
            link: link.clone(),
            duration: recording.duration.unwrap_or(0),
            rank: recording.rank.unwrap_or(0),
            cover: recording.cover.clone(),
            album: Some(AlbumSummary {
                id: "0".to_string(),
                title: recording.title.clone(),
                link,
                cover: recording.cover.clone().unwrap_or_default(),
                release_date: recording.release_date.clone(),
            }),
            preview: recording.preview.clone(),
            full: recording.full.clone(),
            release_date: recording.release_date.clone(),
        }
    }

    /// Artist name for display, `"Unknown Artist"` when missing or blank.
    pub fn artist_name(&self) -> &str {
        non_blank(Some(self.artist.name.as_str())).unwrap_or(UNKNOWN_ARTIST)
    }

    /// Audio to hand to the player: the full version when there is one.
    pub fn playable_url(&self) -> Option<&str> {
        self.full.as_deref().or(self.preview.as_deref())
    }

    /// Video-site search link for listening to the whole track.
    pub fn full_version_link(&self) -> Option<String> {
        let terms = format!("{} {}", self.title, self.artist_name());
        reqwest::Url::parse_with_params(FULL_VERSION_SEARCH_URL, &[("search_query", terms)])
            .ok()
            .map(|url| url.to_string())
    }
}

// ── Favorites ─────────────────────────────────────────────────────────────────

/// A saved track.  Construction backfills every field that must never be
/// missing once a track is in the favorites collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    #[serde(flatten)]
    track: Track,
    #[serde(rename = "addedAt", with = "iso_millis")]
    added_at: DateTime<Utc>,
}

impl FavoriteEntry {
    pub fn new(mut track: Track, now: DateTime<Utc>) -> Self {
        if track.release_date.is_none() {
            track.release_date = Some(iso_timestamp(now));
        }
        Self {
            track,
            added_at: now,
        }
    }

    /// Re-apply the backfill to an entry read from storage.
    pub fn backfilled(self) -> Self {
        Self::new(self.track, self.added_at)
    }

    pub fn id(&self) -> &str {
        &self.track.id
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    pub fn release_date(&self) -> &str {
        self.track.release_date.as_deref().unwrap_or_default()
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2026-10-16T09:30:00.000Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::iso_timestamp(*at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

// ── Serde helpers ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn de_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    RawId::deserialize(d).map(String::from)
}

fn de_opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(d)?.map(String::from))
}

fn de_artist<'de, D: Deserializer<'de>>(d: D) -> Result<ArtistRef, D::Error> {
    Ok(Option::<ArtistField>::deserialize(d)?
        .map(ArtistField::normalize)
        .unwrap_or_default())
}

fn de_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(d)?.unwrap_or(0))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
