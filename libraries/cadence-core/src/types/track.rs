//! Track types
//!
//! A track either belongs to one album or stands alone as a single. Attached
//! tracks carry their album's release date and activation flag.

use super::{AlbumId, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub audio_url: Option<String>,
    pub release_date: DateTime<Utc>,
    pub is_active: bool,
    pub album_id: Option<AlbumId>,
    pub created_at: String,
    pub updated_at: String,
}

impl Track {
    /// A standalone track has no album and follows its own release date
    pub fn is_standalone(&self) -> bool {
        self.album_id.is_none()
    }
}

/// Data for creating a new track
///
/// `release_date` is only used for standalone tracks; an attached track
/// inherits the album's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTrack {
    pub title: String,
    #[serde(default)]
    pub audio_url: Option<String>,
    pub release_date: DateTime<Utc>,
    #[serde(default)]
    pub album_id: Option<AlbumId>,
}

/// Data for updating a track (all fields optional)
///
/// `album_id` is tri-state:
/// - `None`: keep the current album
/// - `Some(None)`: detach, the track becomes a standalone single
/// - `Some(Some(id))`: attach to (or move to) album `id`
///
/// In JSON a missing `album_id` key keeps the album and `null` detaches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTrack {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub album_id: Option<Option<AlbumId>>,
}

impl UpdateTrack {
    /// Update that moves the track onto `album_id`
    pub fn move_to(album_id: AlbumId) -> Self {
        Self {
            album_id: Some(Some(album_id)),
            ..Default::default()
        }
    }

    /// Update that detaches the track from its album
    pub fn detach() -> Self {
        Self {
            album_id: Some(None),
            ..Default::default()
        }
    }
}

// A present key (including `null`) becomes `Some`, a missing key falls back to `default`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
