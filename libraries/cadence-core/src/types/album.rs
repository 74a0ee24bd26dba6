//! Album types

use super::AlbumId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An album
///
/// `is_active` and `total_tracks` are owned by the catalog: they are derived
/// from the release date and from the tracks attached to the album, and any
/// value a caller tries to write is recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    pub cover_url: Option<String>,
    pub release_date: DateTime<Utc>,
    pub is_active: bool,
    pub total_tracks: i64, // Denormalized
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new album
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlbum {
    pub title: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    pub release_date: DateTime<Utc>,
}

/// Data for updating an album (all fields optional)
///
/// When `release_date` is present the activation flag is recomputed from it
/// and `is_active` is ignored. On its own, `is_active: false` hides a released
/// album until the next sweep, and `is_active: true` is rejected for an album
/// whose release date is still ahead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAlbum {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}
