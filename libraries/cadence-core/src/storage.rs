//! Storage traits for the catalog

use crate::error::Result;
use crate::types::{
    Album, AlbumId, CreateAlbum, CreateTrack, SweepReport, Track, TrackId, UpdateAlbum,
    UpdateTrack,
};
use async_trait::async_trait;

/// Catalog storage
///
/// Every create, update and delete of an album or track goes through this
/// trait. Implementations own `is_active` and `total_tracks`: activation is
/// decided from the release date (or inherited from the album), and the track
/// counter is recomputed after each change of membership, before the call
/// returns.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // ========================================================================
    // Albums
    // ========================================================================

    /// Create an album; it is active immediately if its release date has passed
    async fn create_album(&self, album: CreateAlbum) -> Result<Album>;

    /// Update an album and carry release changes over to its tracks
    async fn update_album(&self, id: &AlbumId, album: UpdateAlbum) -> Result<Album>;

    /// Delete an album; its tracks become standalone singles
    async fn delete_album(&self, id: &AlbumId) -> Result<()>;

    /// Get album by ID
    async fn get_album(&self, id: &AlbumId) -> Result<Option<Album>>;

    /// Get all albums
    async fn get_all_albums(&self) -> Result<Vec<Album>>;

    /// Get albums visible to listeners
    async fn get_active_albums(&self) -> Result<Vec<Album>>;

    // ========================================================================
    // Tracks
    // ========================================================================

    /// Create a track, inheriting release state from its album if it has one
    async fn create_track(&self, track: CreateTrack) -> Result<Track>;

    /// Update a track, re-inheriting release state if it moves to another album
    async fn update_track(&self, id: &TrackId, track: UpdateTrack) -> Result<Track>;

    /// Delete a track
    async fn delete_track(&self, id: &TrackId) -> Result<()>;

    /// Get track by ID
    async fn get_track(&self, id: &TrackId) -> Result<Option<Track>>;

    /// Get all tracks
    async fn get_all_tracks(&self) -> Result<Vec<Track>>;

    /// Get tracks attached to an album
    async fn get_tracks_by_album(&self, album_id: &AlbumId) -> Result<Vec<Track>>;

    /// Get tracks visible to listeners
    async fn get_active_tracks(&self) -> Result<Vec<Track>>;

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Recount every album's tracks and fix drifted counters
    ///
    /// Returns the number of albums whose counter was corrected.
    async fn reconcile_track_counts(&self) -> Result<u64>;
}

/// The periodic release job
///
/// A sweep activates everything whose release date has passed. It is a
/// predicate update, so running it again (or concurrently from another
/// process) is always safe.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait ReleaseSweeper: Send + Sync {
    /// Run one sweep against the current time
    async fn run_release_sweep(&self) -> Result<SweepReport>;
}
