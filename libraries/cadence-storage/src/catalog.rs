use crate::albums::{self, AlbumChanges};
use crate::tracks::{self, NewTrack, TrackChanges};
use crate::{aggregates, begin_write, release, StorageError};
use async_trait::async_trait;
use cadence_core::{
    error::Result,
    storage::{CatalogStore, ReleaseSweeper},
    types::*,
    CadenceError, Clock,
};
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Catalog backed by `SQLite`
///
/// Every album and track mutation in the system goes through here. Each call
/// runs the write and its side effects (activation, cascade to tracks, track
/// counters) in one transaction, in that order, so either all of it commits
/// or none of it does.
pub struct LocalCatalog {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl LocalCatalog {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// Release dates are stored with millisecond precision; decide activation on
// the value that is actually stored.
fn stored_precision(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(3)
}

fn require_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(CadenceError::invalid_input("title must not be empty"));
    }
    Ok(())
}

async fn fetch_album(conn: &mut SqliteConnection, id: &AlbumId) -> Result<Album> {
    albums::get_by_id(conn, id)
        .await?
        .ok_or_else(|| CadenceError::AlbumNotFound(id.clone()))
}

async fn fetch_track(conn: &mut SqliteConnection, id: &TrackId) -> Result<Track> {
    tracks::get_by_id(conn, id)
        .await?
        .ok_or_else(|| CadenceError::TrackNotFound(id.clone()))
}

fn recount_failed(err: StorageError) -> CadenceError {
    error!(error = %err, "Failed to recompute album track count");
    err.into()
}

async fn recount(conn: &mut SqliteConnection, album_id: &AlbumId) -> Result<()> {
    let total_tracks = aggregates::recompute_total_tracks(conn, album_id)
        .await
        .map_err(recount_failed)?;
    debug!(%album_id, total_tracks, "Album track count recomputed");
    Ok(())
}

#[async_trait]
impl CatalogStore for LocalCatalog {
    // Albums
    async fn create_album(&self, album: CreateAlbum) -> Result<Album> {
        require_title(&album.title)?;

        let id = AlbumId::generate();
        let release_date = stored_precision(album.release_date);
        let is_active = is_released(release_date, self.clock.now());

        let mut tx = begin_write(&self.pool).await?;
        albums::insert(&mut tx, &id, &album, release_date, is_active).await?;
        let created = fetch_album(&mut tx, &id).await?;
        tx.commit().await?;

        debug!(album_id = %id, is_active, "Album created");
        Ok(created)
    }

    async fn update_album(&self, id: &AlbumId, album: UpdateAlbum) -> Result<Album> {
        if let Some(title) = &album.title {
            require_title(title)?;
        }

        let release_date = album.release_date.map(stored_precision);
        let is_active = match release_date {
            Some(date) => {
                if album.is_active.is_some() {
                    warn!(album_id = %id, "Ignoring is_active, derived from the new release date");
                }
                Some(is_released(date, self.clock.now()))
            }
            None => album.is_active,
        };

        let changes = AlbumChanges {
            title: album.title,
            cover_url: album.cover_url,
            release_date,
            is_active,
        };

        let mut tx = begin_write(&self.pool).await?;

        // Nothing would ever deactivate an unreleased album again
        if changes.release_date.is_none() && changes.is_active == Some(true) {
            let current = fetch_album(&mut tx, id).await?;
            if !is_released(current.release_date, self.clock.now()) {
                return Err(CadenceError::invalid_input(
                    "cannot activate an album before its release date",
                ));
            }
        }

        if albums::update(&mut tx, id, &changes).await? == 0 {
            return Err(CadenceError::AlbumNotFound(id.clone()));
        }
        let updated = fetch_album(&mut tx, id).await?;

        // Attached tracks carry the album's release state
        if changes.touches_release() {
            let synced =
                tracks::sync_with_album(&mut tx, id, updated.release_date, updated.is_active)
                    .await?;
            debug!(album_id = %id, synced, is_active = updated.is_active, "Album tracks synced");
        }

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_album(&self, id: &AlbumId) -> Result<()> {
        let mut tx = begin_write(&self.pool).await?;

        let detached = tracks::detach_from_album(&mut tx, id).await?;
        if albums::delete(&mut tx, id).await? == 0 {
            return Err(CadenceError::AlbumNotFound(id.clone()));
        }

        tx.commit().await?;

        info!(album_id = %id, detached, "Album deleted");
        Ok(())
    }

    async fn get_album(&self, id: &AlbumId) -> Result<Option<Album>> {
        let mut conn = self.pool.acquire().await?;
        Ok(albums::get_by_id(&mut conn, id).await?)
    }

    async fn get_all_albums(&self) -> Result<Vec<Album>> {
        let mut conn = self.pool.acquire().await?;
        Ok(albums::get_all(&mut conn).await?)
    }

    async fn get_active_albums(&self) -> Result<Vec<Album>> {
        let mut conn = self.pool.acquire().await?;
        Ok(albums::get_active(&mut conn).await?)
    }

    // Tracks
    async fn create_track(&self, track: CreateTrack) -> Result<Track> {
        require_title(&track.title)?;

        let id = TrackId::generate();
        let mut tx = begin_write(&self.pool).await?;

        let (release_date, is_active) = match &track.album_id {
            Some(album_id) => {
                let album = fetch_album(&mut tx, album_id).await?;
                (album.release_date, album.is_active)
            }
            None => {
                let release_date = stored_precision(track.release_date);
                (release_date, is_released(release_date, self.clock.now()))
            }
        };

        tracks::insert(
            &mut tx,
            &NewTrack {
                id: &id,
                title: &track.title,
                audio_url: track.audio_url.as_deref(),
                release_date,
                is_active,
                album_id: track.album_id.as_ref(),
            },
        )
        .await?;

        if let Some(album_id) = &track.album_id {
            recount(&mut tx, album_id).await?;
        }

        let created = fetch_track(&mut tx, &id).await?;
        tx.commit().await?;

        debug!(track_id = %id, is_active, album_id = ?created.album_id, "Track created");
        Ok(created)
    }

    async fn update_track(&self, id: &TrackId, track: UpdateTrack) -> Result<Track> {
        if let Some(title) = &track.title {
            require_title(title)?;
        }

        let mut tx = begin_write(&self.pool).await?;
        let existing = fetch_track(&mut tx, id).await?;

        let target = match &track.album_id {
            Some(next) => next.clone(),
            None => existing.album_id.clone(),
        };
        let reassigned = target != existing.album_id;

        let mut changes = TrackChanges {
            title: track.title,
            audio_url: track.audio_url,
            album_id: reassigned.then(|| target.clone()),
            ..Default::default()
        };

        match &target {
            Some(album_id) if reassigned => {
                let album = fetch_album(&mut tx, album_id).await?;
                changes.release_date = Some(album.release_date);
                changes.is_active = Some(album.is_active);
            }
            Some(album_id) => {
                if track.release_date.is_some() {
                    warn!(track_id = %id, %album_id, "Ignoring release date of a track attached to an album");
                }
            }
            None => {
                // Standalone from here on: its own date decides
                if reassigned || track.release_date.is_some() {
                    let release_date = track
                        .release_date
                        .map_or(existing.release_date, stored_precision);
                    changes.release_date = Some(release_date);
                    changes.is_active = Some(is_released(release_date, self.clock.now()));
                }
            }
        }

        tracks::update(&mut tx, id, &changes).await?;

        if reassigned {
            aggregates::recompute_after_move(&mut tx, existing.album_id.as_ref(), target.as_ref())
                .await
                .map_err(recount_failed)?;
            debug!(
                track_id = %id,
                from = ?existing.album_id,
                to = ?target,
                "Track moved, album track counts recomputed"
            );
        }

        let updated = fetch_track(&mut tx, id).await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_track(&self, id: &TrackId) -> Result<()> {
        let mut tx = begin_write(&self.pool).await?;

        let existing = fetch_track(&mut tx, id).await?;
        tracks::delete(&mut tx, id).await?;

        if let Some(album_id) = &existing.album_id {
            recount(&mut tx, album_id).await?;
        }

        tx.commit().await?;

        debug!(track_id = %id, "Track deleted");
        Ok(())
    }

    async fn get_track(&self, id: &TrackId) -> Result<Option<Track>> {
        let mut conn = self.pool.acquire().await?;
        Ok(tracks::get_by_id(&mut conn, id).await?)
    }

    async fn get_all_tracks(&self) -> Result<Vec<Track>> {
        let mut conn = self.pool.acquire().await?;
        Ok(tracks::get_all(&mut conn).await?)
    }

    async fn get_tracks_by_album(&self, album_id: &AlbumId) -> Result<Vec<Track>> {
        let mut conn = self.pool.acquire().await?;
        Ok(tracks::get_by_album(&mut conn, album_id).await?)
    }

    async fn get_active_tracks(&self) -> Result<Vec<Track>> {
        let mut conn = self.pool.acquire().await?;
        Ok(tracks::get_active(&mut conn).await?)
    }

    // Maintenance
    async fn reconcile_track_counts(&self) -> Result<u64> {
        let mut conn = self.pool.acquire().await?;
        let corrected = aggregates::reconcile_all(&mut conn).await?;

        if corrected > 0 {
            warn!(corrected, "Corrected drifted album track counts");
        } else {
            debug!("Album track counts are consistent");
        }

        Ok(corrected)
    }
}

#[async_trait]
impl ReleaseSweeper for LocalCatalog {
    async fn run_release_sweep(&self) -> Result<SweepReport> {
        Ok(release::sweep(&self.pool, self.clock.now()).await?)
    }
}
