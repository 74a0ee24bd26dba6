//! Track rows

use crate::{from_millis, to_millis, Result};
use cadence_core::types::{AlbumId, Track, TrackId};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

macro_rules! select_track {
    () => {
        "SELECT id, title, audio_url, release_date, is_active, album_id,
                created_at, updated_at
         FROM tracks"
    };
}

/// A track row ready to insert, with its release state already decided
#[derive(Debug, Clone)]
pub struct NewTrack<'a> {
    pub id: &'a TrackId,
    pub title: &'a str,
    pub audio_url: Option<&'a str>,
    pub release_date: DateTime<Utc>,
    pub is_active: bool,
    pub album_id: Option<&'a AlbumId>,
}

/// Column changes for one track; `None` leaves the column alone
///
/// `album_id: Some(None)` clears the album.
#[derive(Debug, Clone, Default)]
pub struct TrackChanges {
    pub title: Option<String>,
    pub audio_url: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub album_id: Option<Option<AlbumId>>,
}

fn track_from_row(row: &SqliteRow) -> Result<Track> {
    Ok(Track {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        audio_url: row.try_get("audio_url")?,
        release_date: from_millis("tracks.release_date", row.try_get("release_date")?)?,
        is_active: row.try_get("is_active")?,
        album_id: row.try_get("album_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn get_all(conn: &mut SqliteConnection) -> Result<Vec<Track>> {
    let rows = sqlx::query(concat!(select_track!(), " ORDER BY title"))
        .fetch_all(&mut *conn)
        .await?;

    rows.iter().map(track_from_row).collect()
}

/// Tracks visible to listeners
pub async fn get_active(conn: &mut SqliteConnection) -> Result<Vec<Track>> {
    let rows = sqlx::query(concat!(
        select_track!(),
        " WHERE is_active = 1 ORDER BY release_date DESC, title"
    ))
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(track_from_row).collect()
}

pub async fn get_by_id(conn: &mut SqliteConnection, id: &TrackId) -> Result<Option<Track>> {
    let row = sqlx::query(concat!(select_track!(), " WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(track_from_row).transpose()
}

pub async fn get_by_album(conn: &mut SqliteConnection, album_id: &AlbumId) -> Result<Vec<Track>> {
    let rows = sqlx::query(concat!(
        select_track!(),
        " WHERE album_id = ? ORDER BY created_at, title"
    ))
    .bind(album_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(track_from_row).collect()
}

pub async fn insert(conn: &mut SqliteConnection, track: &NewTrack<'_>) -> Result<()> {
    sqlx::query(
        "INSERT INTO tracks (id, title, audio_url, release_date, is_active, album_id)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(track.id)
    .bind(track.title)
    .bind(track.audio_url)
    .bind(to_millis(track.release_date))
    .bind(track.is_active)
    .bind(track.album_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Apply `changes` and bump `updated_at`
///
/// Returns the number of rows touched, so 0 means the track does not exist.
pub async fn update(
    conn: &mut SqliteConnection,
    id: &TrackId,
    changes: &TrackChanges,
) -> Result<u64> {
    let mut query_parts = Vec::new();

    if changes.title.is_some() {
        query_parts.push("title = ?");
    }
    if changes.audio_url.is_some() {
        query_parts.push("audio_url = ?");
    }
    if changes.release_date.is_some() {
        query_parts.push("release_date = ?");
    }
    if changes.is_active.is_some() {
        query_parts.push("is_active = ?");
    }
    if changes.album_id.is_some() {
        query_parts.push("album_id = ?");
    }

    query_parts.push("updated_at = datetime('now')");

    let query_str = format!("UPDATE tracks SET {} WHERE id = ?", query_parts.join(", "));

    let mut query = sqlx::query(&query_str);

    if let Some(title) = &changes.title {
        query = query.bind(title);
    }
    if let Some(audio_url) = &changes.audio_url {
        query = query.bind(audio_url);
    }
    if let Some(release_date) = changes.release_date {
        query = query.bind(to_millis(release_date));
    }
    if let Some(is_active) = changes.is_active {
        query = query.bind(is_active);
    }
    if let Some(album_id) = &changes.album_id {
        query = query.bind(album_id);
    }

    let result = query.bind(id).execute(&mut *conn).await?;

    Ok(result.rows_affected())
}

pub async fn delete(conn: &mut SqliteConnection, id: &TrackId) -> Result<u64> {
    let result = sqlx::query("DELETE FROM tracks WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// Live number of tracks attached to an album
pub async fn count_by_album(conn: &mut SqliteConnection, album_id: &AlbumId) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tracks WHERE album_id = ?")
        .bind(album_id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

/// Copy an album's release state onto all of its tracks
pub async fn sync_with_album(
    conn: &mut SqliteConnection,
    album_id: &AlbumId,
    release_date: DateTime<Utc>,
    is_active: bool,
) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE tracks
         SET release_date = ?, is_active = ?, updated_at = datetime('now')
         WHERE album_id = ?",
    )
    .bind(to_millis(release_date))
    .bind(is_active)
    .bind(album_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Turn every track of an album into a standalone single
pub async fn detach_from_album(conn: &mut SqliteConnection, album_id: &AlbumId) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE tracks
         SET album_id = NULL, updated_at = datetime('now')
         WHERE album_id = ?",
    )
    .bind(album_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Activate inactive standalone tracks released at or before `now`
pub async fn activate_released_standalone(
    conn: &mut SqliteConnection,
    now: DateTime<Utc>,
) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE tracks
         SET is_active = 1, updated_at = datetime('now')
         WHERE album_id IS NULL AND release_date <= ? AND is_active = 0",
    )
    .bind(to_millis(now))
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Activate inactive tracks whose album is released at or before `now`
///
/// Attached tracks follow the album's date, not their own, so the album's
/// `release_date` is the one compared.
pub async fn activate_attached_to_released(
    conn: &mut SqliteConnection,
    now: DateTime<Utc>,
) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE tracks
         SET is_active = 1, updated_at = datetime('now')
         WHERE is_active = 0
           AND album_id IN (SELECT id FROM albums WHERE release_date <= ?)",
    )
    .bind(to_millis(now))
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}
