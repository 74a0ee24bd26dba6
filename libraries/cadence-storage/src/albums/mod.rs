//! Album rows
//!
//! Plain row access. Activation and track counts are decided by the catalog
//! and the aggregates module; these functions only write what they are given.

use crate::{from_millis, to_millis, Result};
use cadence_core::types::{Album, AlbumId, CreateAlbum};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

macro_rules! select_album {
    () => {
        "SELECT id, title, cover_url, release_date, is_active, total_tracks,
                created_at, updated_at
         FROM albums"
    };
}

/// Column changes for one album; `None` leaves the column alone
#[derive(Debug, Clone, Default)]
pub struct AlbumChanges {
    pub title: Option<String>,
    pub cover_url: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

impl AlbumChanges {
    /// Whether attached tracks need to follow this change
    pub fn touches_release(&self) -> bool {
        self.release_date.is_some() || self.is_active.is_some()
    }
}

fn album_from_row(row: &SqliteRow) -> Result<Album> {
    Ok(Album {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        cover_url: row.try_get("cover_url")?,
        release_date: from_millis("albums.release_date", row.try_get("release_date")?)?,
        is_active: row.try_get("is_active")?,
        total_tracks: row.try_get("total_tracks")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn get_all(conn: &mut SqliteConnection) -> Result<Vec<Album>> {
    let rows = sqlx::query(concat!(select_album!(), " ORDER BY title"))
        .fetch_all(&mut *conn)
        .await?;

    rows.iter().map(album_from_row).collect()
}

/// Albums visible to listeners, newest release first
pub async fn get_active(conn: &mut SqliteConnection) -> Result<Vec<Album>> {
    let rows = sqlx::query(concat!(
        select_album!(),
        " WHERE is_active = 1 ORDER BY release_date DESC, title"
    ))
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(album_from_row).collect()
}

pub async fn get_by_id(conn: &mut SqliteConnection, id: &AlbumId) -> Result<Option<Album>> {
    let row = sqlx::query(concat!(select_album!(), " WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(album_from_row).transpose()
}

/// Insert a new album with no tracks
pub async fn insert(
    conn: &mut SqliteConnection,
    id: &AlbumId,
    album: &CreateAlbum,
    release_date: DateTime<Utc>,
    is_active: bool,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO albums (id, title, cover_url, release_date, is_active, total_tracks)
         VALUES (?, ?, ?, ?, ?, 0)",
    )
    .bind(id)
    .bind(&album.title)
    .bind(&album.cover_url)
    .bind(to_millis(release_date))
    .bind(is_active)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Apply `changes` and bump `updated_at`
///
/// Returns the number of rows touched, so 0 means the album does not exist.
pub async fn update(
    conn: &mut SqliteConnection,
    id: &AlbumId,
    changes: &AlbumChanges,
) -> Result<u64> {
    let mut query_parts = Vec::new();

    if changes.title.is_some() {
        query_parts.push("title = ?");
    }
    if changes.cover_url.is_some() {
        query_parts.push("cover_url = ?");
    }
    if changes.release_date.is_some() {
        query_parts.push("release_date = ?");
    }
    if changes.is_active.is_some() {
        query_parts.push("is_active = ?");
    }

    query_parts.push("updated_at = datetime('now')");

    let query_str = format!("UPDATE albums SET {} WHERE id = ?", query_parts.join(", "));

    let mut query = sqlx::query(&query_str);

    if let Some(title) = &changes.title {
        query = query.bind(title);
    }
    if let Some(cover_url) = &changes.cover_url {
        query = query.bind(cover_url);
    }
    if let Some(release_date) = changes.release_date {
        query = query.bind(to_millis(release_date));
    }
    if let Some(is_active) = changes.is_active {
        query = query.bind(is_active);
    }

    let result = query.bind(id).execute(&mut *conn).await?;

    Ok(result.rows_affected())
}

pub async fn delete(conn: &mut SqliteConnection, id: &AlbumId) -> Result<u64> {
    let result = sqlx::query("DELETE FROM albums WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// Overwrite the denormalized track counter
pub async fn set_total_tracks(
    conn: &mut SqliteConnection,
    id: &AlbumId,
    total_tracks: i64,
) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE albums
         SET total_tracks = ?, updated_at = datetime('now')
         WHERE id = ?",
    )
    .bind(total_tracks)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Activate every inactive album released at or before `now`
pub async fn activate_released(conn: &mut SqliteConnection, now: DateTime<Utc>) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE albums
         SET is_active = 1, updated_at = datetime('now')
         WHERE release_date <= ? AND is_active = 0",
    )
    .bind(to_millis(now))
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}
