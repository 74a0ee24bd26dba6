//! Denormalized album counters
//!
//! `albums.total_tracks` is always rewritten from a `COUNT(*)` over the
//! tracks table instead of being incremented. Running a recompute twice, or
//! after a missed one, converges on the right number.

use crate::{albums, tracks, Result};
use cadence_core::types::AlbumId;
use sqlx::SqliteConnection;

/// Recount an album's tracks and store the result
///
/// Returns the count. An album that no longer exists is left alone.
pub async fn recompute_total_tracks(conn: &mut SqliteConnection, album_id: &AlbumId) -> Result<i64> {
    let total_tracks = tracks::count_by_album(conn, album_id).await?;

    if albums::set_total_tracks(conn, album_id, total_tracks).await? == 0 {
        tracing::debug!(%album_id, "Album no longer exists, track count not stored");
    }

    Ok(total_tracks)
}

/// Recount both ends of a track move
///
/// Nothing happens when the track stayed on the same album.
pub async fn recompute_after_move(
    conn: &mut SqliteConnection,
    from: Option<&AlbumId>,
    to: Option<&AlbumId>,
) -> Result<()> {
    if from == to {
        return Ok(());
    }

    if let Some(old_album) = from {
        recompute_total_tracks(conn, old_album).await?;
    }
    if let Some(new_album) = to {
        recompute_total_tracks(conn, new_album).await?;
    }

    Ok(())
}

/// Fix every album whose stored counter differs from its live count
///
/// Returns how many albums were corrected.
pub async fn reconcile_all(conn: &mut SqliteConnection) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE albums
         SET total_tracks = (SELECT COUNT(*) FROM tracks WHERE tracks.album_id = albums.id),
             updated_at = datetime('now')
         WHERE total_tracks <> (SELECT COUNT(*) FROM tracks WHERE tracks.album_id = albums.id)",
    )
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}
