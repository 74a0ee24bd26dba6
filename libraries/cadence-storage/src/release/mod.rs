//! Release sweep
//!
//! Activates everything whose release date has passed. The whole sweep is
//! three predicate updates in one transaction, compared against a single
//! `now`, so it is idempotent and safe to overlap with sweeps from other
//! processes.

use crate::{albums, begin_write, tracks, Result};
use cadence_core::types::SweepReport;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// Run one sweep against `now`
pub async fn sweep(pool: &SqlitePool, now: DateTime<Utc>) -> Result<SweepReport> {
    let mut tx = begin_write(pool).await?;

    let albums_activated = albums::activate_released(&mut tx, now).await?;
    let standalone_tracks_activated = tracks::activate_released_standalone(&mut tx, now).await?;
    let attached_tracks_synced = tracks::activate_attached_to_released(&mut tx, now).await?;

    tx.commit().await?;

    let report = SweepReport {
        swept_at: now,
        albums_activated,
        standalone_tracks_activated,
        attached_tracks_synced,
    };

    if report.changed_anything() {
        tracing::info!(
            albums = albums_activated,
            standalone_tracks = standalone_tracks_activated,
            attached_tracks = attached_tracks_synced,
            "Release sweep activated content"
        );
    } else {
        tracing::debug!("Release sweep found nothing to activate");
    }

    Ok(report)
}
