//! Release activation types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether content scheduled for `release_date` is visible at `now`
pub fn is_released(release_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    release_date <= now
}

/// Outcome of one release sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// The single instant every row was compared against
    pub swept_at: DateTime<Utc>,
    pub albums_activated: u64,
    pub standalone_tracks_activated: u64,
    /// Attached tracks brought in line with albums activated by this sweep
    pub attached_tracks_synced: u64,
}

impl SweepReport {
    /// Report for a sweep that found nothing to do
    pub fn empty(swept_at: DateTime<Utc>) -> Self {
        Self {
            swept_at,
            albums_activated: 0,
            standalone_tracks_activated: 0,
            attached_tracks_synced: 0,
        }
    }

    /// Whether the sweep changed any row
    pub fn changed_anything(&self) -> bool {
        self.albums_activated > 0
            || self.standalone_tracks_activated > 0
            || self.attached_tracks_synced > 0
    }
}
