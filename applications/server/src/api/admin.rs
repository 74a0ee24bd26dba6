/// Admin API routes
use crate::{error::Result, state::AppState};
use axum::{extract::State, Json};
use cadence_core::types::SweepReport;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub albums_corrected: u64,
}

/// POST /api/admin/release-sweep
/// Run one release sweep now; `null` if it failed (details are in the log)
pub async fn run_release_sweep(State(app_state): State<AppState>) -> Json<Option<SweepReport>> {
    Json(app_state.scheduler.run_once().await)
}

/// POST /api/admin/reconcile-counts
/// Recount every album's tracks and fix drifted counters
pub async fn reconcile_counts(
    State(app_state): State<AppState>,
) -> Result<Json<ReconcileResponse>> {
    let albums_corrected = app_state.catalog.reconcile_track_counts().await?;
    Ok(Json(ReconcileResponse { albums_corrected }))
}
