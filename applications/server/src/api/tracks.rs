/// Tracks API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use cadence_core::types::{CreateTrack, Track, TrackId, UpdateTrack};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct TrackQuery {
    /// Only tracks visible to listeners
    #[serde(default)]
    pub active: bool,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

#[derive(Debug, Serialize)]
pub struct TracksResponse {
    pub tracks: Vec<Track>,
    pub total: usize,
}

/// GET /api/tracks
pub async fn list_tracks(
    State(app_state): State<AppState>,
    Query(query): Query<TrackQuery>,
) -> Result<Json<TracksResponse>> {
    let tracks = if query.active {
        app_state.catalog.get_active_tracks().await?
    } else {
        app_state.catalog.get_all_tracks().await?
    };

    // Simple pagination
    let total = tracks.len();
    let paginated = tracks
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .collect();

    Ok(Json(TracksResponse {
        tracks: paginated,
        total,
    }))
}

/// POST /api/tracks
/// Tracks with an `album_id` take their release state from that album
pub async fn create_track(
    State(app_state): State<AppState>,
    Json(req): Json<CreateTrack>,
) -> Result<(StatusCode, Json<Track>)> {
    let track = app_state.catalog.create_track(req).await?;
    Ok((StatusCode::CREATED, Json(track)))
}

/// GET /api/tracks/:id
pub async fn get_track(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<Track>> {
    let track = app_state
        .catalog
        .get_track(&TrackId::new(id))
        .await?
        .ok_or_else(|| ServerError::NotFound("Track not found".to_string()))?;
    Ok(Json(track))
}

/// PUT /api/tracks/:id
/// `"album_id": null` detaches the track, a missing key keeps its album
pub async fn update_track(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    Json(req): Json<UpdateTrack>,
) -> Result<Json<Track>> {
    let track = app_state
        .catalog
        .update_track(&TrackId::new(id), req)
        .await?;
    Ok(Json(track))
}

/// DELETE /api/tracks/:id
pub async fn delete_track(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<StatusCode> {
    app_state.catalog.delete_track(&TrackId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
