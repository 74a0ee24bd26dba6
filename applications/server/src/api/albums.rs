/// Albums API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use cadence_core::types::{Album, AlbumId, CreateAlbum, Track, UpdateAlbum};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Only albums visible to listeners
    #[serde(default)]
    pub active: bool,
}

/// GET /api/albums
pub async fn list_albums(
    State(app_state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Album>>> {
    let albums = if query.active {
        app_state.catalog.get_active_albums().await?
    } else {
        app_state.catalog.get_all_albums().await?
    };
    Ok(Json(albums))
}

/// POST /api/albums
pub async fn create_album(
    State(app_state): State<AppState>,
    Json(req): Json<CreateAlbum>,
) -> Result<(StatusCode, Json<Album>)> {
    let album = app_state.catalog.create_album(req).await?;
    Ok((StatusCode::CREATED, Json(album)))
}

/// GET /api/albums/:id
pub async fn get_album(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<Album>> {
    let album = app_state
        .catalog
        .get_album(&AlbumId::new(id))
        .await?
        .ok_or_else(|| ServerError::NotFound("Album not found".to_string()))?;
    Ok(Json(album))
}

/// PUT /api/albums/:id
pub async fn update_album(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    Json(req): Json<UpdateAlbum>,
) -> Result<Json<Album>> {
    let album = app_state
        .catalog
        .update_album(&AlbumId::new(id), req)
        .await?;
    Ok(Json(album))
}

/// DELETE /api/albums/:id
/// Tracks of the album are kept as standalone singles
pub async fn delete_album(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<StatusCode> {
    app_state.catalog.delete_album(&AlbumId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/albums/:id/tracks
pub async fn list_album_tracks(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Track>>> {
    let album_id = AlbumId::new(id);

    if app_state.catalog.get_album(&album_id).await?.is_none() {
        return Err(ServerError::NotFound("Album not found".to_string()));
    }

    let tracks = app_state.catalog.get_tracks_by_album(&album_id).await?;
    Ok(Json(tracks))
}
