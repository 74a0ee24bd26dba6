/// API route modules
pub mod admin;
pub mod albums;
pub mod health;
pub mod tracks;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// All `/api` routes, without middleware layers
pub fn router(app_state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health::health))
        // Albums
        .route("/albums", get(albums::list_albums).post(albums::create_album))
        .route(
            "/albums/:id",
            get(albums::get_album)
                .put(albums::update_album)
                .delete(albums::delete_album),
        )
        .route("/albums/:id/tracks", get(albums::list_album_tracks))
        // Tracks
        .route("/tracks", get(tracks::list_tracks).post(tracks::create_track))
        .route(
            "/tracks/:id",
            get(tracks::get_track)
                .put(tracks::update_track)
                .delete(tracks::delete_track),
        )
        // Admin
        .route("/admin/release-sweep", post(admin::run_release_sweep))
        .route("/admin/reconcile-counts", post(admin::reconcile_counts));

    Router::new().nest("/api", routes).with_state(app_state)
}
