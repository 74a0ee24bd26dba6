/// API integration tests
/// Tests complete HTTP request/response cycles with a real database
mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{body_json, create_test_app, empty_request, json_request};
use serde_json::json;
use tower::util::ServiceExt;

fn rfc3339_days_from(clock: &cadence_core::ManualClock, days: i64) -> String {
    use cadence_core::Clock;
    (clock.now() + Duration::days(days)).to_rfc3339()
}

/// Test GET /api/health
#[tokio::test]
async fn test_health() {
    let (app, _catalog) = create_test_app().await;

    let response = app.oneshot(empty_request("GET", "/api/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["release_sweep_interval_secs"], 3600);
}

/// Test album creation decides activation from the release date
#[tokio::test]
async fn test_create_albums_past_and_future() {
    let (app, test_catalog) = create_test_app().await;

    let past = json!({
        "title": "Out Now",
        "release_date": rfc3339_days_from(&test_catalog.clock, -1),
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/albums", &past))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let album = body_json(response).await;
    assert_eq!(album["is_active"], true);
    assert_eq!(album["total_tracks"], 0);

    let future = json!({
        "title": "Coming Soon",
        "release_date": rfc3339_days_from(&test_catalog.clock, 7),
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/albums", &future))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["is_active"], false);

    // Only the released album is listed as active
    let response = app
        .oneshot(empty_request("GET", "/api/albums?active=true"))
        .await
        .unwrap();
    let active = body_json(response).await;
    assert_eq!(active.as_array().unwrap().len(), 1);
    assert_eq!(active[0]["title"], "Out Now");
}

/// Test a track created on an album inherits its state and bumps the counter
#[tokio::test]
async fn test_create_track_on_album() {
    let (app, test_catalog) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/albums",
            &json!({
                "title": "Album A",
                "release_date": rfc3339_days_from(&test_catalog.clock, -1),
            }),
        ))
        .await
        .unwrap();
    let album = body_json(response).await;
    let album_id = album["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tracks",
            &json!({
                "title": "T1",
                "release_date": rfc3339_days_from(&test_catalog.clock, 1),
                "album_id": album_id,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let track = body_json(response).await;
    assert_eq!(track["is_active"], true);
    assert_eq!(track["release_date"], album["release_date"]);

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/albums/{album_id}")))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["total_tracks"], 1);

    let response = app
        .oneshot(empty_request("GET", &format!("/api/albums/{album_id}/tracks")))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

/// Test PUT on an album cascades release changes to its tracks
#[tokio::test]
async fn test_update_album_cascades_to_tracks() {
    let (app, test_catalog) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/albums",
            &json!({
                "title": "Delayed",
                "release_date": rfc3339_days_from(&test_catalog.clock, 10),
            }),
        ))
        .await
        .unwrap();
    let album_id = body_json(response).await["id"].as_str().unwrap().to_string();

    for title in ["One", "Two"] {
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/tracks",
                &json!({
                    "title": title,
                    "release_date": rfc3339_days_from(&test_catalog.clock, 10),
                    "album_id": album_id,
                }),
            ))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/albums/{album_id}"),
            &json!({ "release_date": rfc3339_days_from(&test_catalog.clock, -1) }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["is_active"], true);

    let response = app
        .oneshot(empty_request("GET", "/api/tracks?active=true"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["total"], 2);
}

/// Test detaching a track through `"album_id": null`
#[tokio::test]
async fn test_update_track_detach() {
    let (app, test_catalog) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/albums",
            &json!({
                "title": "Host",
                "release_date": rfc3339_days_from(&test_catalog.clock, -1),
            }),
        ))
        .await
        .unwrap();
    let album_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tracks",
            &json!({
                "title": "Guest",
                "release_date": rfc3339_days_from(&test_catalog.clock, 0),
                "album_id": album_id,
            }),
        ))
        .await
        .unwrap();
    let track_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/tracks/{track_id}"),
            &json!({
                "album_id": null,
                "release_date": rfc3339_days_from(&test_catalog.clock, 5),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let track = body_json(response).await;
    assert!(track["album_id"].is_null());
    assert_eq!(track["is_active"], false);

    let response = app
        .oneshot(empty_request("GET", &format!("/api/albums/{album_id}")))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["total_tracks"], 0);
}

/// Test DELETE on an album keeps its tracks as singles
#[tokio::test]
async fn test_delete_album() {
    let (app, test_catalog) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/albums",
            &json!({
                "title": "Gone",
                "release_date": rfc3339_days_from(&test_catalog.clock, -1),
            }),
        ))
        .await
        .unwrap();
    let album_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tracks",
            &json!({
                "title": "Left Behind",
                "release_date": rfc3339_days_from(&test_catalog.clock, 0),
                "album_id": album_id,
            }),
        ))
        .await
        .unwrap();
    let track_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/albums/{album_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/albums/{album_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(empty_request("GET", &format!("/api/tracks/{track_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["album_id"].is_null());
}

/// Test error mapping for missing entities and bad input
#[tokio::test]
async fn test_error_responses() {
    let (app, test_catalog) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/albums/nonexistent"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/albums/nonexistent/tracks"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/albums/nonexistent",
            &json!({ "title": "Nobody" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tracks",
            &json!({
                "title": "Orphan",
                "release_date": rfc3339_days_from(&test_catalog.clock, 0),
                "album_id": "nonexistent",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/albums",
            &json!({
                "title": "",
                "release_date": rfc3339_days_from(&test_catalog.clock, 0),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());

    let response = app
        .oneshot(empty_request("DELETE", "/api/tracks/nonexistent"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Test POST /api/admin/release-sweep after the clock passes a release
#[tokio::test]
async fn test_admin_release_sweep() {
    let (app, test_catalog) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/albums",
            &json!({
                "title": "Tomorrow",
                "release_date": rfc3339_days_from(&test_catalog.clock, 1),
            }),
        ))
        .await
        .unwrap();
    let album_id = body_json(response).await["id"].as_str().unwrap().to_string();

    test_catalog.clock.advance(Duration::days(2));

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/api/admin/release-sweep"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;
    assert_eq!(report["albums_activated"], 1);

    let response = app
        .oneshot(empty_request("GET", &format!("/api/albums/{album_id}")))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["is_active"], true);
}

/// Test POST /api/admin/reconcile-counts on a consistent catalog
#[tokio::test]
async fn test_admin_reconcile_counts() {
    let (app, _catalog) = create_test_app().await;

    let response = app
        .oneshot(empty_request("POST", "/api/admin/reconcile-counts"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["albums_corrected"], 0);
}
