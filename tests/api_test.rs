mod common;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use common::{FakeCatalog, item};
use http_body_util::BodyExt;
use plstats::server::{AppState, build_router};
use serde_json::{Value, json};
use tower::util::ServiceExt;

fn app(catalog: Arc<FakeCatalog>) -> Router {
    build_router(AppState::new(catalog))
}

async fn get(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().uri(uri);
    if let Some(token) = token {
        request = request.header(AUTHORIZATION, format!("Bearer {}", token));
    }

    let response = app
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

fn two_track_catalog() -> FakeCatalog {
    FakeCatalog::with_items(vec![
        item(Some("U1"), &[("A1", "Artist One")]),
        item(Some("U1"), &[("A2", "Artist Two")]),
    ])
    .artist("A1", "Artist One", &["pop"])
    .artist("A2", "Artist Two", &["rock"])
    .user("U1", "User One")
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = get(app(Arc::new(FakeCatalog::default())), "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "plstats");
}

#[tokio::test]
async fn analyze_returns_rankings() {
    let (status, body) = get(
        app(Arc::new(two_track_catalog())),
        "/playlist/pl/analyze",
        Some("user-token"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "topArtists": [
                {"name": "Artist One", "count": 1},
                {"name": "Artist Two", "count": 1}
            ],
            "topGenres": [
                {"name": "pop", "count": 1},
                {"name": "rock", "count": 1}
            ],
            "topUsers": [
                {"id": "U1", "displayName": "User One", "count": 2}
            ]
        })
    );
}

#[tokio::test]
async fn missing_credential_is_rejected_without_remote_calls() {
    let catalog = Arc::new(two_track_catalog());

    let (status, body) = get(app(catalog.clone()), "/playlist/pl/analyze", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["status"], 401);
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Not authenticated")
    );
    assert!(body.get("topArtists").is_none());
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn blank_bearer_token_counts_as_missing() {
    let catalog = Arc::new(two_track_catalog());

    let (status, _) = get(app(catalog.clone()), "/playlist/pl/analyze", Some("  ")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn upstream_error_is_passed_through() {
    let mut catalog = two_track_catalog();
    catalog.tracks_error = Some((0, 404, "Resource not found".to_string()));

    let (status, body) = get(
        app(Arc::new(catalog)),
        "/playlist/nope/analyze",
        Some("user-token"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"error": {"status": 404, "message": "Resource not found"}})
    );
}

#[tokio::test]
async fn transport_error_is_hidden_behind_a_generic_500() {
    let mut catalog = two_track_catalog();
    catalog.transport_error = true;

    let (status, body) = get(
        app(Arc::new(catalog)),
        "/playlist/pl/analyze",
        Some("user-token"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": {"status": 500, "message": "Internal server error"}})
    );
}

#[tokio::test]
async fn top_query_limits_rankings() {
    let (status, body) = get(
        app(Arc::new(two_track_catalog())),
        "/playlist/pl/analyze?top=1",
        Some("user-token"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["topArtists"].as_array().unwrap().len(), 1);
    assert_eq!(body["topGenres"][0]["name"], "pop");
}

#[tokio::test]
async fn malformed_top_gets_a_json_error() {
    let catalog = Arc::new(two_track_catalog());

    let (status, body) = get(
        app(catalog.clone()),
        "/playlist/pl/analyze?top=abc",
        Some("user-token"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["status"], 400);
    assert!(body["error"]["message"].is_string());
    assert!(body.get("topArtists").is_none());
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn top_never_exceeds_ten() {
    let names: Vec<(String, String)> = (0..30)
        .map(|i| (format!("A{}", i), format!("Artist {}", i)))
        .collect();
    let items = names
        .iter()
        .map(|(id, name)| item(Some("U1"), &[(id.as_str(), name.as_str())]))
        .collect();

    let (status, body) = get(
        app(Arc::new(FakeCatalog::with_items(items))),
        "/playlist/pl/analyze?top=50",
        Some("user-token"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["topArtists"].as_array().unwrap().len(), 10);
    assert_eq!(body["topArtists"][9]["name"], "Artist 9");
}
