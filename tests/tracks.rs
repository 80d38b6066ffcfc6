use std::path::Path;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use heatgpx::{config::Config, routes, state::AppState};
use serde_json::Value;
use tower::ServiceExt;

fn app(data_dir: &Path) -> Router {
    let config = Config {
        data_dir: data_dir.to_path_buf(),
        ..Config::default()
    };
    let state = AppState::new(config);
    Router::new()
        .merge(routes::tracks::router())
        .with_state(state)
}

fn sample_gpx() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test">
  <trk><name>Col du Test</name><trkseg>
    <trkpt lat="45.0000" lon="6.0000"><ele>1000.0</ele><time>2023-07-04T08:00:00Z</time></trkpt>
    <trkpt lat="45.0100" lon="6.0100"><ele>1200.0</ele><time>2023-07-04T09:00:00Z</time></trkpt>
  </trkseg></trk>
</gpx>"#
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(path, content).expect("write");
}

async fn call(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .method(method)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).expect("json body");
    (status, json)
}

#[tokio::test]
async fn listing_classifies_files_by_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "2023/07/sport/2023-07-04_rando_summit.gpx", sample_gpx());
    write(dir.path(), "2023/08/divers/2023-08-12_voiture_trip.gpx", sample_gpx());
    write(dir.path(), "2023/08/divers/readme.md", "ignored");

    let (status, json) = call(app(dir.path()), "GET", "/api/tracks").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 2);

    let tracks = json["tracks"].as_array().expect("tracks array");
    assert_eq!(tracks[0]["year"], 2023);
    assert_eq!(tracks[0]["month"], 7);
    assert_eq!(tracks[0]["category"], "sport");
    assert_eq!(tracks[0]["sub_type"], "rando");
    assert_eq!(tracks[1]["category"], "other");
    assert_eq!(tracks[1]["folder"], "divers");
    assert_eq!(tracks[1]["sub_type"], "voiture");
}

#[tokio::test]
async fn listing_a_missing_directory_is_a_structured_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (status, json) = call(app(&dir.path().join("absent")), "GET", "/api/tracks").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn fetch_returns_raw_content() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "2023/07/sport/2023-07-04_rando_summit.gpx", sample_gpx());

    let (status, json) = call(
        app(dir.path()),
        "GET",
        "/api/tracks/2023/07/sport/2023-07-04_rando_summit.gpx",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["path"], "2023/07/sport/2023-07-04_rando_summit.gpx");
    assert_eq!(json["content"], sample_gpx());
}

#[tokio::test]
async fn fetch_of_missing_file_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (status, json) = call(app(dir.path()), "GET", "/api/tracks/2023/07/sport/nope.gpx").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn fetch_rejects_parent_segments() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (status, json) = call(
        app(dir.path()),
        "GET",
        "/api/tracks/2023/07/sport/..%2F..%2Fsecret.gpx",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn upload_is_not_implemented() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (status, json) = call(app(dir.path()), "POST", "/api/tracks/upload").await;

    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Upload not implemented yet");
}
