use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::catalog::TrackCatalog;
use crate::error::AppError;
use crate::state::AppState;
use crate::types::catalog::TrackFile;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tracks", get(list_tracks))
        .route("/api/tracks/upload", post(upload))
        .route("/api/tracks/:year/:month/:folder/:filename", get(get_track))
}

#[derive(Serialize)]
struct ListResponse {
    success: bool,
    tracks: Vec<TrackFile>,
    count: usize,
}

#[derive(Serialize)]
struct ContentResponse {
    success: bool,
    content: String,
    path: String,
}

async fn list_tracks(State(state): State<AppState>) -> Result<Json<ListResponse>, AppError> {
    let tracks = state.catalog().list_files().await?;
    tracing::info!("Listing {} GPX file(s)", tracks.len());

    Ok(Json(ListResponse {
        success: true,
        count: tracks.len(),
        tracks,
    }))
}

async fn get_track(
    State(state): State<AppState>,
    Path((year, month, folder, filename)): Path<(String, String, String, String)>,
) -> Result<Json<ContentResponse>, AppError> {
    let content = state
        .catalog()
        .read_file(&year, &month, &folder, &filename)
        .await?;

    Ok(Json(ContentResponse {
        success: true,
        content,
        path: format!("{}/{}/{}/{}", year, month, folder, filename),
    }))
}

async fn upload(State(state): State<AppState>, body: Bytes) -> Result<Json<TrackFile>, AppError> {
    let file = state.catalog().upload("", &body).await?;
    Ok(Json(file))
}
