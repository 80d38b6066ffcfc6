use axum::{
    extract::State,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;

use crate::error::AppError;
use crate::pipeline::load::LoadSummary;
use crate::state::AppState;
use crate::types::filter::{FilterConfig, FilterUpdate, HeatmapStats};
use crate::types::track::TrackSummary;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/library", get(library))
        .route("/api/library/filters", patch(update_filters))
        .route("/api/library/reload", post(reload))
}

#[derive(Serialize)]
struct LibraryResponse {
    success: bool,
    filters: FilterConfig,
    stats: HeatmapStats,
    tracks: Vec<TrackSummary>,
}

#[derive(Serialize)]
struct FiltersResponse {
    success: bool,
    filters: FilterConfig,
    stats: HeatmapStats,
}

#[derive(Serialize)]
struct ReloadResponse {
    success: bool,
    #[serde(flatten)]
    summary: LoadSummary,
}

async fn library(State(state): State<AppState>) -> Json<LibraryResponse> {
    let store = state.library().read().await;

    Json(LibraryResponse {
        success: true,
        filters: store.filters().clone(),
        stats: store.stats(),
        tracks: store.filtered_tracks().into_iter().map(|t| t.summary()).collect(),
    })
}

async fn update_filters(
    State(state): State<AppState>,
    Json(update): Json<FilterUpdate>,
) -> Result<Json<FiltersResponse>, AppError> {
    check_range(update.year_range.flatten())?;
    check_range(update.month_range.flatten())?;

    let mut store = state.library().write().await;
    store.update_filters(update);
    tracing::debug!("Filters updated: {:?}", store.filters());

    Ok(Json(FiltersResponse {
        success: true,
        filters: store.filters().clone(),
        stats: store.stats(),
    }))
}

fn check_range<T: PartialOrd + std::fmt::Debug>(range: Option<(T, T)>) -> Result<(), AppError> {
    match range {
        Some((min, max)) if min > max => Err(AppError::BadRequest(format!(
            "Invalid range: {:?} is greater than {:?}",
            min, max
        ))),
        _ => Ok(()),
    }
}

async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, AppError> {
    let summary = state.reload_library().await?;
    Ok(Json(ReloadResponse {
        success: true,
        summary,
    }))
}
