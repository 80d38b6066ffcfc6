//! Sequential discovery → fetch → parse run over a [`TrackCatalog`].
//!
//! One file is in flight at a time so progress is reported in a stable
//! order. Per-file failures are logged and skipped; they never abort the
//! batch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::catalog::TrackCatalog;
use crate::error::FetchError;
use crate::pipeline::parse;
use crate::types::catalog::TrackFile;
use crate::types::track::Track;

/// Called with `(completed, total)` after every attempted file.
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Cooperative cancellation flag, checked between files.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Upper bound for a single fetch; `None` waits forever.
    pub fetch_timeout: Option<Duration>,
    pub cancel: CancelToken,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadFailure {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub tracks: Vec<Track>,
    pub failures: Vec<LoadFailure>,
    pub total: usize,
    pub completed: usize,
    /// Set when listing failed; an empty catalog leaves this `None`.
    pub discovery_error: Option<String>,
    pub cancelled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub loaded: usize,
    pub failed: usize,
    pub total: usize,
    pub completed: usize,
    pub cancelled: bool,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn summary(&self) -> LoadSummary {
        LoadSummary {
            loaded: self.tracks.len(),
            failed: self.failures.len(),
            total: self.total,
            completed: self.completed,
            cancelled: self.cancelled,
            failures: self.failures.clone(),
        }
    }

    pub fn into_tracks(self) -> Vec<Track> {
        self.tracks
    }
}

#[derive(Debug, thiserror::Error)]
enum FileError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] crate::error::ParseError),
}

pub async fn load_all(
    catalog: &dyn TrackCatalog,
    options: &LoadOptions,
    on_progress: Option<&ProgressCallback>,
) -> LoadReport {
    let files = match catalog.list_files().await {
        Ok(files) => files,
        Err(e) => {
            tracing::error!("Track discovery failed: {}", e);
            return LoadReport {
                discovery_error: Some(e.to_string()),
                ..LoadReport::default()
            };
        }
    };

    let mut report = LoadReport {
        total: files.len(),
        ..LoadReport::default()
    };
    tracing::info!("Loading {} track file(s)", report.total);

    for file in &files {
        if options.cancel.is_cancelled() {
            tracing::info!(
                "Track loading cancelled after {}/{} file(s)",
                report.completed,
                report.total
            );
            report.cancelled = true;
            break;
        }

        match load_one(catalog, file, options.fetch_timeout).await {
            Ok(track) => {
                tracing::debug!(
                    "Loaded {} ({} points, {:.2} km)",
                    file.path,
                    track.points.len(),
                    track.distance_m / 1000.0
                );
                report.tracks.push(track);
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", file.path, e);
                report.failures.push(LoadFailure {
                    path: file.path.clone(),
                    reason: e.to_string(),
                });
            }
        }

        report.completed += 1;
        if let Some(callback) = on_progress {
            callback(report.completed, report.total);
        }
    }

    tracing::info!(
        "Loaded {} track(s), {} failure(s)",
        report.tracks.len(),
        report.failures.len()
    );
    report
}

async fn load_one(
    catalog: &dyn TrackCatalog,
    file: &TrackFile,
    fetch_timeout: Option<Duration>,
) -> Result<Track, FileError> {
    let fetch = catalog.get_file_content(file);
    let content = match fetch_timeout {
        Some(limit) => tokio::time::timeout(limit, fetch)
            .await
            .map_err(|_| FetchError::Timeout(limit))??,
        None => fetch.await?,
    };

    Ok(parse::parse(&content, &file.path, file.category, &file.sub_type)?)
}
