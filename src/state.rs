use std::sync::Arc;

use tokio::sync::RwLock;

use crate::catalog::FsCatalog;
use crate::config::Config;
use crate::error::AppError;
use crate::pipeline::load::{self, LoadOptions, LoadSummary, ProgressCallback};
use crate::pipeline::store::TrackStore;

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    catalog: Arc<FsCatalog>,
    library: Arc<RwLock<TrackStore>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let catalog = FsCatalog::new(config.data_dir.clone());
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            library: Arc::new(RwLock::new(TrackStore::new())),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &FsCatalog {
        &self.catalog
    }

    pub fn library(&self) -> &RwLock<TrackStore> {
        &self.library
    }

    /// Loads the whole catalog and swaps it into the library. A failed
    /// discovery leaves the current library untouched.
    pub async fn reload_library(&self) -> Result<LoadSummary, AppError> {
        let options = LoadOptions {
            fetch_timeout: Some(self.config.fetch_timeout),
            ..LoadOptions::default()
        };
        let progress: ProgressCallback = Arc::new(|done, total| {
            tracing::debug!("Library load progress: {}/{}", done, total);
        });

        let report = load::load_all(&*self.catalog, &options, Some(&progress)).await;
        if let Some(reason) = &report.discovery_error {
            return Err(AppError::Internal(format!("Track discovery failed: {}", reason)));
        }

        let summary = report.summary();
        self.library.write().await.replace(report.into_tracks());
        tracing::info!("Library now holds {} track(s)", summary.loaded);

        Ok(summary)
    }
}
