use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use walkdir::WalkDir;

use super::{check_segment, TrackCatalog};
use crate::error::{DiscoveryError, FetchError};
use crate::types::catalog::TrackFile;

/// Catalog backed by a local `YEAR/MONTH/CATEGORY/FILENAME` tree.
#[derive(Debug, Clone)]
pub struct FsCatalog {
    root: PathBuf,
}

impl FsCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Raw lookup by path segments, as exposed over HTTP.
    pub async fn read_file(
        &self,
        year: &str,
        month: &str,
        folder: &str,
        filename: &str,
    ) -> Result<String, FetchError> {
        let relative = [year, month, folder, filename]
            .into_iter()
            .map(check_segment)
            .collect::<Result<Vec<_>, _>>()?
            .join("/");
        self.read_relative(&relative).await
    }

    async fn read_relative(&self, relative: &str) -> Result<String, FetchError> {
        let mut path = self.root.clone();
        for segment in relative.split('/') {
            path.push(check_segment(segment)?);
        }

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(relative.to_string()))
            }
            Err(e) => Err(FetchError::Io(e)),
        }
    }
}

#[async_trait]
impl TrackCatalog for FsCatalog {
    async fn list_files(&self) -> Result<Vec<TrackFile>, DiscoveryError> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || scan(&root)).await?
    }

    async fn get_file_content(&self, file: &TrackFile) -> Result<String, FetchError> {
        self.read_relative(&file.path).await
    }
}

fn is_gpx(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gpx"))
        .unwrap_or(false)
}

/// Walks `root` and classifies every `.gpx` file. Subtrees that cannot be
/// read are logged and skipped; only an unreadable root is an error.
pub fn scan(root: &Path) -> Result<Vec<TrackFile>, DiscoveryError> {
    let current_year = Utc::now().year();
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) if source.depth() == 0 => {
                return Err(DiscoveryError::Unreadable {
                    path: root.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_gpx(entry.path()) {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        files.push(TrackFile::from_relative_path(&relative, current_year));
    }

    tracing::debug!("Discovered {} GPX file(s) under {}", files.len(), root.display());
    Ok(files)
}
