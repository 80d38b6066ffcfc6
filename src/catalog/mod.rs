//! Discovery and fetch of raw GPX files.

mod fs;
mod http;

pub use fs::FsCatalog;
pub use http::HttpCatalog;

use async_trait::async_trait;

use crate::error::{DiscoveryError, FetchError};
use crate::types::catalog::TrackFile;

#[async_trait]
pub trait TrackCatalog: Send + Sync {
    /// Every GPX file following the `YEAR/MONTH/CATEGORY/FILENAME` layout.
    async fn list_files(&self) -> Result<Vec<TrackFile>, DiscoveryError>;

    async fn get_file_content(&self, file: &TrackFile) -> Result<String, FetchError>;

    async fn upload(&self, _filename: &str, _content: &[u8]) -> Result<TrackFile, FetchError> {
        Err(FetchError::NotImplemented)
    }
}

/// Rejects segments that could escape the catalog root.
pub(crate) fn check_segment(segment: &str) -> Result<&str, FetchError> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\'])
    {
        return Err(FetchError::InvalidPath(segment.to_string()));
    }
    Ok(segment)
}
