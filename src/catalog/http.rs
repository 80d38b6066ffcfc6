use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use super::{check_segment, TrackCatalog};
use crate::error::{DiscoveryError, FetchError};
use crate::types::catalog::TrackFile;

/// Catalog served by a remote heatgpx instance (`/api/tracks`).
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    base_url: Url,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    tracks: Vec<TrackFile>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: String,
}

impl HttpCatalog {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: Url, client: Client) -> Self {
        Self { base_url, client }
    }

    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, String> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| format!("{} cannot be used as a base URL", self.base_url))?
            .pop_if_empty()
            .extend(["api", "tracks"])
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl TrackCatalog for HttpCatalog {
    async fn list_files(&self) -> Result<Vec<TrackFile>, DiscoveryError> {
        let url = self.endpoint([]).map_err(DiscoveryError::Request)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DiscoveryError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DiscoveryError::Request(format!(
                "track listing answered {}",
                response.status()
            )));
        }

        let body: ListResponse = response
            .json()
            .await
            .map_err(|e| DiscoveryError::Request(e.to_string()))?;

        Ok(body.tracks)
    }

    async fn get_file_content(&self, file: &TrackFile) -> Result<String, FetchError> {
        let segments = file
            .path
            .split('/')
            .map(check_segment)
            .collect::<Result<Vec<_>, _>>()?;
        if segments.len() != 4 {
            return Err(FetchError::InvalidPath(file.path.clone()));
        }

        let url = self.endpoint(segments).map_err(FetchError::Request)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(FetchError::NotFound(file.path.clone())),
            status => return Err(FetchError::Status(status.as_u16())),
        }

        let body: ContentResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(body.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_encoded_segments() {
        let catalog = HttpCatalog::new(Url::parse("http://localhost:3001/").unwrap());
        let url = catalog
            .endpoint(["2023", "07", "sport", "morning ride.gpx"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3001/api/tracks/2023/07/sport/morning%20ride.gpx"
        );

        let listing = catalog.endpoint([]).unwrap();
        assert_eq!(listing.as_str(), "http://localhost:3001/api/tracks");
    }

    #[tokio::test]
    async fn rejects_paths_outside_the_convention() {
        let catalog = HttpCatalog::new(Url::parse("http://localhost:3001").unwrap());
        let file = TrackFile::from_relative_path("loose.gpx", 2024);
        assert!(matches!(
            catalog.get_file_content(&file).await,
            Err(FetchError::InvalidPath(_))
        ));
    }
}
