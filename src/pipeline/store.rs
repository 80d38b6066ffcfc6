//! In-memory track collection plus the active filter configuration.
//!
//! The filtered view and the aggregate statistics are recomputed from the
//! current state on every read, so they can never go stale.

use std::collections::BTreeSet;

use crate::geo;
use crate::types::filter::{FilterConfig, FilterUpdate, HeatmapStats};
use crate::types::track::{ActivityCategory, GeoPoint, Track};

#[derive(Debug, Default)]
pub struct TrackStore {
    tracks: Vec<Track>,
    filters: FilterConfig,
}

impl TrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn filters(&self) -> &FilterConfig {
        &self.filters
    }

    /// Appends without deduplicating: the same id added twice is kept twice.
    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn add_tracks(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.tracks.extend(tracks);
    }

    pub fn clear(&mut self) {
        self.tracks = Vec::new();
    }

    /// Clear followed by add, as done on reload.
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
    }

    pub fn update_filters(&mut self, update: FilterUpdate) {
        self.filters.apply(update);
    }

    pub fn toggle_sport(&mut self) {
        self.filters.show_sport = !self.filters.show_sport;
    }

    pub fn toggle_other(&mut self) {
        self.filters.show_other = !self.filters.show_other;
    }

    pub fn filtered_tracks(&self) -> Vec<&Track> {
        self.tracks
            .iter()
            .filter(|t| self.filters.matches(t))
            .collect()
    }

    pub fn stats(&self) -> HeatmapStats {
        let filtered = self.filtered_tracks();

        let mut total_distance_m = 0.0;
        let mut sport_tracks = 0;
        let mut other_tracks = 0;
        let mut countries = BTreeSet::new();
        let mut cities = BTreeSet::new();
        let mut max_elevation: Option<f64> = None;

        for track in &filtered {
            total_distance_m += track.distance_m;
            match track.category {
                ActivityCategory::Sport => sport_tracks += 1,
                ActivityCategory::Other => other_tracks += 1,
            }
            if let Some(country) = &track.country {
                countries.insert(country.clone());
            }
            if let Some(city) = &track.city {
                cities.insert(city.clone());
            }
            if let Some(ele) = track.max_elevation() {
                max_elevation = Some(max_elevation.map_or(ele, |m| m.max(ele)));
            }
        }

        let points = || filtered.iter().flat_map(|t| t.points.iter());

        HeatmapStats {
            total_distance_m,
            total_tracks: filtered.len(),
            sport_tracks,
            other_tracks,
            countries,
            cities,
            max_elevation,
            center: geo::centroid::<GeoPoint, _>(points()),
            bounds: geo::bounds::<GeoPoint, _>(points()),
        }
    }
}
