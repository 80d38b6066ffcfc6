use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::{self, Bounds, HasLatLon, LatLon};

/// Name used when a document carries no `<name>`.
pub const DEFAULT_NAME: &str = "Sans nom";
/// Subtype used when a filename has no second `_` token.
pub const DEFAULT_SUB_TYPE: &str = "autre";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub elevation: Option<f64>,
    pub time: Option<DateTime<Utc>>,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            elevation: None,
            time: None,
        }
    }
}

impl HasLatLon for GeoPoint {
    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Sport,
    Other,
}

impl ActivityCategory {
    /// Only a folder named exactly `sport` is a sport folder.
    pub fn from_folder(folder: &str) -> Self {
        if folder == "sport" {
            ActivityCategory::Sport
        } else {
            ActivityCategory::Other
        }
    }
}

/// A parsed track. Built once by the parser and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub category: ActivityCategory,
    pub sub_type: String,
    pub year: i32,
    pub month: u32,
    pub points: Vec<GeoPoint>,
    pub distance_m: f64,
    pub elevation_gain_m: f64,
    pub duration_seconds: f64,
    pub avg_speed_kmh: f64,
    pub captured_at: Option<DateTime<Utc>>,
    pub source_path: String,
    pub country: Option<String>,
    pub city: Option<String>,
}

/// Point-less view of a track, sent to map clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSummary {
    pub id: String,
    pub name: String,
    pub category: ActivityCategory,
    pub sub_type: String,
    pub year: i32,
    pub month: u32,
    pub point_count: usize,
    pub distance_m: f64,
    pub elevation_gain_m: f64,
    pub duration_seconds: f64,
    pub avg_speed_kmh: f64,
    pub distance_label: String,
    pub duration_label: String,
    pub speed_label: String,
    pub captured_at: Option<DateTime<Utc>>,
    pub source_path: String,
    pub center: LatLon,
    pub bounds: Bounds,
}

impl Track {
    /// Replaces every non-alphanumeric character of the path with `_`.
    pub fn id_for_path(source_path: &str) -> String {
        source_path
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }

    pub fn max_elevation(&self) -> Option<f64> {
        self.points
            .iter()
            .filter_map(|p| p.elevation)
            .fold(None, |max, e| Some(max.map_or(e, |m: f64| m.max(e))))
    }

    pub fn summary(&self) -> TrackSummary {
        TrackSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category,
            sub_type: self.sub_type.clone(),
            year: self.year,
            month: self.month,
            point_count: self.points.len(),
            distance_m: self.distance_m,
            elevation_gain_m: self.elevation_gain_m,
            duration_seconds: self.duration_seconds,
            avg_speed_kmh: self.avg_speed_kmh,
            distance_label: geo::format_distance(self.distance_m),
            duration_label: geo::format_duration(self.duration_seconds),
            speed_label: geo::format_speed(self.avg_speed_kmh),
            captured_at: self.captured_at,
            source_path: self.source_path.clone(),
            center: geo::centroid(&self.points),
            bounds: geo::bounds(&self.points),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_from_folder_is_exact_match() {
        assert_eq!(ActivityCategory::from_folder("sport"), ActivityCategory::Sport);
        assert_eq!(ActivityCategory::from_folder("divers"), ActivityCategory::Other);
        assert_eq!(ActivityCategory::from_folder("Sport"), ActivityCategory::Other);
        assert_eq!(ActivityCategory::from_folder(""), ActivityCategory::Other);
    }

    #[test]
    fn id_keeps_only_alphanumerics() {
        assert_eq!(
            Track::id_for_path("2023/07/sport/2023-07-04_rando_summit.gpx"),
            "2023_07_sport_2023_07_04_rando_summit_gpx"
        );
        assert_ne!(
            Track::id_for_path("2023/07/sport/a.gpx"),
            Track::id_for_path("2023/08/sport/a.gpx")
        );
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&ActivityCategory::Other).unwrap();
        assert_eq!(json, "\"other\"");
    }
}
