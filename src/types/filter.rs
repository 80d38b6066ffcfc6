use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::geo::{Bounds, LatLon};

use super::track::{ActivityCategory, Track};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub show_sport: bool,
    pub show_other: bool,
    /// Inclusive `[min, max]`; `None` means no restriction.
    pub year_range: Option<(i32, i32)>,
    /// Inclusive `[min, max]`; `None` means no restriction.
    pub month_range: Option<(u32, u32)>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            show_sport: true,
            show_other: true,
            year_range: None,
            month_range: None,
        }
    }
}

impl FilterConfig {
    pub fn shows(&self, category: ActivityCategory) -> bool {
        match category {
            ActivityCategory::Sport => self.show_sport,
            ActivityCategory::Other => self.show_other,
        }
    }

    pub fn matches(&self, track: &Track) -> bool {
        if !self.shows(track.category) {
            return false;
        }
        if let Some((min, max)) = self.year_range {
            if track.year < min || track.year > max {
                return false;
            }
        }
        if let Some((min, max)) = self.month_range {
            if track.month < min || track.month > max {
                return false;
            }
        }
        true
    }

    pub fn apply(&mut self, update: FilterUpdate) {
        if let Some(show) = update.show_sport {
            self.show_sport = show;
        }
        if let Some(show) = update.show_other {
            self.show_other = show;
        }
        if let Some(range) = update.year_range {
            self.year_range = range;
        }
        if let Some(range) = update.month_range {
            self.month_range = range;
        }
    }
}

/// Partial filter change. Absent fields keep their value; an explicit
/// `null` range clears that restriction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterUpdate {
    #[serde(default)]
    pub show_sport: Option<bool>,
    #[serde(default)]
    pub show_other: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub year_range: Option<Option<(i32, i32)>>,
    #[serde(default, deserialize_with = "present")]
    pub month_range: Option<Option<(u32, u32)>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Aggregates over the filtered track set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapStats {
    pub total_distance_m: f64,
    pub total_tracks: usize,
    pub sport_tracks: usize,
    pub other_tracks: usize,
    pub countries: BTreeSet<String>,
    pub cities: BTreeSet<String>,
    pub max_elevation: Option<f64>,
    pub center: LatLon,
    pub bounds: Bounds,
}
