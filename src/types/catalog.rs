use serde::{Deserialize, Serialize};

use super::track::{ActivityCategory, DEFAULT_SUB_TYPE};

/// A GPX file found by discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackFile {
    /// Path relative to the catalog root, `/`-separated.
    pub path: String,
    pub year: i32,
    pub month: u32,
    pub category: ActivityCategory,
    /// Raw third path segment; fetches use it instead of the normalized category.
    pub folder: String,
    pub sub_type: String,
    pub filename: String,
}

impl TrackFile {
    /// Classifies a relative path laid out as `YEAR/MONTH/CATEGORY/FILENAME`.
    /// Segments that are missing or not numeric fall back to the current year and month 1.
    pub fn from_relative_path(path: &str, current_year: i32) -> Self {
        let parts: Vec<&str> = path.split('/').collect();

        let year = parts
            .first()
            .and_then(|s| s.parse::<i32>().ok())
            .filter(|y| *y != 0)
            .unwrap_or(current_year);
        let month = parts
            .get(1)
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|m| *m != 0)
            .unwrap_or(1);
        let folder = parts.get(2).copied().unwrap_or_default().to_string();
        let filename = parts.last().copied().unwrap_or_default().to_string();

        Self {
            path: path.to_string(),
            year,
            month,
            category: ActivityCategory::from_folder(&folder),
            folder,
            sub_type: sub_type_from_filename(&filename),
            filename,
        }
    }
}

/// Second `_`-delimited token of a `YYYY-MM-DD_subtype_name.gpx` filename.
pub fn sub_type_from_filename(filename: &str) -> String {
    filename
        .split('_')
        .nth(1)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SUB_TYPE)
        .to_string()
}
