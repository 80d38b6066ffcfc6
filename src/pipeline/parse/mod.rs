mod gpx;

use chrono::{Datelike, Utc};

use crate::error::ParseError;
use crate::pipeline::process;
use crate::types::track::{ActivityCategory, Track, DEFAULT_NAME};

pub use gpx::{read_document, GpxDocument};

/// Parses a GPX document into a [`Track`], deriving its metrics and its
/// year/month from `source_path`.
pub fn parse(
    raw: &str,
    source_path: &str,
    category: ActivityCategory,
    sub_type: &str,
) -> Result<Track, ParseError> {
    let doc = read_document(raw)?;
    let metrics = process::compute_metrics(&doc.points);
    let (year, month) = period_from_path(source_path);

    Ok(Track {
        id: Track::id_for_path(source_path),
        name: doc.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
        category,
        sub_type: sub_type.to_string(),
        year,
        month,
        points: doc.points,
        distance_m: metrics.distance_m,
        elevation_gain_m: metrics.elevation_gain_m,
        duration_seconds: metrics.duration_seconds,
        avg_speed_kmh: metrics.avg_speed_kmh,
        captured_at: doc.time,
        source_path: source_path.to_string(),
        country: None,
        city: None,
    })
}

/// First 4-digit segment is the year, first segment in `1..=12` (one or
/// two digits) is the month. Defaults: current year, January.
pub fn period_from_path(source_path: &str) -> (i32, u32) {
    let segments = || source_path.split('/');

    let year = segments()
        .find(|s| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| Utc::now().year());

    let month = segments()
        .find_map(month_token)
        .unwrap_or(1);

    (year, month)
}

fn month_token(segment: &str) -> Option<u32> {
    if segment.is_empty() || segment.len() > 2 || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok().filter(|m| (1..=12).contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test">
  <metadata><name>Summit push</name><time>2023-07-04T05:58:00Z</time></metadata>
  <trk><trkseg>
    <trkpt lat="45.8326" lon="6.8652"><ele>3800</ele><time>2023-07-04T06:00:00Z</time></trkpt>
    <trkpt lat="45.8340" lon="6.8660"><ele>3900</ele><time>2023-07-04T06:30:00Z</time></trkpt>
    <trkpt lat="45.8358" lon="6.8645"><ele>3850</ele><time>2023-07-04T07:00:00Z</time></trkpt>
  </trkseg></trk>
</gpx>"#;

    #[test]
    fn conventional_path_sets_period_and_labels() {
        let track = parse(
            SAMPLE,
            "2023/07/sport/2023-07-04_rando_summit.gpx",
            ActivityCategory::Sport,
            "rando",
        )
        .unwrap();

        assert_eq!(track.year, 2023);
        assert_eq!(track.month, 7);
        assert_eq!(track.category, ActivityCategory::Sport);
        assert_eq!(track.sub_type, "rando");
        assert_eq!(track.name, "Summit push");
        assert_eq!(track.id, "2023_07_sport_2023_07_04_rando_summit_gpx");
        assert_eq!(track.points.len(), 3);
        assert_eq!(track.elevation_gain_m, 100.0);
        assert_eq!(track.duration_seconds, 3600.0);
        assert!(track.distance_m > 300.0 && track.distance_m < 500.0);
        assert!((track.avg_speed_kmh - track.distance_m / 1000.0).abs() < 1e-9);
        assert_eq!(
            track.captured_at.map(|t| t.to_rfc3339()),
            Some("2023-07-04T05:58:00+00:00".to_string())
        );
    }

    #[test]
    fn document_without_trackpoints_has_zero_metrics() {
        let track = parse(
            "<gpx><trk><trkseg></trkseg></trk></gpx>",
            "2022/03/divers/empty.gpx",
            ActivityCategory::Other,
            "autre",
        )
        .unwrap();

        assert!(track.points.is_empty());
        assert_eq!(track.distance_m, 0.0);
        assert_eq!(track.duration_seconds, 0.0);
        assert_eq!(track.avg_speed_kmh, 0.0);
        assert_eq!(track.elevation_gain_m, 0.0);
        assert_eq!(track.name, DEFAULT_NAME);
        assert_eq!(track.captured_at, None);
    }

    #[test]
    fn malformed_document_is_an_error() {
        let err = parse("<gpx><trk>", "2022/03/sport/x.gpx", ActivityCategory::Sport, "autre")
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidGpx(_)));
    }

    #[test]
    fn zoneless_times_still_give_duration_and_speed() {
        let track = parse(
            "<gpx><trk><trkseg>\
               <trkpt lat=\"45.0\" lon=\"6.0\"><time>2023-01-01T00:00:00</time></trkpt>\
               <trkpt lat=\"45.1\" lon=\"6.0\"><time>2023-01-01T01:00:00</time></trkpt>\
             </trkseg></trk></gpx>",
            "2023/01/sport/x.gpx",
            ActivityCategory::Sport,
            "velo",
        )
        .unwrap();

        assert_eq!(track.duration_seconds, 3600.0);
        assert!(track.avg_speed_kmh > 11.0 && track.avg_speed_kmh < 11.2);
    }

    #[test]
    fn second_root_is_an_error() {
        let err = parse("<gpx/><junk/>", "2022/03/sport/x.gpx", ActivityCategory::Sport, "autre")
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidGpx(_)));
    }

    #[test]
    fn period_falls_back_when_path_has_no_tokens() {
        let (year, month) = period_from_path("imports/track.gpx");
        assert_eq!(year, Utc::now().year());
        assert_eq!(month, 1);
    }

    #[test]
    fn month_token_rules() {
        assert_eq!(period_from_path("2021/9/x.gpx"), (2021, 9));
        assert_eq!(period_from_path("2021/12/x.gpx"), (2021, 12));
        assert_eq!(period_from_path("2021/13/x.gpx").1, 1);
        assert_eq!(period_from_path("2021/00/x.gpx").1, 1);
        // The year segment is four digits, never a month.
        assert_eq!(period_from_path("2021/sport/05/x.gpx"), (2021, 5));
    }
}
