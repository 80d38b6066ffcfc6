use crate::geo;
use crate::types::track::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub distance_m: f64,
    pub elevation_gain_m: f64,
    pub duration_seconds: f64,
    pub avg_speed_kmh: f64,
}

pub fn compute_metrics(points: &[GeoPoint]) -> Metrics {
    if points.len() < 2 {
        return Metrics::default();
    }

    let distance_m = geo::path_length(points);
    let elevation_gain_m = elevation_gain(points);
    let duration_seconds = elapsed_seconds(points);

    let avg_speed_kmh = if duration_seconds > 0.0 {
        (distance_m / 1000.0) / (duration_seconds / 3600.0)
    } else {
        0.0
    };

    Metrics {
        distance_m,
        elevation_gain_m,
        duration_seconds,
        avg_speed_kmh,
    }
}

/// Sum of positive deltas. A point without elevation counts as 0, so gaps
/// in the data can add spurious climbs.
fn elevation_gain(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| w[1].elevation.unwrap_or(0.0) - w[0].elevation.unwrap_or(0.0))
        .filter(|delta| *delta > 0.0)
        .sum()
}

/// Wall-clock span between the first and last point, not moving time.
fn elapsed_seconds(points: &[GeoPoint]) -> f64 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    match (first.time, last.time) {
        (Some(start), Some(end)) => (end - start).num_milliseconds() as f64 / 1000.0,
        _ => 0.0,
    }
}
