//! Geodesic helpers: haversine distance, spherical centroid, bounding box,
//! and human-readable formatting of distances and durations.

use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Anything carrying a latitude/longitude pair in degrees.
pub trait HasLatLon {
    fn lat(&self) -> f64;
    fn lon(&self) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl HasLatLon for LatLon {
    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Great-circle distance in meters.
pub fn distance<A: HasLatLon, B: HasLatLon>(a: &A, b: &B) -> f64 {
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lon = (b.lon() - a.lon()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat().to_radians().cos() * b.lat().to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push h marginally outside [0, 1] for antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

pub fn path_length<P: HasLatLon>(points: &[P]) -> f64 {
    points.windows(2).map(|w| distance(&w[0], &w[1])).sum()
}

/// Mean position on the unit sphere. Safe across the antimeridian, unlike
/// averaging raw coordinates.
pub fn centroid<'a, P, I>(points: I) -> LatLon
where
    P: HasLatLon + 'a,
    I: IntoIterator<Item = &'a P>,
{
    let mut x = 0.0;
    let mut y = 0.0;
    let mut z = 0.0;
    let mut count = 0usize;

    for p in points {
        let lat = p.lat().to_radians();
        let lon = p.lon().to_radians();
        x += lat.cos() * lon.cos();
        y += lat.cos() * lon.sin();
        z += lat.sin();
        count += 1;
    }

    if count == 0 {
        return LatLon::default();
    }

    let n = count as f64;
    let (x, y, z) = (x / n, y / n, z / n);

    let lon = y.atan2(x);
    let lat = z.atan2((x * x + y * y).sqrt());

    LatLon::new(lat.to_degrees(), lon.to_degrees())
}

/// Min/max scan. All zeros for an empty input.
pub fn bounds<'a, P, I>(points: I) -> Bounds
where
    P: HasLatLon + 'a,
    I: IntoIterator<Item = &'a P>,
{
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return Bounds::default();
    };

    let init = Bounds {
        min_lat: first.lat(),
        max_lat: first.lat(),
        min_lon: first.lon(),
        max_lon: first.lon(),
    };

    iter.fold(init, |b, p| Bounds {
        min_lat: b.min_lat.min(p.lat()),
        max_lat: b.max_lat.max(p.lat()),
        min_lon: b.min_lon.min(p.lon()),
        max_lon: b.max_lon.max(p.lon()),
    })
}

pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} m", meters.round() as i64)
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;

    if hours > 0 {
        format!("{}h {}min", hours, minutes)
    } else {
        format!("{}min", minutes)
    }
}

pub fn format_speed(kmh: f64) -> String {
    format!("{:.1} km/h", kmh)
}
