//! Spherical-body geodesy: surface coordinates, great-circle distance,
//! and initial bearing.

use serde::{Deserialize, Serialize};

/// A point on the surface of a spherical body, in degrees.
///
/// Construction normalizes the coordinates: latitude is clamped to
/// [-90, 90] and longitude wraps into [-180, 180). Values read back from
/// accessors are always in canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat_deg: f64,
    lon_deg: f64,
}

impl GeoPoint {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        GeoPoint {
            lat_deg: lat_deg.clamp(-90.0, 90.0),
            lon_deg: wrap_180(lon_deg),
        }
    }

    /// Latitude in degrees, north positive.
    pub fn latitude(&self) -> f64 {
        self.lat_deg
    }

    /// Longitude in degrees, east positive.
    pub fn longitude(&self) -> f64 {
        self.lon_deg
    }
}

// ---------------------------------------------------------------------------
// Great-circle math
// ---------------------------------------------------------------------------

/// Great-circle distance between two surface points (m), by the haversine
/// formula. Symmetric, zero for coincident points, at most `PI * radius`.
pub fn surface_distance(a: GeoPoint, b: GeoPoint, radius: f64) -> f64 {
    let lat_a = a.latitude().to_radians();
    let lat_b = b.latitude().to_radians();
    let d_lat = lat_b - lat_a;
    let d_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    let central_angle = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    radius * central_angle
}

/// Initial compass bearing from `from` to `to`, degrees in [0, 360).
/// North is 0, east is 90.
///
/// Undefined when the points coincide (returns 0 there); callers that can
/// sit exactly on the target should special-case that before asking for a
/// heading. Bearings are not reciprocal in general: `bearing(b, a)` is not
/// `bearing(a, b) + 180` except along meridians and the equator.
pub fn initial_bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat_a = from.latitude().to_radians();
    let lat_b = to.latitude().to_radians();
    let d_lon = (to.longitude() - from.longitude()).to_radians();

    let y = d_lon.sin() * lat_b.cos();
    let x = lat_a.cos() * lat_b.sin() - lat_a.sin() * lat_b.cos() * d_lon.cos();

    wrap_360(y.atan2(x).to_degrees())
}

/// Wrap an angle in degrees into [0, 360).
pub fn wrap_360(deg: f64) -> f64 {
    let wrapped = deg % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Wrap an angle in degrees into [-180, 180).
pub fn wrap_180(deg: f64) -> f64 {
    wrap_360(deg + 180.0) - 180.0
}
