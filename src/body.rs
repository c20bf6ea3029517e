//! The central body a hop flies over: physical constants, the mapping
//! between body-relative cartesian positions and surface coordinates, and
//! the body's own rotation.

use std::f64::consts::PI;

use nalgebra::{Unit, UnitQuaternion, Vector3};

use crate::geodesy::GeoPoint;

/// A rotating spherical body with a point-mass gravity field.
///
/// Positions handed to [`Body`] methods are body-relative cartesian vectors
/// (origin at the body center, +Z along the rotation axis for the presets,
/// latitude 0 / longitude 0 on +X).
#[derive(Debug, Clone)]
pub struct Body {
    pub name: &'static str,
    /// Mean radius, m.
    pub radius: f64,
    /// Standard gravitational parameter, m^3/s^2.
    pub grav_parameter: f64,
    /// Sidereal rotation period, s. Non-finite or zero disables rotation
    /// compensation.
    pub rotation_period: f64,
    /// Unit rotation axis.
    pub rotation_axis: Unit<Vector3<f64>>,
}

impl Body {
    /// Surface gravitational acceleration, m/s^2.
    pub fn surface_gravity(&self) -> f64 {
        self.grav_parameter / (self.radius * self.radius)
    }

    /// Point-mass gravitational acceleration at a body-relative position.
    pub fn gravity_accel(&self, pos: &Vector3<f64>) -> Vector3<f64> {
        let r = pos.norm();
        if r < 1.0 {
            return Vector3::zeros();
        }
        -pos * (self.grav_parameter / (r * r * r))
    }

    /// Surface coordinates under a body-relative position.
    pub fn geo_of(&self, pos: &Vector3<f64>) -> GeoPoint {
        let r = pos.norm();
        if r < f64::EPSILON {
            return GeoPoint::new(0.0, 0.0);
        }
        let lat = (pos.z / r).clamp(-1.0, 1.0).asin().to_degrees();
        let lon = pos.y.atan2(pos.x).to_degrees();
        GeoPoint::new(lat, lon)
    }

    /// Body-relative position of a surface point at the given altitude.
    pub fn surface_point(&self, geo: GeoPoint, altitude: f64) -> Vector3<f64> {
        let lat = geo.latitude().to_radians();
        let lon = geo.longitude().to_radians();
        let r = self.radius + altitude;
        Vector3::new(
            r * lat.cos() * lon.cos(),
            r * lat.cos() * lon.sin(),
            r * lat.sin(),
        )
    }

    /// Altitude of a body-relative position above the mean radius, m.
    pub fn altitude_of(&self, pos: &Vector3<f64>) -> f64 {
        pos.norm() - self.radius
    }

    /// Rotation the body sweeps through in `dt` seconds, about its axis.
    /// Identity for non-rotating bodies.
    pub fn rotation_sweep(&self, dt: f64) -> UnitQuaternion<f64> {
        if !self.rotation_period.is_finite() || self.rotation_period == 0.0 {
            return UnitQuaternion::identity();
        }
        let angle = 2.0 * PI * dt / self.rotation_period;
        UnitQuaternion::from_axis_angle(&self.rotation_axis, angle)
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// 600 km game-scale body, the default hop environment.
    pub fn kerbin() -> Body {
        Body {
            name: "Kerbin",
            radius: 600_000.0,
            grav_parameter: 3.531_6e12,
            rotation_period: 21_549.425,
            rotation_axis: Vector3::z_axis(),
        }
    }

    /// Airless 200 km moon, slow rotator.
    pub fn mun() -> Body {
        Body {
            name: "Mun",
            radius: 200_000.0,
            grav_parameter: 6.513_839_8e10,
            rotation_period: 138_984.38,
            rotation_axis: Vector3::z_axis(),
        }
    }

    /// Spherical Earth with a sidereal day.
    pub fn earth() -> Body {
        Body {
            name: "Earth",
            radius: 6_371_000.0,
            grav_parameter: 3.986_004_418e14,
            rotation_period: 86_164.1,
            rotation_axis: Vector3::z_axis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn kerbin_surface_gravity() {
        let g = presets::kerbin().surface_gravity();
        assert_relative_eq!(g, 9.81, epsilon = 0.01);
    }

    #[test]
    fn earth_surface_gravity() {
        let g = presets::earth().surface_gravity();
        assert_relative_eq!(g, 9.82, epsilon = 0.02);
    }

    #[test]
    fn geo_roundtrip() {
        let body = presets::kerbin();
        let geo = GeoPoint::new(23.0, -71.5);
        let pos = body.surface_point(geo, 1_500.0);
        let back = body.geo_of(&pos);
        assert_relative_eq!(back.latitude(), geo.latitude(), epsilon = 1e-9);
        assert_relative_eq!(back.longitude(), geo.longitude(), epsilon = 1e-9);
        assert_relative_eq!(body.altitude_of(&pos), 1_500.0, epsilon = 1e-6);
    }

    #[test]
    fn gravity_points_inward() {
        let body = presets::kerbin();
        let pos = body.surface_point(GeoPoint::new(10.0, 10.0), 0.0);
        let g = body.gravity_accel(&pos);
        assert!(g.dot(&pos) < 0.0, "gravity must point toward the body center");
        assert_relative_eq!(g.norm(), body.surface_gravity(), epsilon = 1e-9);
    }

    #[test]
    fn full_period_sweep_is_identity() {
        let body = presets::kerbin();
        let q = body.rotation_sweep(body.rotation_period);
        assert!(q.angle() < 1e-9 || (2.0 * PI - q.angle()) < 1e-9);
    }

    #[test]
    fn non_rotating_body_sweeps_nothing() {
        let mut body = presets::mun();
        body.rotation_period = f64::INFINITY;
        let q = body.rotation_sweep(1_000.0);
        assert_eq!(q, UnitQuaternion::identity());
    }

    #[test]
    fn sweep_moves_equatorial_point_east() {
        let body = presets::kerbin();
        let p = body.surface_point(GeoPoint::new(0.0, 0.0), 0.0);
        let moved = body.rotation_sweep(100.0) * p;
        let geo = body.geo_of(&moved);
        assert!(geo.longitude() > 0.0, "prograde rotation carries points east");
    }
}
