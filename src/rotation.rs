//! Rotation compensation: aim a hop at where the target's ground track will
//! be at touchdown, not where the target is now.

use std::f64::consts::{PI, SQRT_2};

use nalgebra::Vector3;

use crate::body::Body;
use crate::geodesy;

/// Ballistic time-of-flight estimate for a hop covering `distance` m.
///
/// Models the hop as a flat-ground 45-degree trajectory with launch speed
/// `sqrt(g * d)`, independent of the configured launch angle, so the heading
/// correction does not oscillate when the operator retunes the angle
/// mid-planning.
pub fn estimate_time_of_flight(surface_gravity: f64, distance: f64) -> f64 {
    let launch_speed = (surface_gravity * distance).sqrt();
    2.0 * launch_speed / (surface_gravity * SQRT_2)
}

/// Time-of-flight estimate from the transfer ellipse the launch angle
/// implies: half the period of an orbit with periapsis at the current radius
/// and apoapsis raised by `distance * tan(launch_angle)`.
pub fn estimate_time_of_flight_orbital(
    body: &Body,
    current_altitude: f64,
    distance: f64,
    launch_angle_deg: f64,
) -> f64 {
    let periapsis = body.radius + current_altitude;
    let apoapsis = periapsis + distance * launch_angle_deg.to_radians().tan();
    let semi_major = (periapsis + apoapsis) / 2.0;
    PI * (semi_major.powi(3) / body.grav_parameter).sqrt()
}

/// Where to aim so that the target's ground track arrives under the vehicle
/// at touchdown.
///
/// The body sweeps both the vehicle's and the target's surface points during
/// the flight; what matters to the lander is the drift of the target
/// *relative* to the launch point, so the aim point offsets the target by the
/// swept minus unswept separation vector. A non-rotating body returns the
/// target unchanged.
pub fn adjusted_target(
    body: &Body,
    current: &Vector3<f64>,
    target: &Vector3<f64>,
    time_of_flight: f64,
) -> Vector3<f64> {
    let sweep = body.rotation_sweep(time_of_flight);
    let separation = target - current;
    target + (sweep * separation - separation)
}

/// Compass heading toward the rotation-adjusted target, degrees in [0, 360).
pub fn corrected_heading(body: &Body, current: &Vector3<f64>, target: &Vector3<f64>) -> f64 {
    let distance = (target - current).norm();
    let tof = estimate_time_of_flight(body.surface_gravity(), distance);
    let aim = adjusted_target(body, current, target, tof);
    geodesy::initial_bearing(body.geo_of(current), body.geo_of(&aim))
}
