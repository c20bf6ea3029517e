//! Apsis timing from an inertial state vector, via the classical anomaly
//! chain (true, eccentric, mean).

use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::state::OrbitInfo;

/// Time to apoapsis and periapsis of the osculating orbit through `pos` and
/// `vel` (body-centered inertial, m and m/s).
///
/// Valid for elliptical orbits; escape and degenerate trajectories return
/// zeros. Periapsis may lie below the surface, which is the normal case for
/// a ballistic hop.
pub fn apsis_times(pos: &Vector3<f64>, vel: &Vector3<f64>, mu: f64) -> OrbitInfo {
    let r = pos.norm();
    let speed = vel.norm();
    if r < 1.0 {
        return OrbitInfo::default();
    }

    let energy = 0.5 * speed * speed - mu / r;
    if energy >= 0.0 {
        return OrbitInfo::default();
    }
    let sma = -mu / (2.0 * energy);

    // Eccentricity vector
    let e_vec = ((speed * speed - mu / r) * pos - pos.dot(vel) * vel) / mu;
    let ecc = e_vec.norm();
    if ecc >= 1.0 {
        return OrbitInfo::default();
    }

    // True anomaly
    let true_anom = if ecc > 1e-12 {
        let cos_nu = (e_vec.dot(pos) / (ecc * r)).clamp(-1.0, 1.0);
        let nu = cos_nu.acos();
        if pos.dot(vel) < 0.0 { 2.0 * PI - nu } else { nu }
    } else {
        0.0
    };

    // Eccentric then mean anomaly, both continuous over [0, 2*PI)
    let ecc_anom = 2.0
        * ((1.0 - ecc).sqrt() * (true_anom / 2.0).sin())
            .atan2((1.0 + ecc).sqrt() * (true_anom / 2.0).cos());
    let mean_anom = ecc_anom - ecc * ecc_anom.sin();

    let mean_motion = (mu / sma.powi(3)).sqrt();
    let period = 2.0 * PI / mean_motion;
    let since_periapsis = (mean_anom / mean_motion).rem_euclid(period);

    OrbitInfo {
        time_to_apoapsis: (period / 2.0 - since_periapsis).rem_euclid(period),
        time_to_periapsis: period - since_periapsis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const MU: f64 = 3.531_6e12; // m^3/s^2
    const R: f64 = 600_000.0;

    #[test]
    fn ascending_trajectory_sees_apoapsis_first() {
        // Radial-out plus tangential velocity, below circular speed.
        let pos = Vector3::new(R + 10_000.0, 0.0, 0.0);
        let vel = Vector3::new(400.0, 800.0, 0.0);
        let info = apsis_times(&pos, &vel, MU);
        assert!(info.time_to_apoapsis > 0.0);
        assert!(
            info.time_to_apoapsis < info.time_to_periapsis,
            "climbing: apoapsis must be the nearer apsis ({info:?})"
        );
    }

    #[test]
    fn descending_trajectory_sees_periapsis_first() {
        let pos = Vector3::new(R + 10_000.0, 0.0, 0.0);
        let vel = Vector3::new(-400.0, 800.0, 0.0);
        let info = apsis_times(&pos, &vel, MU);
        assert!(info.time_to_periapsis > 0.0);
        assert!(
            info.time_to_periapsis < info.time_to_apoapsis,
            "falling: periapsis must be the nearer apsis ({info:?})"
        );
    }

    #[test]
    fn mirrored_radial_velocity_reflects_apsis_times() {
        // Flipping the radial velocity mirrors the position in the orbit:
        // (time to apoapsis going up) + (time to periapsis coming down)
        // is exactly half a period.
        let pos = Vector3::new(R + 50_000.0, 0.0, 0.0);
        let up = Vector3::new(300.0, 900.0, 0.0);
        let down = Vector3::new(-300.0, 900.0, 0.0);
        let a = apsis_times(&pos, &up, MU);
        let b = apsis_times(&pos, &down, MU);

        let r = pos.norm();
        let energy = 0.5 * up.norm_squared() - MU / r;
        let sma = -MU / (2.0 * energy);
        let period = 2.0 * PI * (sma.powi(3) / MU).sqrt();

        assert_relative_eq!(
            a.time_to_apoapsis + b.time_to_periapsis,
            period / 2.0,
            epsilon = 1e-3
        );
    }

    #[test]
    fn escape_trajectory_reports_nothing() {
        let pos = Vector3::new(R, 0.0, 0.0);
        let v_escape = (2.0 * MU / R).sqrt();
        let vel = Vector3::new(v_escape * 1.1, 0.0, 0.0);
        let info = apsis_times(&pos, &vel, MU);
        assert_eq!(info.time_to_apoapsis, 0.0);
        assert_eq!(info.time_to_periapsis, 0.0);
    }

    #[test]
    fn circular_orbit_half_period_to_apoapsis() {
        let r = R + 100_000.0;
        let v_circ = (MU / r).sqrt();
        let pos = Vector3::new(r, 0.0, 0.0);
        let vel = Vector3::new(0.0, v_circ, 0.0);
        let info = apsis_times(&pos, &vel, MU);
        let period = 2.0 * PI * (r.powi(3) / MU).sqrt();
        // On a circle the anomalies are pinned to periapsis = here.
        assert_relative_eq!(info.time_to_apoapsis, period / 2.0, epsilon = 1.0);
        assert_relative_eq!(info.time_to_periapsis, period, epsilon = 1.0);
    }
}
