//! Per-tick snapshot types. The host samples these once per callback and
//! hands them to the pilot by reference; the guidance core never reaches
//! back into live vehicle state mid-tick.

use nalgebra::Vector3;

use crate::geodesy::GeoPoint;

/// Vehicle state as sampled at the start of a tick.
#[derive(Debug, Clone)]
pub struct VehicleState {
    /// Body-relative position, m.
    pub position: Vector3<f64>,
    /// Altitude above the reference surface, m.
    pub altitude: f64,
    /// Current total mass, kg.
    pub mass: f64,
    /// Maximum thrust available right now, N.
    pub thrust_available: f64,
    /// Landed or splashed down.
    pub landed: bool,
}

/// The hop destination. Chosen by the host; read-only to guidance.
#[derive(Debug, Clone)]
pub struct Target {
    /// Body-relative position, m.
    pub position: Vector3<f64>,
    /// Terrain altitude at the target, m.
    pub altitude: f64,
}

/// Apsis times of the current trajectory's osculating orbit.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrbitInfo {
    /// Seconds until apoapsis passage.
    pub time_to_apoapsis: f64,
    /// Seconds until periapsis passage.
    pub time_to_periapsis: f64,
}

/// A landing estimate for the current ballistic trajectory, produced by an
/// external prediction service.
#[derive(Debug, Clone, Copy)]
pub struct ImpactPrediction {
    /// Predicted touchdown point.
    pub end_position: GeoPoint,
    /// Predicted touchdown time, absolute universal time, s.
    pub end_time: f64,
}

/// Everything a control tick reads.
#[derive(Debug, Clone)]
pub struct ControlInput {
    pub vehicle: VehicleState,
    pub target: Target,
    pub orbit: OrbitInfo,
    /// Universal time at the tick, s.
    pub now: f64,
    /// Whether the host currently permits automatic time acceleration.
    pub autowarp: bool,
}
