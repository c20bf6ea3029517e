//! A self-contained ballistic test world.
//!
//! One point-mass vehicle over a rotating spherical body, integrated with
//! RK4 in the body-centered inertial frame. Rich enough to fly a full hop
//! (liftoff, cutoff, coast, descent) against the real guidance stack; not a
//! flight-dynamics model.

use std::f64::consts::PI;

use nalgebra::{Matrix3, Unit, UnitQuaternion, Vector3};

use crate::body::Body;
use crate::geodesy::{self, GeoPoint};
use crate::state::{ControlInput, ImpactPrediction, OrbitInfo, Target, VehicleState};
use crate::systems::{AttitudeTarget, ReferenceFrame};

use super::orbit;

const G0: f64 = 9.806_65; // m/s^2, for Isp

/// Vehicle parameters for the test world.
#[derive(Debug, Clone)]
pub struct SimVehicle {
    pub dry_mass: f64,        // kg
    pub propellant_mass: f64, // kg
    pub max_thrust: f64,      // N
    pub isp: f64,             // s
    /// Attitude slew rate, rad/s.
    pub slew_rate: f64,
}

impl Default for SimVehicle {
    fn default() -> Self {
        SimVehicle {
            dry_mass: 3_000.0,
            propellant_mass: 2_500.0,
            max_thrust: 220_000.0,
            isp: 310.0,
            slew_rate: 0.5,
        }
    }
}

/// The world state behind the capability adapters.
pub struct SimWorld {
    pub body: Body,
    time: f64,
    pos: Vector3<f64>, // inertial, m
    vel: Vector3<f64>, // inertial, m/s
    mass: f64,
    dry_mass: f64,
    max_thrust: f64,
    isp: f64,
    throttle: f64,
    thrust_dir: Vector3<f64>,            // current thrust axis, inertial unit
    commanded_dir: Option<Vector3<f64>>, // attitude target, inertial unit
    slew_rate: f64,
    target: GeoPoint,
    warp_rate: f64,
    landed: bool,
    cached_prediction: Option<(f64, Option<ImpactPrediction>)>,
    prediction_dependents: Vec<String>,
}

impl SimWorld {
    /// A vehicle sitting on the surface at `start`, co-rotating with the
    /// ground, aimed at nothing.
    pub fn new(body: Body, start: GeoPoint, target: GeoPoint, vehicle: SimVehicle) -> Self {
        // Body-fixed and inertial frames coincide at t = 0.
        let pos = body.surface_point(start, 0.0);
        let vel = angular_velocity(&body).cross(&pos);
        let up = pos.normalize();
        SimWorld {
            time: 0.0,
            pos,
            vel,
            mass: vehicle.dry_mass + vehicle.propellant_mass,
            dry_mass: vehicle.dry_mass,
            max_thrust: vehicle.max_thrust,
            isp: vehicle.isp,
            throttle: 0.0,
            thrust_dir: up,
            commanded_dir: None,
            slew_rate: vehicle.slew_rate,
            target,
            warp_rate: 1.0,
            landed: true,
            cached_prediction: None,
            prediction_dependents: Vec::new(),
            body,
        }
    }

    // -----------------------------------------------------------------------
    // Read-only views
    // -----------------------------------------------------------------------

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn landed(&self) -> bool {
        self.landed
    }

    pub fn altitude(&self) -> f64 {
        self.body.altitude_of(&self.pos)
    }

    pub fn throttle(&self) -> f64 {
        self.throttle
    }

    pub fn warp_rate(&self) -> f64 {
        self.warp_rate
    }

    pub fn propellant(&self) -> f64 {
        self.mass - self.dry_mass
    }

    pub fn target_geo(&self) -> GeoPoint {
        self.target
    }

    /// Vehicle surface coordinates (body-fixed).
    pub fn surface_geo(&self) -> GeoPoint {
        self.body.geo_of(&self.body_fixed_pos())
    }

    /// Ground-relative speed, m/s.
    pub fn ground_speed(&self) -> f64 {
        (self.vel - angular_velocity(&self.body).cross(&self.pos)).norm()
    }

    /// Surface distance from the vehicle's ground point to the target, m.
    pub fn miss_distance(&self) -> f64 {
        geodesy::surface_distance(self.surface_geo(), self.target, self.body.radius)
    }

    /// Snapshot for one pilot tick. Positions are body-fixed.
    pub fn control_input(&self, autowarp: bool) -> ControlInput {
        let bf_pos = self.body_fixed_pos();
        ControlInput {
            vehicle: VehicleState {
                position: bf_pos,
                altitude: self.body.altitude_of(&bf_pos),
                mass: self.mass,
                thrust_available: self.available_thrust(),
                landed: self.landed,
            },
            target: Target {
                position: self.body.surface_point(self.target, 0.0),
                altitude: 0.0,
            },
            orbit: self.orbit_info(),
            now: self.time,
            autowarp,
        }
    }

    pub fn orbit_info(&self) -> OrbitInfo {
        orbit::apsis_times(&self.pos, &self.vel, self.body.grav_parameter)
    }

    fn body_fixed_pos(&self) -> Vector3<f64> {
        self.body.rotation_sweep(-self.time) * self.pos
    }

    fn available_thrust(&self) -> f64 {
        if self.mass > self.dry_mass {
            self.max_thrust
        } else {
            0.0
        }
    }

    // -----------------------------------------------------------------------
    // Commands (used by the capability adapters)
    // -----------------------------------------------------------------------

    pub(crate) fn command_attitude(&mut self, target: &AttitudeTarget) {
        let axis = target.thrust_axis();
        let dir = match target.frame {
            ReferenceFrame::Inertial => axis,
            ReferenceFrame::SurfaceNorth => {
                let local_to_body = self.surface_basis();
                self.body.rotation_sweep(self.time) * (local_to_body * axis)
            }
        };
        self.commanded_dir = Some(dir.normalize());
    }

    pub(crate) fn clear_attitude(&mut self) {
        self.commanded_dir = None;
    }

    pub(crate) fn attitude_error_deg(&self) -> f64 {
        match self.commanded_dir {
            Some(want) => self.thrust_dir.angle(&want).to_degrees(),
            None => 0.0,
        }
    }

    pub(crate) fn set_throttle(&mut self, throttle: f64) {
        self.throttle = throttle.clamp(0.0, 1.0);
    }

    /// Throttle that delivers `delta_v` over `time_constant` seconds at the
    /// current mass, saturating at full thrust.
    pub(crate) fn throttle_for_delta_v(&mut self, delta_v: f64, time_constant: f64) {
        let wanted_accel = delta_v / time_constant.max(1e-6);
        let full_accel = self.available_thrust() / self.mass;
        if full_accel > 0.0 {
            self.set_throttle(wanted_accel / full_accel);
        } else {
            self.set_throttle(0.0);
        }
    }

    pub(crate) fn set_warp_rate(&mut self, rate: f64) {
        self.warp_rate = rate.max(1.0);
    }

    pub(crate) fn minimum_warp(&mut self) {
        self.warp_rate = 1.0;
    }

    pub(crate) fn add_prediction_dependent(&mut self, id: &str) {
        self.prediction_dependents.push(id.to_string());
    }

    pub(crate) fn remove_prediction_dependent(&mut self, id: &str) {
        self.prediction_dependents.retain(|d| d != id);
    }

    /// Ballistic forward propagation to the surface, memoized per sim time.
    /// `None` while landed, while nobody subscribed, or when the trajectory
    /// does not come down within the propagation budget.
    pub(crate) fn predict_impact(&mut self) -> Option<ImpactPrediction> {
        if let Some((at, cached)) = self.cached_prediction {
            if at == self.time {
                return cached;
            }
        }
        let fresh = if self.landed || self.prediction_dependents.is_empty() {
            None
        } else {
            self.compute_impact()
        };
        self.cached_prediction = Some((self.time, fresh));
        fresh
    }

    fn compute_impact(&self) -> Option<ImpactPrediction> {
        const PREDICT_DT: f64 = 0.5; // s
        const MAX_STEPS: usize = 8_000;

        let mut pos = self.pos;
        let mut vel = self.vel;
        let mut t = self.time;
        let no_thrust = Vector3::zeros();
        for _ in 0..MAX_STEPS {
            let (p, v) = rk4_ballistic(&self.body, &pos, &vel, &no_thrust, PREDICT_DT);
            t += PREDICT_DT;
            if self.body.altitude_of(&p) <= 0.0 {
                // Resolve against the ground as it will sit at touchdown.
                let body_fixed = self.body.rotation_sweep(-t) * p;
                return Some(ImpactPrediction {
                    end_position: self.body.geo_of(&body_fixed),
                    end_time: t,
                });
            }
            pos = p;
            vel = v;
        }
        None
    }

    /// Burn that moves the predicted impact point onto the target, spread
    /// over the remaining flight time. Zero when there is nothing to fix.
    pub(crate) fn course_correction_burn(&mut self) -> Vector3<f64> {
        let Some(pred) = self.predict_impact() else {
            return Vector3::zeros();
        };
        let time_left = (pred.end_time - self.time).max(1.0);

        // Miss vector across the ground, lifted into the inertial frame the
        // ground will occupy at touchdown.
        let target_bf = self.body.surface_point(self.target, 0.0);
        let impact_bf = self.body.surface_point(pred.end_position, 0.0);
        let miss = self.body.rotation_sweep(pred.end_time) * (target_bf - impact_bf);
        miss / time_left
    }

    /// Retrograde-and-brake terminal descent command:
    /// (thrust direction, throttle, descent rate).
    pub(crate) fn descent_command(&self) -> (Vector3<f64>, f64, f64) {
        let up = self.pos.normalize();
        let rel = self.vel - angular_velocity(&self.body).cross(&self.pos);
        let speed = rel.norm();
        let vspeed = rel.dot(&up); // negative while falling

        let dir = if speed > 1.0 { -rel / speed } else { up };

        let g = self.body.surface_gravity();
        let full_accel = self.available_thrust() / self.mass;
        let net_brake = (full_accel - g).max(0.1);
        let stop_distance = speed * speed / (2.0 * net_brake);

        let throttle = if vspeed < 0.0
            && full_accel > 0.0
            && self.altitude() < 1.5 * stop_distance + 50.0
        {
            // Hover thrust plus braking proportional to the excess sink rate.
            let brake = (-vspeed - 2.0).max(0.0) * 0.8;
            ((g + brake) / full_accel).clamp(0.0, 1.0)
        } else {
            0.0
        };

        (dir, throttle, -vspeed)
    }

    // -----------------------------------------------------------------------
    // Integration
    // -----------------------------------------------------------------------

    /// Advance the world by `dt` seconds of simulated time.
    pub fn step(&mut self, dt: f64) {
        self.slew(dt);

        if self.landed && !self.lifting_off() {
            // Ride the ground.
            self.pos = self.body.rotation_sweep(dt) * self.pos;
            self.vel = angular_velocity(&self.body).cross(&self.pos);
            self.time += dt;
            return;
        }
        self.landed = false;

        let thrust_accel = self.thrust_dir * (self.throttle * self.available_thrust() / self.mass);
        let (pos, vel) = rk4_ballistic(&self.body, &self.pos, &self.vel, &thrust_accel, dt);
        self.pos = pos;
        self.vel = vel;
        self.burn_propellant(dt);
        self.time += dt;

        let up = self.pos.normalize();
        let ground_vel = angular_velocity(&self.body).cross(&self.pos);
        let descending = (self.vel - ground_vel).dot(&up) < 0.0;
        if self.body.altitude_of(&self.pos) <= 0.0 && descending {
            // Touchdown: clamp to the surface, co-rotate with the ground.
            self.pos = up * self.body.radius;
            self.vel = angular_velocity(&self.body).cross(&self.pos);
            self.landed = true;
            self.throttle = 0.0;
        }
    }

    fn lifting_off(&self) -> bool {
        self.throttle * self.available_thrust() / self.mass > self.body.surface_gravity()
    }

    fn burn_propellant(&mut self, dt: f64) {
        let mass_flow = self.throttle * self.available_thrust() / (self.isp * G0);
        self.mass = (self.mass - mass_flow * dt).max(self.dry_mass);
    }

    fn slew(&mut self, dt: f64) {
        let Some(want) = self.commanded_dir else {
            return;
        };
        match UnitQuaternion::rotation_between(&self.thrust_dir, &want) {
            Some(full) => {
                let angle = full.angle();
                if angle < 1e-9 {
                    self.thrust_dir = want;
                    return;
                }
                let frac = ((self.slew_rate * dt) / angle).min(1.0);
                self.thrust_dir = (full.powf(frac) * self.thrust_dir).normalize();
            }
            None => {
                // Antiparallel command: kick sideways, converge next steps.
                let kick = UnitQuaternion::from_axis_angle(
                    &orthonormal(&self.thrust_dir),
                    (self.slew_rate * dt).min(PI / 2.0),
                );
                self.thrust_dir = kick * self.thrust_dir;
            }
        }
    }

    /// Columns map local [north, east, up] axes to body-fixed coordinates at
    /// the vehicle's current ground point.
    fn surface_basis(&self) -> Matrix3<f64> {
        let up = self.body_fixed_pos().normalize();
        let axis = self.body.rotation_axis.into_inner();
        let east_raw = axis.cross(&up);
        let east = if east_raw.norm() < 1e-9 {
            // On the pole every direction is south; pick one.
            Vector3::y()
        } else {
            east_raw.normalize()
        };
        let north = up.cross(&east);
        Matrix3::from_columns(&[north, east, up])
    }
}

fn angular_velocity(body: &Body) -> Vector3<f64> {
    if !body.rotation_period.is_finite() || body.rotation_period == 0.0 {
        return Vector3::zeros();
    }
    body.rotation_axis.into_inner() * (2.0 * PI / body.rotation_period)
}

fn orthonormal(v: &Vector3<f64>) -> Unit<Vector3<f64>> {
    let pick = if v.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
    Unit::new_normalize(v.cross(&pick))
}

/// Single RK4 step of the point-mass translational state, thrust held
/// constant over the step.
fn rk4_ballistic(
    body: &Body,
    pos: &Vector3<f64>,
    vel: &Vector3<f64>,
    thrust_accel: &Vector3<f64>,
    dt: f64,
) -> (Vector3<f64>, Vector3<f64>) {
    let accel = |p: &Vector3<f64>| body.gravity_accel(p) + thrust_accel;

    let k1p = *vel;
    let k1v = accel(pos);
    let k2p = vel + k1v * (dt * 0.5);
    let k2v = accel(&(pos + k1p * (dt * 0.5)));
    let k3p = vel + k2v * (dt * 0.5);
    let k3v = accel(&(pos + k2p * (dt * 0.5)));
    let k4p = vel + k3v * dt;
    let k4v = accel(&(pos + k3p * dt));

    (
        pos + (k1p + 2.0 * k2p + 2.0 * k3p + k4p) * (dt / 6.0),
        vel + (k1v + 2.0 * k2v + 2.0 * k3v + k4v) * (dt / 6.0),
    )
}
