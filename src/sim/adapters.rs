//! Capability adapters over a shared [`SimWorld`].
//!
//! The pilot owns its capabilities as boxed trait objects; these adapters
//! give all six a view of the same world through an `Rc<RefCell<..>>`
//! handle. Single-threaded by construction, matching the pilot's tick
//! model, and no adapter holds a borrow across a call boundary.

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::Vector3;

use crate::state::{ControlInput, ImpactPrediction};
use crate::systems::{
    AttitudeController, AttitudeTarget, AxisLocks, DescentController, ImpactPredictionProvider,
    ThrustController, TimeWarpController, TrajectoryCorrectionService,
};

use super::world::SimWorld;

/// Shared handle to the test world.
pub type SharedWorld = Rc<RefCell<SimWorld>>;

/// Wrap a world for sharing between the adapters and the host loop.
pub fn shared(world: SimWorld) -> SharedWorld {
    Rc::new(RefCell::new(world))
}

pub struct SimAttitude(SharedWorld);

impl SimAttitude {
    pub fn new(world: SharedWorld) -> Self {
        SimAttitude(world)
    }
}

impl AttitudeController for SimAttitude {
    fn set_target(&mut self, target: AttitudeTarget, _requester: &str, _locks: AxisLocks) {
        self.0.borrow_mut().command_attitude(&target);
    }

    fn deactivate(&mut self) {
        self.0.borrow_mut().clear_attitude();
    }

    fn angle_error_to_target(&self) -> f64 {
        self.0.borrow().attitude_error_deg()
    }
}

pub struct SimThrust(SharedWorld);

impl SimThrust {
    pub fn new(world: SharedWorld) -> Self {
        SimThrust(world)
    }
}

impl ThrustController for SimThrust {
    fn set_target_throttle(&mut self, throttle: f64) {
        self.0.borrow_mut().set_throttle(throttle);
    }

    fn thrust_off(&mut self) {
        self.0.borrow_mut().set_throttle(0.0);
    }

    fn thrust_for_delta_v(&mut self, delta_v: f64, time_constant: f64) {
        self.0.borrow_mut().throttle_for_delta_v(delta_v, time_constant);
    }
}

pub struct SimPrediction(SharedWorld);

impl SimPrediction {
    pub fn new(world: SharedWorld) -> Self {
        SimPrediction(world)
    }
}

impl ImpactPredictionProvider for SimPrediction {
    fn current_prediction(&self) -> Option<ImpactPrediction> {
        self.0.borrow_mut().predict_impact()
    }

    fn add_dependent(&mut self, id: &str) {
        self.0.borrow_mut().add_prediction_dependent(id);
    }

    fn remove_dependent(&mut self, id: &str) {
        self.0.borrow_mut().remove_prediction_dependent(id);
    }
}

pub struct SimCorrection(SharedWorld);

impl SimCorrection {
    pub fn new(world: SharedWorld) -> Self {
        SimCorrection(world)
    }
}

impl TrajectoryCorrectionService for SimCorrection {
    fn compute_course_correction(&mut self, _aggressive: bool) -> Vector3<f64> {
        self.0.borrow_mut().course_correction_burn()
    }
}

pub struct SimWarp(SharedWorld);

impl SimWarp {
    pub fn new(world: SharedWorld) -> Self {
        SimWarp(world)
    }
}

impl TimeWarpController for SimWarp {
    fn warp_at_rate(&mut self, rate: f64) {
        self.0.borrow_mut().set_warp_rate(rate);
    }

    fn minimum_warp(&mut self) {
        self.0.borrow_mut().minimum_warp();
    }
}

pub struct SimDescent(SharedWorld);

impl SimDescent {
    pub fn new(world: SharedWorld) -> Self {
        SimDescent(world)
    }
}

impl DescentController for SimDescent {
    fn drive(
        &mut self,
        input: &ControlInput,
        attitude: &mut dyn AttitudeController,
        thrust: &mut dyn ThrustController,
    ) -> String {
        // Drop the world borrow before commanding; the controllers reach
        // back into the same RefCell.
        let (dir, throttle, sink_rate) = { self.0.borrow().descent_command() };

        attitude.set_target(
            AttitudeTarget::inertial_direction(&dir),
            "sim-descent",
            AxisLocks::ALL,
        );
        thrust.set_target_throttle(throttle);

        format!(
            "Final descent: {:.0} m up, {:.1} m/s down",
            input.vehicle.altitude, sink_rate
        )
    }
}
