//! Vehicle capability traits and their assembly.
//!
//! The guidance core never talks to a concrete vehicle. The host registers
//! one implementation per capability; [`VesselSystems::builder`] checks the
//! set is complete before a pilot can be constructed, which is the only
//! fallible point in the crate's control path.

mod attitude;

pub use attitude::{AttitudeTarget, AxisLocks, ReferenceFrame};

use nalgebra::Vector3;
use thiserror::Error;

use crate::state::{ControlInput, ImpactPrediction};

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Holds a commanded orientation. Implementations must tolerate repeated
/// `set_target` and `deactivate` calls.
pub trait AttitudeController {
    /// Latch a new attitude target on behalf of `requester`.
    fn set_target(&mut self, target: AttitudeTarget, requester: &str, locks: AxisLocks);

    /// Release attitude authority entirely.
    fn deactivate(&mut self);

    /// Angle between current and commanded orientation, degrees.
    fn angle_error_to_target(&self) -> f64;
}

/// Throttle authority. Commands latch until replaced.
pub trait ThrustController {
    /// Command a throttle fraction; implementations clamp to [0, 1].
    fn set_target_throttle(&mut self, throttle: f64);

    /// Cut thrust and drop the latched throttle command.
    fn thrust_off(&mut self);

    /// Throttle to deliver `delta_v` m/s of velocity change over roughly
    /// `time_constant` seconds at current mass and thrust.
    fn thrust_for_delta_v(&mut self, delta_v: f64, time_constant: f64);
}

/// External landing-spot estimator for the current ballistic trajectory.
pub trait ImpactPredictionProvider {
    /// Latest estimate, or `None` while none has been computed yet.
    fn current_prediction(&self) -> Option<ImpactPrediction>;

    /// Keep the predictor running as long as `id` is subscribed.
    fn add_dependent(&mut self, id: &str);

    fn remove_dependent(&mut self, id: &str);
}

/// Computes the burn that walks the predicted impact point onto the target.
pub trait TrajectoryCorrectionService {
    /// Required velocity change in the inertial frame. `aggressive` asks for
    /// the full correction rather than a damped one.
    fn compute_course_correction(&mut self, aggressive: bool) -> Vector3<f64>;
}

/// Time-acceleration authority.
pub trait TimeWarpController {
    fn warp_at_rate(&mut self, rate: f64);

    /// Drop back to real-time.
    fn minimum_warp(&mut self);
}

/// Terminal-descent authority. The hop pilot hands over the whole tick.
pub trait DescentController {
    /// Run one descent control tick and return a status line.
    fn drive(
        &mut self,
        input: &ControlInput,
        attitude: &mut dyn AttitudeController,
        thrust: &mut dyn ThrustController,
    ) -> String;
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// The complete capability set a hop pilot drives.
pub struct VesselSystems {
    pub attitude: Box<dyn AttitudeController>,
    pub thrust: Box<dyn ThrustController>,
    pub prediction: Box<dyn ImpactPredictionProvider>,
    pub correction: Box<dyn TrajectoryCorrectionService>,
    pub warp: Box<dyn TimeWarpController>,
    pub descent: Box<dyn DescentController>,
}

impl VesselSystems {
    pub fn builder() -> SystemsBuilder {
        SystemsBuilder::default()
    }
}

/// A capability the host failed to register.
#[derive(Debug, Error)]
pub enum GuidanceError {
    #[error("attitude controller not registered")]
    MissingAttitude,
    #[error("thrust controller not registered")]
    MissingThrust,
    #[error("impact prediction provider not registered")]
    MissingPrediction,
    #[error("trajectory correction service not registered")]
    MissingCorrection,
    #[error("time warp controller not registered")]
    MissingWarp,
    #[error("descent controller not registered")]
    MissingDescent,
}

#[derive(Default)]
pub struct SystemsBuilder {
    attitude: Option<Box<dyn AttitudeController>>,
    thrust: Option<Box<dyn ThrustController>>,
    prediction: Option<Box<dyn ImpactPredictionProvider>>,
    correction: Option<Box<dyn TrajectoryCorrectionService>>,
    warp: Option<Box<dyn TimeWarpController>>,
    descent: Option<Box<dyn DescentController>>,
}

impl SystemsBuilder {
    pub fn attitude(mut self, c: impl AttitudeController + 'static) -> Self {
        self.attitude = Some(Box::new(c));
        self
    }

    pub fn thrust(mut self, c: impl ThrustController + 'static) -> Self {
        self.thrust = Some(Box::new(c));
        self
    }

    pub fn prediction(mut self, p: impl ImpactPredictionProvider + 'static) -> Self {
        self.prediction = Some(Box::new(p));
        self
    }

    pub fn correction(mut self, s: impl TrajectoryCorrectionService + 'static) -> Self {
        self.correction = Some(Box::new(s));
        self
    }

    pub fn warp(mut self, w: impl TimeWarpController + 'static) -> Self {
        self.warp = Some(Box::new(w));
        self
    }

    pub fn descent(mut self, d: impl DescentController + 'static) -> Self {
        self.descent = Some(Box::new(d));
        self
    }

    /// Fails with the first missing capability, in registration-seam order.
    pub fn build(self) -> Result<VesselSystems, GuidanceError> {
        Ok(VesselSystems {
            attitude: self.attitude.ok_or(GuidanceError::MissingAttitude)?,
            thrust: self.thrust.ok_or(GuidanceError::MissingThrust)?,
            prediction: self.prediction.ok_or(GuidanceError::MissingPrediction)?,
            correction: self.correction.ok_or(GuidanceError::MissingCorrection)?,
            warp: self.warp.ok_or(GuidanceError::MissingWarp)?,
            descent: self.descent.ok_or(GuidanceError::MissingDescent)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullAttitude;
    impl AttitudeController for NullAttitude {
        fn set_target(&mut self, _: AttitudeTarget, _: &str, _: AxisLocks) {}
        fn deactivate(&mut self) {}
        fn angle_error_to_target(&self) -> f64 {
            0.0
        }
    }

    struct NullThrust;
    impl ThrustController for NullThrust {
        fn set_target_throttle(&mut self, _: f64) {}
        fn thrust_off(&mut self) {}
        fn thrust_for_delta_v(&mut self, _: f64, _: f64) {}
    }

    struct NullPrediction;
    impl ImpactPredictionProvider for NullPrediction {
        fn current_prediction(&self) -> Option<ImpactPrediction> {
            None
        }
        fn add_dependent(&mut self, _: &str) {}
        fn remove_dependent(&mut self, _: &str) {}
    }

    struct NullCorrection;
    impl TrajectoryCorrectionService for NullCorrection {
        fn compute_course_correction(&mut self, _: bool) -> Vector3<f64> {
            Vector3::zeros()
        }
    }

    struct NullWarp;
    impl TimeWarpController for NullWarp {
        fn warp_at_rate(&mut self, _: f64) {}
        fn minimum_warp(&mut self) {}
    }

    struct NullDescent;
    impl DescentController for NullDescent {
        fn drive(
            &mut self,
            _: &ControlInput,
            _: &mut dyn AttitudeController,
            _: &mut dyn ThrustController,
        ) -> String {
            String::new()
        }
    }

    fn full_builder() -> SystemsBuilder {
        VesselSystems::builder()
            .attitude(NullAttitude)
            .thrust(NullThrust)
            .prediction(NullPrediction)
            .correction(NullCorrection)
            .warp(NullWarp)
            .descent(NullDescent)
    }

    #[test]
    fn complete_builder_succeeds() {
        assert!(full_builder().build().is_ok());
    }

    #[test]
    fn missing_attitude_is_reported() {
        let err = VesselSystems::builder()
            .thrust(NullThrust)
            .prediction(NullPrediction)
            .correction(NullCorrection)
            .warp(NullWarp)
            .descent(NullDescent)
            .build()
            .err();
        assert!(matches!(err, Some(GuidanceError::MissingAttitude)));
    }

    #[test]
    fn missing_descent_is_reported() {
        let err = VesselSystems::builder()
            .attitude(NullAttitude)
            .thrust(NullThrust)
            .prediction(NullPrediction)
            .correction(NullCorrection)
            .warp(NullWarp)
            .build()
            .err();
        assert!(matches!(err, Some(GuidanceError::MissingDescent)));
    }

    #[test]
    fn error_messages_name_the_capability() {
        assert_eq!(
            GuidanceError::MissingPrediction.to_string(),
            "impact prediction provider not registered"
        );
    }
}
