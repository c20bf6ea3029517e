//! Mid-flight correction burn that walks the predicted impact point onto
//! the target.

use crate::pilot::PILOT_ID;
use crate::systems::{AttitudeTarget, AxisLocks};

use super::coast::CoastToApoapsis;
use super::step::{Step, StepCtx};

/// Attitude error below which the correction burn engages, degrees.
pub(crate) const BURN_START_ERROR: f64 = 2.0;
/// Attitude error above which an engaged burn releases, degrees.
pub(crate) const BURN_STOP_ERROR: f64 = 30.0;
/// Horizon for the burn throttle, s.
const BURN_TIME_CONSTANT: f64 = 2.0;

/// Second hop phase. Points along the correction burn vector and throttles
/// through a hysteresis gate so the vehicle does not thrust sideways while
/// still turning.
pub struct CourseCorrection {
    burning: bool,
}

impl CourseCorrection {
    pub fn new() -> Self {
        CourseCorrection { burning: false }
    }

    pub(crate) fn drive(mut self, ctx: &mut StepCtx<'_>) -> Option<Step> {
        // Done regardless of burn state once the miss is small enough.
        if ctx.view.impact_distance_to_target() < ctx.view.config.max_course_correction_error() {
            return Some(Step::CoastToApoapsis(CoastToApoapsis::new()));
        }

        let delta_v = ctx.correction.compute_course_correction(true);
        let magnitude = delta_v.norm();
        if magnitude < 1e-9 {
            ctx.thrust.set_target_throttle(0.0);
            return Some(Step::CourseCorrection(self));
        }

        ctx.attitude
            .set_target(AttitudeTarget::inertial_direction(&delta_v), PILOT_ID, AxisLocks::ALL);
        self.burning = burn_gate(self.burning, ctx.attitude.angle_error_to_target());

        if self.burning {
            ctx.thrust.thrust_for_delta_v(magnitude, BURN_TIME_CONSTANT);
        } else {
            ctx.thrust.set_target_throttle(0.0);
        }

        *ctx.status = format!("Performing course correction of about {magnitude:.1} m/s");
        Some(Step::CourseCorrection(self))
    }
}

impl Default for CourseCorrection {
    fn default() -> Self {
        CourseCorrection::new()
    }
}

/// Burn-gate hysteresis: engage under [`BURN_START_ERROR`], release past
/// [`BURN_STOP_ERROR`], hold the previous state in between.
pub(crate) fn burn_gate(burning: bool, angle_error_deg: f64) -> bool {
    if angle_error_deg < BURN_START_ERROR {
        true
    } else if angle_error_deg > BURN_STOP_ERROR {
        false
    } else {
        burning
    }
}
