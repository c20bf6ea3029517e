//! Powered ascent toward the target.

use crate::pilot::PILOT_ID;
use crate::systems::{AttitudeTarget, AxisLocks};

use super::coast::CoastToApoapsis;
use super::course_correction::CourseCorrection;
use super::step::{GuidanceView, Step, StepCtx, CLOSE_RANGE, MIN_TRANSITION_ALTITUDE};

/// First hop phase: hold the launch attitude and burn until the predicted
/// impact point reaches the target.
pub struct Ascend {
    target_heading: f64,
    /// Frozen at construction. Close hops fly a gentle acceleration-capped
    /// throttle for the whole ascent; far hops interpolate on the remaining
    /// along-track gap.
    start_close: bool,
}

impl Ascend {
    /// Captures the heading and the throttle policy for the whole step.
    pub fn new(view: &GuidanceView<'_>) -> Self {
        Ascend {
            target_heading: view.wanted_heading(),
            start_close: view.impact_distance_to_target() <= 2.0 * CLOSE_RANGE,
        }
    }

    pub(crate) fn drive(mut self, ctx: &mut StepCtx<'_>) -> Option<Step> {
        if ctx.view.config.adaptive_heading {
            self.target_heading = ctx.view.wanted_heading();
        }

        let elevation = 90.0 - ctx.view.config.launch_angle();
        ctx.attitude.set_target(
            AttitudeTarget::surface(self.target_heading, elevation),
            PILOT_ID,
            AxisLocks::PITCH_YAW,
        );

        let throttle = if self.start_close {
            close_throttle(ctx.view.twr())
        } else {
            far_throttle(ctx.view.relative_impact_delta())
        };
        ctx.thrust.set_target_throttle(throttle);

        *ctx.status = format!(
            "Hopping at throttle {:.2} at heading {:.1}°",
            throttle, self.target_heading
        );
        Some(Step::Ascend(self))
    }

    pub(crate) fn on_fixed_update(self, ctx: &mut StepCtx<'_>) -> Option<Step> {
        let delta = ctx.view.relative_impact_delta();
        let cutoff_reached = delta <= ctx.view.config.impact_delta()
            && ctx.view.input.vehicle.altitude > MIN_TRANSITION_ALTITUDE;
        if !cutoff_reached {
            return Some(Step::Ascend(self));
        }

        ctx.thrust.thrust_off();
        if ctx.view.config.perform_course_correction {
            return Some(Step::CourseCorrection(CourseCorrection::new()));
        }
        if ctx.view.config.ascend_only {
            return None;
        }
        Some(Step::CoastToApoapsis(CoastToApoapsis::new()))
    }
}

/// Close-hop throttle: cap acceleration near 4 g-equivalents, full throttle
/// on weak vehicles.
fn close_throttle(twr: f64) -> f64 {
    (4.0 / twr).min(1.0)
}

/// Far-hop throttle: full while the along-track gap exceeds [`CLOSE_RANGE`],
/// tapering linearly down to 10% as the gap closes.
fn far_throttle(relative_delta: f64) -> f64 {
    let frac = (relative_delta / CLOSE_RANGE).clamp(0.0, 1.0);
    0.1 + 0.9 * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn far_throttle_full_at_threshold() {
        assert_eq!(far_throttle(CLOSE_RANGE), 1.0);
        assert_eq!(far_throttle(CLOSE_RANGE * 3.0), 1.0);
    }

    #[test]
    fn far_throttle_floor_at_zero_gap() {
        assert_relative_eq!(far_throttle(0.0), 0.1, epsilon = 1e-12);
        assert_relative_eq!(far_throttle(-500.0), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn far_throttle_interpolates_midway() {
        assert_relative_eq!(far_throttle(CLOSE_RANGE / 2.0), 0.55, epsilon = 1e-12);
    }

    #[test]
    fn far_throttle_monotone_in_gap() {
        let mut last = far_throttle(0.0);
        for gap in (100..=1000).step_by(100) {
            let t = far_throttle(gap as f64);
            assert!(t >= last, "throttle must not decrease as the gap grows");
            last = t;
        }
    }

    #[test]
    fn close_throttle_caps_strong_vehicles() {
        assert_relative_eq!(close_throttle(8.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(close_throttle(16.0), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn close_throttle_saturates_weak_vehicles() {
        assert_eq!(close_throttle(2.0), 1.0);
        assert_eq!(close_throttle(4.0), 1.0);
    }
}
