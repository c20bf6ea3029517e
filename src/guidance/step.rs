//! The guidance step machine.
//!
//! A hop is a value of the closed [`Step`] enum; the pilot holds
//! `Option<Step>` and `None` means no hop is in progress. Each tick consumes
//! the current step and returns the next one, so a transition is a plain
//! return value and the set of phases is exhaustive at the `match`.

use nalgebra::Vector3;

use crate::body::Body;
use crate::geodesy::{self, GeoPoint};
use crate::pilot::HopConfig;
use crate::rotation;
use crate::state::ControlInput;
use crate::systems::{
    AttitudeController, DescentController, ImpactPredictionProvider, ThrustController,
    TimeWarpController, TrajectoryCorrectionService,
};

use super::ascend::Ascend;
use super::coast::CoastToApoapsis;
use super::course_correction::CourseCorrection;
use super::final_descent::FinalDescent;

/// Which host callback produced a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    /// High-rate command tick.
    Drive,
    /// Lower-rate physics tick, where transition decisions live.
    Physics,
}

/// Along-track range over which the far-start ascent throttle tapers, m.
/// A hop starting with the predicted impact within twice this distance is a
/// close hop and uses the acceleration-capped throttle instead.
pub const CLOSE_RANGE: f64 = 1_000.0;

/// Ascent cutoff never fires below this altitude, m. Keeps a prediction
/// glitch on the pad from ending the hop before it leaves the ground.
pub(crate) const MIN_TRANSITION_ALTITUDE: f64 = 10.0;

// ---------------------------------------------------------------------------
// Per-tick context
// ---------------------------------------------------------------------------

/// Read-only geodesy and prediction queries over one tick's input.
pub struct GuidanceView<'a> {
    pub body: &'a Body,
    pub config: &'a HopConfig,
    pub input: &'a ControlInput,
    pub prediction: &'a dyn ImpactPredictionProvider,
}

impl GuidanceView<'_> {
    pub fn current_geo(&self) -> GeoPoint {
        self.body.geo_of(&self.input.vehicle.position)
    }

    pub fn target_geo(&self) -> GeoPoint {
        self.body.geo_of(&self.input.target.position)
    }

    /// Straight-line distance to the target, m.
    pub fn distance_to_target(&self) -> f64 {
        (self.input.target.position - self.input.vehicle.position).norm()
    }

    /// Great-circle heading toward the target as it sits now.
    pub fn heading_to_target(&self) -> f64 {
        geodesy::initial_bearing(self.current_geo(), self.target_geo())
    }

    /// Heading toward where the target's ground track will be at touchdown.
    pub fn corrected_heading(&self) -> f64 {
        rotation::corrected_heading(
            self.body,
            &self.input.vehicle.position,
            &self.input.target.position,
        )
    }

    /// The heading ascent should fly: rotation-corrected when configured,
    /// the plain target heading otherwise.
    pub fn wanted_heading(&self) -> f64 {
        if self.config.use_corrected_heading {
            self.corrected_heading()
        } else {
            self.heading_to_target()
        }
    }

    /// Latest predicted landing point. Falls back to the vehicle's own
    /// surface position while no prediction exists, which reads as a
    /// zero-length hop still entirely ahead of the vehicle.
    pub fn predicted_impact(&self) -> GeoPoint {
        match self.prediction.current_prediction() {
            Some(p) => p.end_position,
            None => self.current_geo(),
        }
    }

    /// Surface distance from the predicted impact to the target, m.
    pub fn impact_distance_to_target(&self) -> f64 {
        geodesy::surface_distance(self.predicted_impact(), self.target_geo(), self.body.radius)
    }

    /// Signed along-track gap from the predicted impact to the target, m.
    ///
    /// Both points are dropped to the reference surface and the gap is the
    /// projection of impact-to-target onto the current-to-target direction,
    /// resolved in the tangent plane at the vehicle's surface point.
    /// Positive while the impact trails the target, negative once the
    /// trajectory overshoots. When the vehicle is already over the target
    /// there is no along-track direction and the raw miss distance is
    /// returned instead.
    pub fn relative_impact_delta(&self) -> f64 {
        let current = self.body.surface_point(self.current_geo(), 0.0);
        let target = self.body.surface_point(self.target_geo(), 0.0);
        let impact = self.body.surface_point(self.predicted_impact(), 0.0);

        let up = current / current.norm();
        let tangent = |v: Vector3<f64>| v - up * v.dot(&up);

        let track = tangent(target - current);
        if track.norm() < 1e-9 {
            return self.impact_distance_to_target();
        }
        let along = track / track.norm();
        tangent(target - impact).dot(&along)
    }

    /// Flat-ground time-of-flight estimate for the remaining hop, s.
    pub fn estimate_time_of_flight(&self) -> f64 {
        rotation::estimate_time_of_flight(self.body.surface_gravity(), self.distance_to_target())
    }

    /// Seconds until predicted touchdown; 0 while no prediction exists.
    pub fn time_to_land(&self) -> f64 {
        self.prediction
            .current_prediction()
            .map_or(0.0, |p| (p.end_time - self.input.now).max(0.0))
    }

    /// Thrust-to-weight ratio at the body's surface gravity.
    pub fn twr(&self) -> f64 {
        self.input.vehicle.thrust_available
            / (self.input.vehicle.mass * self.body.surface_gravity())
    }
}

/// Everything a step tick gets to touch: the read-only view plus the
/// command-side capabilities and the pilot's status line.
pub struct StepCtx<'a> {
    pub view: GuidanceView<'a>,
    pub attitude: &'a mut dyn AttitudeController,
    pub thrust: &'a mut dyn ThrustController,
    pub correction: &'a mut dyn TrajectoryCorrectionService,
    pub warp: &'a mut dyn TimeWarpController,
    pub descent: &'a mut dyn DescentController,
    pub status: &'a mut String,
}

// ---------------------------------------------------------------------------
// The step enum
// ---------------------------------------------------------------------------

/// One phase of a hop. The pilot drives whichever variant it holds and
/// installs whatever `advance` returns.
pub enum Step {
    Ascend(Ascend),
    CourseCorrection(CourseCorrection),
    CoastToApoapsis(CoastToApoapsis),
    FinalDescent(FinalDescent),
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Ascend(_) => "Ascend",
            Step::CourseCorrection(_) => "CourseCorrection",
            Step::CoastToApoapsis(_) => "CoastToApoapsis",
            Step::FinalDescent(_) => "FinalDescent",
        }
    }

    /// Run one tick and return the step to hold next, or `None` when the
    /// hop is complete. Phases without work on a given tick kind pass
    /// through unchanged.
    pub fn advance(self, kind: TickKind, ctx: &mut StepCtx<'_>) -> Option<Step> {
        match (self, kind) {
            (Step::Ascend(s), TickKind::Drive) => s.drive(ctx),
            (Step::Ascend(s), TickKind::Physics) => s.on_fixed_update(ctx),
            (Step::CourseCorrection(s), TickKind::Drive) => s.drive(ctx),
            (Step::CourseCorrection(s), TickKind::Physics) => Some(Step::CourseCorrection(s)),
            (Step::CoastToApoapsis(s), TickKind::Drive) => Some(Step::CoastToApoapsis(s)),
            (Step::CoastToApoapsis(s), TickKind::Physics) => s.on_fixed_update(ctx),
            (Step::FinalDescent(s), TickKind::Drive) => s.drive(ctx),
            (Step::FinalDescent(s), TickKind::Physics) => Some(Step::FinalDescent(s)),
        }
    }
}

// ---------------------------------------------------------------------------
// Step-flow tests against scripted capabilities
// ---------------------------------------------------------------------------
