//! Unpowered coast up the ballistic arc.

use super::final_descent::FinalDescent;
use super::step::{Step, StepCtx};

/// Warp rate requested while coasting, when the host allows autowarp.
pub(crate) const COAST_WARP_RATE: f64 = 100.0;

/// Third hop phase: engines off, optionally time-accelerated, waiting to
/// crest the arc.
pub struct CoastToApoapsis;

impl CoastToApoapsis {
    pub fn new() -> Self {
        CoastToApoapsis
    }

    pub(crate) fn on_fixed_update(self, ctx: &mut StepCtx<'_>) -> Option<Step> {
        let orbit = ctx.view.input.orbit;

        // On the way up the next apsis ahead is apoapsis, so its time is the
        // smaller of the two. Once periapsis is the nearer apsis the crest
        // is behind us and the descent begins.
        if orbit.time_to_apoapsis > orbit.time_to_periapsis {
            ctx.warp.minimum_warp();
            return Some(Step::FinalDescent(FinalDescent::new()));
        }

        ctx.thrust.thrust_off();
        if ctx.view.input.autowarp {
            ctx.warp.warp_at_rate(COAST_WARP_RATE);
        }
        *ctx.status = format!("Coasting to apoapsis in {:.1}s", orbit.time_to_apoapsis);
        Some(Step::CoastToApoapsis(self))
    }
}

impl Default for CoastToApoapsis {
    fn default() -> Self {
        CoastToApoapsis::new()
    }
}
