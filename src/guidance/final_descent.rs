//! Terminal descent, delegated to the registered descent controller.

use super::step::{Step, StepCtx};

/// Last hop phase. The hop pilot yields its command ticks to the descent
/// controller and watches for touchdown.
pub struct FinalDescent;

impl FinalDescent {
    pub fn new() -> Self {
        FinalDescent
    }

    pub(crate) fn drive(self, ctx: &mut StepCtx<'_>) -> Option<Step> {
        *ctx.status = ctx.descent.drive(ctx.view.input, ctx.attitude, ctx.thrust);

        // The descent controller still gets the touchdown tick above before
        // the session closes out.
        if ctx.view.input.vehicle.landed {
            return None;
        }
        Some(Step::FinalDescent(self))
    }
}

impl Default for FinalDescent {
    fn default() -> Self {
        FinalDescent::new()
    }
}
