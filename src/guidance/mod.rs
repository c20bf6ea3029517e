//! Hop guidance: the four flight phases and the machinery that ticks them.

mod ascend;
mod coast;
mod course_correction;
mod final_descent;
mod step;

pub use ascend::Ascend;
pub use coast::CoastToApoapsis;
pub use course_correction::CourseCorrection;
pub use final_descent::FinalDescent;
pub use step::{GuidanceView, Step, StepCtx, TickKind, CLOSE_RANGE};
