//! Guidance core for point-to-point surface hops: fly a vehicle from one
//! spot on a rotating body to another on a powered ballistic arc.
//!
//! A hop runs through four phases held by the [`HopPilot`]: powered ascent
//! toward the target, an optional mid-flight course correction, an unpowered
//! coast over the top of the arc, and a terminal descent delegated to the
//! registered descent controller. The pilot never talks to a concrete
//! vehicle; the host registers one implementation per capability trait in
//! [`systems`] and feeds the pilot a fresh [`ControlInput`] snapshot on each
//! of its two tick callbacks.
//!
//! ```ignore
//! let systems = VesselSystems::builder()
//!     .attitude(my_attitude)
//!     .thrust(my_thrust)
//!     .prediction(my_predictor)
//!     .correction(my_correction)
//!     .warp(my_warp)
//!     .descent(my_lander)
//!     .build()?;
//!
//! let mut pilot = HopPilot::new(systems, body::presets::kerbin());
//! pilot.config_mut().set_launch_angle(50.0);
//! pilot.hop("caller", &input);
//! loop {
//!     pilot.drive(&input);          // command rate
//!     pilot.on_fixed_update(&input); // physics rate
//!     if !pilot.active() { break; }
//! }
//! ```
//!
//! The [`sim`] module carries a small ballistic world wired to all six
//! capabilities, used by the demo binary and the end-to-end tests.

pub mod body;
pub mod geodesy;
pub mod guidance;
pub mod pilot;
pub mod rotation;
pub mod sim;
pub mod state;
pub mod systems;

pub use body::Body;
pub use geodesy::GeoPoint;
pub use guidance::{Step, TickKind};
pub use pilot::{HopConfig, HopPilot};
pub use state::{ControlInput, ImpactPrediction, OrbitInfo, Target, VehicleState};
pub use systems::{GuidanceError, VesselSystems};
