//! Session ownership and configuration for the hop pilot.

mod config;
mod session;

pub use config::{ConfigError, HopConfig};
pub use session::{HopPilot, PILOT_ID};
