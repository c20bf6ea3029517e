//! Operator-editable hop parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunable hop parameters, persisted between sessions.
///
/// The numeric fields go through validated setters; the toggles are plain
/// booleans the operator can flip at any time, including mid-hop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HopConfig {
    launch_angle: f64,
    max_course_correction_error: f64,
    impact_delta: f64,
    /// Insert a mid-flight correction burn between ascent and coast.
    pub perform_course_correction: bool,
    /// End the hop as soon as the ascent cutoff is reached.
    pub ascend_only: bool,
    /// Recompute the ascent heading every command tick instead of freezing
    /// it at ignition.
    pub adaptive_heading: bool,
    /// Aim at the rotation-adjusted target rather than the target itself.
    pub use_corrected_heading: bool,
}

impl Default for HopConfig {
    fn default() -> Self {
        HopConfig {
            launch_angle: 45.0,
            max_course_correction_error: 20.0,
            impact_delta: 0.0,
            perform_course_correction: false,
            ascend_only: false,
            adaptive_heading: false,
            use_corrected_heading: false,
        }
    }
}

impl HopConfig {
    /// Thrust-axis angle from the zenith at ignition, degrees.
    pub fn launch_angle(&self) -> f64 {
        self.launch_angle
    }

    /// Clamped into [0, 90]. 0 launches straight up, 90 lies on the horizon.
    pub fn set_launch_angle(&mut self, degrees: f64) {
        self.launch_angle = degrees.clamp(0.0, 90.0);
    }

    /// Predicted-impact miss distance below which the correction burn is
    /// considered done, m.
    pub fn max_course_correction_error(&self) -> f64 {
        self.max_course_correction_error
    }

    /// Clamped to non-negative.
    pub fn set_max_course_correction_error(&mut self, meters: f64) {
        self.max_course_correction_error = meters.max(0.0);
    }

    /// Along-track offset at which ascent thrust cuts off, m. Zero cuts
    /// thrust once the predicted impact reaches the target; negative values
    /// deliberately overshoot.
    pub fn impact_delta(&self) -> f64 {
        self.impact_delta
    }

    pub fn set_impact_delta(&mut self, meters: f64) {
        self.impact_delta = meters;
    }

    /// Flatten to string pairs for the host's keyed settings store.
    pub fn to_record(&self) -> Vec<(String, String)> {
        vec![
            ("launch_angle".into(), self.launch_angle.to_string()),
            (
                "max_course_correction_error".into(),
                self.max_course_correction_error.to_string(),
            ),
            ("impact_delta".into(), self.impact_delta.to_string()),
            (
                "perform_course_correction".into(),
                self.perform_course_correction.to_string(),
            ),
            ("ascend_only".into(), self.ascend_only.to_string()),
            ("adaptive_heading".into(), self.adaptive_heading.to_string()),
            (
                "use_corrected_heading".into(),
                self.use_corrected_heading.to_string(),
            ),
        ]
    }

    /// Rebuild from string pairs. Unknown keys are ignored (host stores mix
    /// modules' settings together); known keys with unparseable values fail.
    /// Numeric values pass through the validating setters.
    pub fn from_record<'a, I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = HopConfig::default();
        for (key, value) in pairs {
            match key {
                "launch_angle" => config.set_launch_angle(parse_f64(key, value)?),
                "max_course_correction_error" => {
                    config.set_max_course_correction_error(parse_f64(key, value)?)
                }
                "impact_delta" => config.set_impact_delta(parse_f64(key, value)?),
                "perform_course_correction" => {
                    config.perform_course_correction = parse_bool(key, value)?
                }
                "ascend_only" => config.ascend_only = parse_bool(key, value)?,
                "adaptive_heading" => config.adaptive_heading = parse_bool(key, value)?,
                "use_corrected_heading" => config.use_corrected_heading = parse_bool(key, value)?,
                _ => {}
            }
        }
        Ok(config)
    }
}

/// A persisted setting that failed to parse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value `{value}` for setting `{key}`")]
    InvalidValue { key: String, value: String },
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
