//! Attitude command types shared between the guidance steps and whatever
//! attitude controller the host registers.

use std::f64::consts::PI;

use nalgebra::{UnitQuaternion, Vector3};

/// Frame an attitude target is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceFrame {
    /// Local surface frame at the vehicle: +X north, +Y east, +Z zenith.
    /// Identity orientation puts the thrust axis on +Z.
    SurfaceNorth,
    /// Body-centered inertial frame. Identity puts the thrust axis on +Z.
    Inertial,
}

/// Which axes the controller should hold. Unlocked axes are left to other
/// systems (or to drift).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisLocks {
    pub pitch: bool,
    pub yaw: bool,
    pub roll: bool,
}

impl AxisLocks {
    pub const ALL: AxisLocks = AxisLocks { pitch: true, yaw: true, roll: true };
    /// Hold pitch and yaw, leave roll free.
    pub const PITCH_YAW: AxisLocks = AxisLocks { pitch: true, yaw: true, roll: false };
}

/// An orientation command, tagged with its reference frame.
#[derive(Debug, Clone, Copy)]
pub struct AttitudeTarget {
    pub orientation: UnitQuaternion<f64>,
    pub frame: ReferenceFrame,
}

impl AttitudeTarget {
    /// Surface-frame attitude from a compass heading and an elevation.
    ///
    /// `heading_deg` is compass degrees (0 north, 90 east); `pitch_deg` is
    /// the thrust-axis elevation above the local horizontal, so 90 points
    /// straight up. Composed yaw-then-tilt about the surface frame.
    pub fn surface(heading_deg: f64, pitch_deg: f64) -> Self {
        let yaw = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), heading_deg.to_radians());
        let tilt =
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), (90.0 - pitch_deg).to_radians());
        AttitudeTarget {
            orientation: yaw * tilt,
            frame: ReferenceFrame::SurfaceNorth,
        }
    }

    /// Point the thrust axis along `direction` in the inertial frame.
    pub fn inertial_direction(direction: &Vector3<f64>) -> Self {
        let orientation = UnitQuaternion::rotation_between(&Vector3::z(), direction)
            .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI));
        AttitudeTarget {
            orientation,
            frame: ReferenceFrame::Inertial,
        }
    }

    /// Direction of the commanded thrust axis, in the target's own frame.
    pub fn thrust_axis(&self) -> Vector3<f64> {
        self.orientation * Vector3::z()
    }
}
