//! Records exchanged with the simulator.
//!
//! Field names match the simulator's msgpack maps, which is why they carry the `_val`
//! suffix. Coordinates are NED (north, east, down) in metres, so altitude is `-z_val`.

use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "uom")]
use uom::si::{f32::Length, length::meter};

/// A point or vector in the simulator's world frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3r {
    pub x_val: f32,
    pub y_val: f32,
    pub z_val: f32,
}

impl Vector3r {
    pub fn new(x_val: f32, y_val: f32, z_val: f32) -> Self {
        Vector3r {
            x_val,
            y_val,
            z_val,
        }
    }

    /// Components as lengths, in x, y, z order.
    #[cfg(feature = "uom")]
    pub fn lengths(&self) -> (Length, Length, Length) {
        (
            Length::new::<meter>(self.x_val),
            Length::new::<meter>(self.y_val),
            Length::new::<meter>(self.z_val),
        )
    }
}

impl fmt::Display for Vector3r {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Vector3r> {{ 'x_val': {}, 'y_val': {}, 'z_val': {} }}",
            self.x_val, self.y_val, self.z_val
        )
    }
}

/// Orientation quaternion. The identity rotation is the default.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quaternionr {
    pub w_val: f32,
    pub x_val: f32,
    pub y_val: f32,
    pub z_val: f32,
}

impl Default for Quaternionr {
    fn default() -> Self {
        Quaternionr {
            w_val: 1.0,
            x_val: 0.0,
            y_val: 0.0,
            z_val: 0.0,
        }
    }
}

/// Estimated kinematics of a vehicle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KinematicsState {
    pub position: Vector3r,
    pub orientation: Quaternionr,
    pub linear_velocity: Vector3r,
    pub angular_velocity: Vector3r,
    pub linear_acceleration: Vector3r,
    pub angular_acceleration: Vector3r,
}

/// Snapshot of a multirotor as reported by `getMultirotorState`.
///
/// Only the fields used by this crate are modelled; anything else the simulator sends is
/// ignored and missing fields fall back to their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultirotorState {
    pub kinematics_estimated: KinematicsState,
    pub timestamp: u64,
    pub landed_state: i32,
    pub ready: bool,
    pub ready_message: String,
    pub can_arm: bool,
}

impl MultirotorState {
    /// Estimated position of the vehicle.
    pub fn position(&self) -> Vector3r {
        self.kinematics_estimated.position
    }

    /// Height above the NED origin.
    #[cfg(feature = "uom")]
    pub fn altitude(&self) -> Length {
        Length::new::<meter>(-self.kinematics_estimated.position.z_val)
    }
}

/// A geofence region: a reference position plus an ordered sequence of corner points.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Boundary {
    pub pos: Vector3r,
    pub boundary: Vec<Vector3r>,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<Boundary> {{ 'boundary': [")?;
        for corner in &self.boundary {
            writeln!(f, "    {},", corner)?;
        }
        write!(f, "], 'pos': {} }}", self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quaternion_defaults_to_identity() {
        let q = Quaternionr::default();
        assert_eq!(q.w_val, 1.0);
        assert_eq!((q.x_val, q.y_val, q.z_val), (0.0, 0.0, 0.0));
    }

    #[test]
    fn position_reads_estimated_kinematics() {
        let mut state = MultirotorState::default();
        state.kinematics_estimated.position = Vector3r::new(1.0, 2.0, -3.0);
        assert_eq!(state.position(), Vector3r::new(1.0, 2.0, -3.0));
    }

    #[test]
    fn boundary_display_lists_corners_in_order() {
        let boundary = Boundary {
            pos: Vector3r::new(0.0, 0.0, -5.0),
            boundary: vec![Vector3r::new(1.0, -1.0, -5.0), Vector3r::new(-1.0, 1.0, -5.0)],
        };

        let text = boundary.to_string();
        let first = text.find("'x_val': 1, 'y_val': -1").unwrap();
        let second = text.find("'x_val': -1, 'y_val': 1").unwrap();
        assert!(first < second);
        assert!(text.ends_with("'pos': <Vector3r> { 'x_val': 0, 'y_val': 0, 'z_val': -5 } }"));
    }

    #[cfg(feature = "uom")]
    #[test]
    fn altitude_is_negated_down_axis() {
        use approx::assert_relative_eq;

        let mut state = MultirotorState::default();
        state.kinematics_estimated.position = Vector3r::new(0.0, 0.0, -5.0);
        assert_relative_eq!(state.altitude().get::<meter>(), 5.0);

        let (x, y, z) = Vector3r::new(1.0, 2.0, 3.0).lengths();
        assert_relative_eq!(x.get::<meter>(), 1.0);
        assert_relative_eq!(y.get::<meter>(), 2.0);
        assert_relative_eq!(z.get::<meter>(), 3.0);
    }
}
