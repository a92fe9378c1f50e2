//! Yaw/pitch/roll of a glyph relative to the camera.

use nalgebra::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Rotation of a glyph that squarely faces the camera: model `x` along image
/// right, model `z` along image up, the glyph normal (model `y`) pointing
/// back at the camera.
pub fn facing_rotation() -> Matrix3<f64> {
    Matrix3::new(
        1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, //
        0.0, -1.0, 0.0,
    )
}

/// Euler angles in degrees.
///
/// Measured from the facing pose: `rotation = Ry(yaw) * Rx(pitch) * Rz(roll) * facing_rotation()`
/// with yaw about the camera's vertical axis, pitch about its lateral axis
/// and roll about the optical axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl Orientation {
    pub fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Decompose a model-to-camera rotation. Pitch is in `[-90, 90]`.
    pub fn from_rotation(rotation: &Matrix3<f64>) -> Self {
        let rel = rotation * facing_rotation().transpose();
        let yaw = rel[(0, 2)].atan2(rel[(2, 2)]);
        let pitch = (-rel[(1, 2)]).clamp(-1.0, 1.0).asin();
        let roll = rel[(1, 0)].atan2(rel[(1, 1)]);
        Self {
            yaw: yaw.to_degrees(),
            pitch: pitch.to_degrees(),
            roll: roll.to_degrees(),
        }
    }

    /// Compose the model-to-camera rotation these angles describe.
    pub fn to_rotation(&self) -> Matrix3<f64> {
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), self.yaw.to_radians());
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), self.pitch.to_radians());
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), self.roll.to_radians());
        (ry * rx * rz).matrix() * facing_rotation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn facing_pose_is_zero() {
        let o = Orientation::from_rotation(&facing_rotation());
        assert_abs_diff_eq!(o.yaw, 0.0);
        assert_abs_diff_eq!(o.pitch, 0.0);
        assert_abs_diff_eq!(o.roll, 0.0);
    }

    #[test]
    fn decomposition_inverts_composition() {
        for &(yaw, pitch, roll) in &[(30.0, 0.0, 0.0), (-40.0, 25.0, 10.0), (5.0, -60.0, 170.0)] {
            let o = Orientation::from_rotation(&Orientation::new(yaw, pitch, roll).to_rotation());
            assert_abs_diff_eq!(o.yaw, yaw, epsilon = 1e-9);
            assert_abs_diff_eq!(o.pitch, pitch, epsilon = 1e-9);
            assert_abs_diff_eq!(o.roll, roll, epsilon = 1e-9);
        }
    }

    #[test]
    fn in_plane_quarter_turn_is_roll() {
        let r = Orientation::new(0.0, 0.0, -90.0).to_rotation();
        // model x axis now points down the image
        let x = r * Vector3::x();
        assert_abs_diff_eq!(x, Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-12);
    }
}
