use glyphtrack_core::FrameSize;
use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// The glyph's coordinate frame projected into the image.
///
/// Points are in camera-centred pixel coordinates (`y` up) unless converted
/// with [`AxisProjection::to_image`]. Each axis has the length of the model
/// radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisProjection {
    pub origin: Point2<f64>,
    pub x_axis: Point2<f64>,
    pub y_axis: Point2<f64>,
    pub z_axis: Point2<f64>,
}

impl AxisProjection {
    pub(crate) fn project(
        rotation: &Matrix3<f64>,
        translation: &Vector3<f64>,
        model_radius: f64,
        frame: FrameSize,
    ) -> Self {
        let transform = Matrix4::new_translation(translation)
            * rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&Vector3::repeat(model_radius));
        let width = frame.width as f64;
        let project = |p: Point3<f64>| {
            let v = transform * p.to_homogeneous();
            Point2::new(v.x / v.z * width, v.y / v.z * width)
        };

        Self {
            origin: project(Point3::origin()),
            x_axis: project(Point3::new(1.0, 0.0, 0.0)),
            y_axis: project(Point3::new(0.0, 1.0, 0.0)),
            z_axis: project(Point3::new(0.0, 0.0, 1.0)),
        }
    }

    /// `[origin, x, y, z]`.
    pub fn points(&self) -> [Point2<f64>; 4] {
        [self.origin, self.x_axis, self.y_axis, self.z_axis]
    }

    /// Convert to top-left image pixel coordinates (`y` down).
    pub fn to_image(&self, frame: FrameSize) -> Self {
        Self {
            origin: frame.to_image(self.origin),
            x_axis: frame.to_image(self.x_axis),
            y_axis: frame.to_image(self.y_axis),
            z_axis: frame.to_image(self.z_axis),
        }
    }
}
