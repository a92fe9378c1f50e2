use glyphtrack_core::FrameSize;
use nalgebra::{Matrix3, Point2, Vector3};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{AxisProjection, CoplanarPosit, Orientation, PoseCandidate, PoseError, PoseParams};

/// Quadrilaterals smaller than this (px², camera-centred) carry no pose.
const MIN_AREA: f64 = 1.0;

/// Corners of the square glyph model, matching the quadrilateral order
/// upper-left, upper-right, lower-right, lower-left.
///
/// The glyph lies in the model `x`/`z` plane; `y` is its outward normal.
pub fn square_model(half_extent: f64) -> [Vector3<f64>; 4] {
    let h = half_extent;
    [
        Vector3::new(-h, 0.0, h),
        Vector3::new(h, 0.0, h),
        Vector3::new(h, 0.0, -h),
        Vector3::new(-h, 0.0, -h),
    ]
}

/// Estimated pose of one glyph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanarPose {
    /// Model-to-camera rotation of the best solution.
    pub rotation: Matrix3<f64>,
    /// Model origin in camera coordinates, in model units.
    pub translation: Vector3<f64>,
    /// Distance from the model centre to its farthest corner.
    pub model_radius: f64,
    /// Yaw/pitch/roll of `rotation`.
    pub orientation: Orientation,
    /// Residual corner-angle error of the best solution, degrees.
    pub error_deg: f64,
    /// The other solution of the planar ambiguity, when it exists.
    pub alternate: Option<PoseCandidate>,
    pub frame: FrameSize,
}

impl PlanarPose {
    /// Project the model axes (origin, `x`, `y`, `z`), scaled by the model
    /// radius, into camera-centred pixel coordinates.
    pub fn project_axes(&self) -> AxisProjection {
        AxisProjection::project(
            &self.rotation,
            &self.translation,
            self.model_radius,
            self.frame,
        )
    }

    pub fn alternate_orientation(&self) -> Option<Orientation> {
        self.alternate
            .as_ref()
            .map(|c| Orientation::from_rotation(&c.rotation))
    }
}

fn shoelace(points: &[Point2<f64>; 4]) -> f64 {
    let mut acc = 0.0;
    for i in 0..4 {
        let a = points[i];
        let b = points[(i + 1) % 4];
        acc += a.x * b.y - b.x * a.y;
    }
    0.5 * acc.abs()
}

/// Estimate the pose of a glyph from its quadrilateral.
///
/// `quad` holds image pixels (top-left origin) ordered upper-left,
/// upper-right, lower-right, lower-left in glyph orientation. Points outside
/// the frame are clamped to its border. The focal length is the frame width.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(quad, params),
        fields(width = frame.width, height = frame.height)
    )
)]
pub fn estimate_pose(
    quad: &[Point2<i32>],
    frame: FrameSize,
    params: &PoseParams,
) -> Result<PlanarPose, PoseError> {
    let [a, b, c, d] = <[Point2<i32>; 4]>::try_from(quad)
        .map_err(|_| PoseError::InvalidGeometry { points: quad.len() })?;
    if frame.is_empty() {
        return Err(PoseError::PoseUnresolved {
            reason: "empty frame",
        });
    }

    let points = [a, b, c, d].map(|p| frame.to_centered(p));
    if shoelace(&points) < MIN_AREA {
        return Err(PoseError::PoseUnresolved {
            reason: "degenerate quadrilateral",
        });
    }

    let model = square_model(params.half_extent);
    let centre = model.iter().sum::<Vector3<f64>>() / 4.0;
    let model_radius = model
        .iter()
        .map(|m| (m - centre).norm())
        .fold(0.0, f64::max);

    let posit = CoplanarPosit::new(model, frame.focal_length())?;
    let (best, alternate) =
        posit.estimate(&points, params.max_iterations, params.error_limit_deg)?;

    log::trace!(
        "pose error {:.3} deg (alternate {:?})",
        best.error_deg,
        alternate.as_ref().map(|c| c.error_deg)
    );

    Ok(PlanarPose {
        orientation: Orientation::from_rotation(&best.rotation),
        rotation: best.rotation,
        translation: best.translation,
        model_radius,
        error_deg: best.error_deg,
        alternate,
        frame,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn frontal_quad() -> Vec<Point2<i32>> {
        vec![
            Point2::new(270, 190),
            Point2::new(370, 190),
            Point2::new(370, 290),
            Point2::new(270, 290),
        ]
    }

    /// Project the model seen with `orientation` at `translation` into pixels.
    fn synthesize(
        orientation: Orientation,
        translation: Vector3<f64>,
        frame: FrameSize,
        half_extent: f64,
    ) -> Vec<Point2<i32>> {
        let r = orientation.to_rotation();
        let f = frame.focal_length();
        square_model(half_extent)
            .iter()
            .map(|m| {
                let v = r * m + translation;
                let p = frame.to_image(Point2::new(v.x * f / v.z, v.y * f / v.z));
                Point2::new(p.x.round() as i32, p.y.round() as i32)
            })
            .collect()
    }

    fn closest(pose: &PlanarPose, target: Orientation) -> Orientation {
        let dist = |o: &Orientation| {
            (o.yaw - target.yaw).abs()
                + (o.pitch - target.pitch).abs()
                + (o.roll - target.roll).abs()
        };
        let mut best = pose.orientation;
        if let Some(alt) = pose.alternate_orientation() {
            if dist(&alt) < dist(&best) {
                best = alt;
            }
        }
        best
    }

    #[test]
    fn frontal_square_has_zero_angles() {
        let frame = FrameSize::new(640, 480);
        let pose = estimate_pose(&frontal_quad(), frame, &PoseParams::default()).unwrap();

        assert_abs_diff_eq!(pose.orientation.yaw, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(pose.orientation.pitch, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(pose.orientation.roll, 0.0, epsilon = 1e-3);

        // 100 px wide glyph of 113 model units at focal length 640
        assert_abs_diff_eq!(pose.translation.x, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(pose.translation.y, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(pose.translation.z, 723.2, epsilon = 1e-3);
        assert_abs_diff_eq!(pose.model_radius, 56.5 * 2f64.sqrt(), epsilon = 1e-9);
        assert!(pose.error_deg < 1e-6);
    }

    #[test]
    fn corner_order_shift_reads_as_roll() {
        let frame = FrameSize::new(640, 480);
        let mut quad = frontal_quad();
        quad.rotate_left(1);
        let pose = estimate_pose(&quad, frame, &PoseParams::default()).unwrap();

        assert_abs_diff_eq!(pose.orientation.yaw, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(pose.orientation.pitch, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(pose.orientation.roll, -90.0, epsilon = 1e-3);
    }

    #[test]
    fn recovers_yaw_of_turned_glyph() {
        let frame = FrameSize::new(2000, 2000);
        let truth = Orientation::new(30.0, 0.0, 0.0);
        let quad = synthesize(truth, Vector3::new(0.0, 0.0, 300.0), frame, 56.5);
        let params = PoseParams {
            error_limit_deg: 0.05,
            ..PoseParams::default()
        };

        let pose = estimate_pose(&quad, frame, &params).unwrap();
        assert!(pose.error_deg < 1.0, "error {}", pose.error_deg);

        let o = closest(&pose, truth);
        assert_abs_diff_eq!(o.yaw, 30.0, epsilon = 2.0);
        assert_abs_diff_eq!(o.pitch, 0.0, epsilon = 2.0);
        assert_abs_diff_eq!(o.roll, 0.0, epsilon = 2.0);
    }

    #[test]
    fn oblique_glyph_keeps_both_solutions() {
        let frame = FrameSize::new(2000, 2000);
        let truth = Orientation::new(30.0, 0.0, 0.0);
        let quad = synthesize(truth, Vector3::new(0.0, 0.0, 300.0), frame, 56.5);

        let pose = estimate_pose(&quad, frame, &PoseParams::default()).unwrap();
        let alt = pose
            .alternate
            .as_ref()
            .expect("planar ambiguity keeps the second solution");
        assert!(alt.error_deg.is_finite());
        assert!(alt.error_deg >= pose.error_deg);
        assert!(pose.alternate_orientation().is_some());
    }

    #[test]
    fn recovers_pitch_of_tilted_glyph() {
        let frame = FrameSize::new(2000, 2000);
        let truth = Orientation::new(0.0, -25.0, 0.0);
        let quad = synthesize(truth, Vector3::new(20.0, -10.0, 350.0), frame, 56.5);
        let params = PoseParams {
            error_limit_deg: 0.05,
            ..PoseParams::default()
        };

        let pose = estimate_pose(&quad, frame, &params).unwrap();
        let o = closest(&pose, truth);
        assert_abs_diff_eq!(o.yaw, 0.0, epsilon = 2.0);
        assert_abs_diff_eq!(o.pitch, -25.0, epsilon = 2.0);
        assert_abs_diff_eq!(o.roll, 0.0, epsilon = 2.0);
    }

    #[test]
    fn wrong_point_count_is_invalid_geometry() {
        let frame = FrameSize::new(640, 480);
        let quad = &frontal_quad()[..3];
        assert_eq!(
            estimate_pose(quad, frame, &PoseParams::default()),
            Err(PoseError::InvalidGeometry { points: 3 })
        );
    }

    #[test]
    fn degenerate_quads_are_unresolved() {
        let frame = FrameSize::new(640, 480);
        let params = PoseParams::default();

        let point = vec![Point2::new(100, 100); 4];
        assert!(matches!(
            estimate_pose(&point, frame, &params),
            Err(PoseError::PoseUnresolved { .. })
        ));

        let line = vec![
            Point2::new(10, 10),
            Point2::new(20, 20),
            Point2::new(30, 30),
            Point2::new(40, 40),
        ];
        assert!(matches!(
            estimate_pose(&line, frame, &params),
            Err(PoseError::PoseUnresolved { .. })
        ));

        assert!(matches!(
            estimate_pose(&frontal_quad(), FrameSize::new(0, 480), &params),
            Err(PoseError::PoseUnresolved { .. })
        ));
    }

    #[test]
    fn frontal_axes_projection() {
        let frame = FrameSize::new(640, 480);
        let pose = estimate_pose(&frontal_quad(), frame, &PoseParams::default()).unwrap();
        let axes = pose.project_axes();

        let arm = 50.0 * 2f64.sqrt();
        assert_abs_diff_eq!(axes.origin.x, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(axes.origin.y, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(axes.x_axis.x, arm, epsilon = 1e-3);
        assert_abs_diff_eq!(axes.x_axis.y, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(axes.z_axis.x, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(axes.z_axis.y, arm, epsilon = 1e-3);
        // the normal points straight at the camera
        assert_abs_diff_eq!(axes.y_axis.x, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(axes.y_axis.y, 0.0, epsilon = 1e-3);

        let img = axes.to_image(frame);
        assert_abs_diff_eq!(img.origin.x, 320.0, epsilon = 1e-3);
        assert_abs_diff_eq!(img.origin.y, 240.0, epsilon = 1e-3);
        assert_abs_diff_eq!(img.z_axis.y, 240.0 - arm, epsilon = 1e-3);
    }
}
