//! Coplanar POSIT.
//!
//! Pose from four coplanar model points and their perspective images,
//! found by iterating scaled orthographic projections. For planar targets
//! each scaled orthographic step has two solutions (the plane can tilt
//! either way); both are refined and returned, best first.
//!
//! References: D. Oberkampf, D. DeMenthon, L. Davis, "Iterative Pose
//! Estimation Using Coplanar Feature Points", CVIU 63(3), 1996.

use nalgebra::{Matrix3, Point2, Vector3};
use serde::{Deserialize, Serialize};

use crate::PoseError;

const EPS: f64 = 1e-9;

/// One pose hypothesis: `camera = rotation * model + translation`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseCandidate {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
    /// Mean absolute difference of the four quadrilateral corner angles
    /// between the observation and the reprojected model, in degrees.
    pub error_deg: f64,
    /// Depth of the first model point, which anchors the scaled
    /// orthographic projection.
    pub reference_depth: f64,
}

/// Solver for one fixed planar model and focal length.
#[derive(Clone, Debug)]
pub struct CoplanarPosit {
    model: [Vector3<f64>; 4],
    // rows are model[i] - model[0], i = 1..3
    model_vectors: Matrix3<f64>,
    model_pseudo_inverse: Matrix3<f64>,
    model_normal: Vector3<f64>,
    focal_length: f64,
}

impl CoplanarPosit {
    /// Prepare the solver. Fails if the model points do not span a plane or
    /// the focal length is not positive.
    pub fn new(model: [Vector3<f64>; 4], focal_length: f64) -> Result<Self, PoseError> {
        if !(focal_length > 0.0) || !focal_length.is_finite() {
            return Err(PoseError::PoseUnresolved {
                reason: "focal length must be positive",
            });
        }

        let model_vectors = Matrix3::from_rows(&[
            (model[1] - model[0]).transpose(),
            (model[2] - model[0]).transpose(),
            (model[3] - model[0]).transpose(),
        ]);

        let svd = model_vectors.svd(true, true);
        let sv = svd.singular_values;
        let largest = sv.max();
        let rank = sv.iter().filter(|&&s| s > EPS * largest.max(1.0)).count();
        if rank < 2 {
            return Err(PoseError::PoseUnresolved {
                reason: "model points are collinear",
            });
        }

        let v_t = svd.v_t.ok_or(PoseError::PoseUnresolved {
            reason: "model decomposition failed",
        })?;
        let (smallest, _) = sv
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .ok_or(PoseError::PoseUnresolved {
                reason: "model decomposition failed",
            })?;
        let model_normal = v_t.row(smallest).transpose();

        let model_pseudo_inverse = svd
            .pseudo_inverse(EPS * largest.max(1.0))
            .map_err(|_| PoseError::PoseUnresolved {
                reason: "model decomposition failed",
            })?;

        Ok(Self {
            model,
            model_vectors,
            model_pseudo_inverse,
            model_normal,
            focal_length,
        })
    }

    #[inline]
    pub fn focal_length(&self) -> f64 {
        self.focal_length
    }

    #[inline]
    pub fn model(&self) -> &[Vector3<f64>; 4] {
        &self.model
    }

    /// Estimate the pose from image points in camera-centred coordinates
    /// (`y` up), ordered like the model points.
    ///
    /// Returns the best solution and, when the second branch of the planar
    /// ambiguity is valid, the alternate one.
    pub fn estimate(
        &self,
        points: &[Point2<f64>; 4],
        max_iterations: usize,
        error_limit_deg: f64,
    ) -> Result<(PoseCandidate, Option<PoseCandidate>), PoseError> {
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(PoseError::PoseUnresolved {
                reason: "non-finite image point",
            });
        }

        let mut solutions: Vec<PoseCandidate> = self
            .pos(points, &Vector3::repeat(1.0))
            .into_iter()
            .flatten()
            .map(|start| self.refine(points, start, max_iterations, error_limit_deg))
            .filter(|c| c.error_deg.is_finite())
            .collect();
        solutions.sort_by(|a, b| a.error_deg.total_cmp(&b.error_deg));

        let mut solutions = solutions.into_iter();
        let best = solutions.next().ok_or(PoseError::PoseUnresolved {
            reason: "no pose places the model in front of the camera",
        })?;
        Ok((best, solutions.next()))
    }

    /// Iterate one branch: recompute the perspective correction terms from
    /// the current pose and solve again, keeping the better branch each round.
    fn refine(
        &self,
        points: &[Point2<f64>; 4],
        start: PoseCandidate,
        max_iterations: usize,
        error_limit_deg: f64,
    ) -> PoseCandidate {
        let mut current = start;
        let mut best = current.clone();

        for _ in 0..max_iterations {
            if current.error_deg <= error_limit_deg {
                break;
            }
            let k = current.rotation.row(2).transpose();
            let eps = (self.model_vectors * k / current.reference_depth).add_scalar(1.0);

            let Some(next) = self
                .pos(points, &eps)
                .into_iter()
                .flatten()
                .min_by(|a, b| a.error_deg.total_cmp(&b.error_deg))
            else {
                break;
            };

            let diverging = next.error_deg > current.error_deg;
            if next.error_deg < best.error_deg {
                best = next.clone();
            }
            if diverging {
                break;
            }
            current = next;
        }

        best
    }

    /// One scaled orthographic step with perspective correction `eps`.
    ///
    /// Yields the two mirror solutions; a branch is `None` when its `i` or
    /// `j` vector degenerates.
    fn pos(&self, points: &[Point2<f64>; 4], eps: &Vector3<f64>) -> [Option<PoseCandidate>; 2] {
        let p0 = points[0];
        let xs = Vector3::new(points[1].x, points[2].x, points[3].x);
        let ys = Vector3::new(points[1].y, points[2].y, points[3].y);
        let image_xs = xs.component_mul(eps).add_scalar(-p0.x);
        let image_ys = ys.component_mul(eps).add_scalar(-p0.y);

        let i0 = self.model_pseudo_inverse * image_xs;
        let j0 = self.model_pseudo_inverse * image_ys;

        // lambda + i*mu is the square root of (|J0|^2 - |I0|^2) - 2i (I0 . J0)
        let diff = j0.norm_squared() - i0.norm_squared();
        let ij = i0.dot(&j0);
        let r = (diff * diff + 4.0 * ij * ij).sqrt().sqrt();
        let theta = (-2.0 * ij).atan2(diff) / 2.0;
        let lambda = r * theta.cos();
        let mu = r * theta.sin();

        [1.0, -1.0].map(|sign| {
            let i = i0 + self.model_normal * (lambda * sign);
            let j = j0 + self.model_normal * (mu * sign);
            self.candidate(points, i, j)
        })
    }

    fn candidate(
        &self,
        points: &[Point2<f64>; 4],
        i: Vector3<f64>,
        j: Vector3<f64>,
    ) -> Option<PoseCandidate> {
        let (i_norm, j_norm) = (i.norm(), j.norm());
        if !(i_norm > EPS && j_norm > EPS) {
            return None;
        }

        let i = i / i_norm;
        let k = i.cross(&(j / j_norm));
        let k_norm = k.norm();
        if !(k_norm > EPS) {
            return None;
        }
        let k = k / k_norm;
        let j = k.cross(&i);
        let rotation = Matrix3::from_rows(&[i.transpose(), j.transpose(), k.transpose()]);

        let scale = 0.5 * (i_norm + j_norm);
        let reference_depth = self.focal_length / scale;
        let anchor = rotation * self.model[0];
        let translation = Vector3::new(
            points[0].x / scale - anchor.x,
            points[0].y / scale - anchor.y,
            reference_depth - anchor.z,
        );

        let error_deg = self.error(points, &rotation, &translation);
        Some(PoseCandidate {
            rotation,
            translation,
            error_deg,
            reference_depth,
        })
    }

    /// Mean corner-angle difference between `points` and the model projected
    /// with the given pose. Infinite if a model point lands behind the camera.
    fn error(
        &self,
        points: &[Point2<f64>; 4],
        rotation: &Matrix3<f64>,
        translation: &Vector3<f64>,
    ) -> f64 {
        let mut projected = [Point2::origin(); 4];
        for (dst, m) in projected.iter_mut().zip(self.model.iter()) {
            let v = rotation * m + translation;
            if !(v.z > EPS) {
                return f64::INFINITY;
            }
            *dst = Point2::new(
                v.x * self.focal_length / v.z,
                v.y * self.focal_length / v.z,
            );
        }

        let observed = corner_angles(points);
        let modeled = corner_angles(&projected);
        let err = observed
            .iter()
            .zip(modeled.iter())
            .map(|(a, b)| (a - b).abs())
            .sum::<f64>()
            / 4.0;
        if err.is_finite() {
            err
        } else {
            f64::INFINITY
        }
    }
}

/// Interior angles (degrees) at each corner of the quadrilateral, measured
/// between the edges to its two neighbours.
fn corner_angles(q: &[Point2<f64>; 4]) -> [f64; 4] {
    [
        angle(q[0], q[1], q[3]),
        angle(q[1], q[2], q[0]),
        angle(q[2], q[3], q[1]),
        angle(q[3], q[0], q[2]),
    ]
}

fn angle(apex: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    let u = a - apex;
    let v = b - apex;
    let n = u.norm() * v.norm();
    if n <= EPS {
        return 0.0;
    }
    (u.dot(&v) / n).clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn model(h: f64) -> [Vector3<f64>; 4] {
        [
            Vector3::new(-h, 0.0, h),
            Vector3::new(h, 0.0, h),
            Vector3::new(h, 0.0, -h),
            Vector3::new(-h, 0.0, -h),
        ]
    }

    #[test]
    fn square_has_right_corner_angles() {
        let q = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        for a in corner_angles(&q) {
            assert_abs_diff_eq!(a, 90.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn collinear_model_is_rejected() {
        let line = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(3.0, 0.0, 0.0),
        ];
        assert!(matches!(
            CoplanarPosit::new(line, 640.0),
            Err(PoseError::PoseUnresolved { .. })
        ));
        assert!(CoplanarPosit::new(model(10.0), 0.0).is_err());
    }

    #[test]
    fn recovers_exact_translation_of_frontal_square() {
        let h = 50.0;
        let f = 800.0;
        let posit = CoplanarPosit::new(model(h), f).unwrap();
        // model x -> image x, model z -> image y, centred 400 units away
        let s = f / 400.0;
        let pts = [
            Point2::new(-h * s, h * s),
            Point2::new(h * s, h * s),
            Point2::new(h * s, -h * s),
            Point2::new(-h * s, -h * s),
        ];

        let (best, _) = posit.estimate(&pts, 100, 0.01).unwrap();
        assert!(best.error_deg < 0.01);
        assert_abs_diff_eq!(best.translation.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(best.translation.y, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(best.translation.z, 400.0, epsilon = 1e-6);

        let det = best.rotation.determinant();
        assert_abs_diff_eq!(det, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn non_finite_points_are_unresolved() {
        let posit = CoplanarPosit::new(model(10.0), 640.0).unwrap();
        let mut pts = [Point2::new(0.0, 0.0); 4];
        pts[2].x = f64::NAN;
        assert!(posit.estimate(&pts, 10, 1.0).is_err());
    }
}
