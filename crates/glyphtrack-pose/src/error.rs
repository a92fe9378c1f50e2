/// Pose estimation failures.
///
/// Both are per-detection: the glyph is still recognized, it just has no pose.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PoseError {
    #[error("expected 4 quadrilateral points, got {points}")]
    InvalidGeometry { points: usize },
    #[error("pose could not be resolved: {reason}")]
    PoseUnresolved { reason: &'static str },
}
