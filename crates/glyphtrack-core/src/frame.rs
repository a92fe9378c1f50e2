use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Pixel dimensions of the frame a detection came from.
///
/// Besides the plain size, this defines the camera-centred coordinate system
/// used by pose estimation: origin at the frame centre, `x` to the right and
/// `y` pointing **up**.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Effective focal length in pixels.
    ///
    /// There is no calibration step: the frame width is used as focal length.
    #[inline]
    pub fn focal_length(&self) -> f64 {
        self.width as f64
    }

    /// Map an image pixel (top-left origin, `y` down) into camera-centred
    /// coordinates.
    ///
    /// Coordinates are clamped to `[0, dimension - 1]` first, so detections
    /// touching or leaving the frame border stay inside the frame.
    pub fn to_centered(&self, p: Point2<i32>) -> Point2<f64> {
        let max_x = self.width.saturating_sub(1) as i32;
        let max_y = self.height.saturating_sub(1) as i32;
        let x = p.x.clamp(0, max_x.max(0)) as f64;
        let y = p.y.clamp(0, max_y.max(0)) as f64;
        Point2::new(
            x - (self.width / 2) as f64,
            (self.height / 2) as f64 - y,
        )
    }

    /// Inverse of [`FrameSize::to_centered`] (without clamping).
    pub fn to_image(&self, p: Point2<f64>) -> Point2<f64> {
        Point2::new(
            p.x + (self.width / 2) as f64,
            (self.height / 2) as f64 - p.y,
        )
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
