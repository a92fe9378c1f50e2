//! One glyph detection in one frame.

use glyphtrack_core::{BinaryGrid, FrameSize};
use glyphtrack_db::{DatabaseError, GlyphDatabase, Recognition};
use glyphtrack_pose::{estimate_pose, PlanarPose, PoseError, PoseParams};
use nalgebra::Point2;

/// A candidate glyph produced by an external detector, enriched in place by
/// recognition and pose estimation.
///
/// Built fresh for every frame; nothing is carried over between frames
/// except through the tracker.
#[derive(Clone, Debug)]
pub struct ExtractedGlyph {
    /// Corners in image pixels, starting at the upper-left corner of the
    /// raw grid and going clockwise on screen.
    pub quadrilateral: Vec<Point2<i32>>,
    /// Binary cells read from the detection, in raw (unrotated) orientation.
    pub raw_pattern: BinaryGrid,
    /// Detector confidence, nominally in `[0.5, 1.0]`.
    pub confidence: f32,
    pub frame: FrameSize,
    pub recognized: Option<Recognition>,
    /// `quadrilateral` re-indexed so that its first corner is the upper-left
    /// corner of the recognized glyph.
    pub recognized_quadrilateral: Option<Vec<Point2<i32>>>,
    pub pose: Option<PlanarPose>,
}

impl ExtractedGlyph {
    pub fn new(
        quadrilateral: Vec<Point2<i32>>,
        raw_pattern: BinaryGrid,
        confidence: f32,
        frame: FrameSize,
    ) -> Self {
        Self {
            quadrilateral,
            raw_pattern,
            confidence,
            frame,
            recognized: None,
            recognized_quadrilateral: None,
            pose: None,
        }
    }

    /// Look the raw pattern up in `db`.
    ///
    /// Returns whether a glyph was recognized. Previous recognition results
    /// are cleared first. A grid of the wrong size is refused with
    /// [`DatabaseError::SizeMismatch`].
    pub fn recognize(&mut self, db: &GlyphDatabase) -> Result<bool, DatabaseError> {
        self.recognized = None;
        self.recognized_quadrilateral = None;

        let Some(hit) = db.recognize(&self.raw_pattern)? else {
            return Ok(false);
        };

        if self.quadrilateral.len() == 4 {
            // the glyph's upper-left cell sits k corners clockwise of the raw one
            let mut quad = self.quadrilateral.clone();
            quad.rotate_left(hit.rotation.quarter_turns() as usize);
            self.recognized_quadrilateral = Some(quad);
        }
        self.recognized = Some(hit);
        Ok(true)
    }

    /// Quadrilateral in glyph orientation when recognized, raw otherwise.
    pub fn oriented_quadrilateral(&self) -> &[Point2<i32>] {
        self.recognized_quadrilateral
            .as_deref()
            .unwrap_or(self.quadrilateral.as_slice())
    }

    /// Estimate and store the pose.
    ///
    /// On failure any previous pose is cleared and the error returned; the
    /// detection itself stays usable.
    pub fn estimate_pose(&mut self, params: &PoseParams) -> Result<&PlanarPose, PoseError> {
        self.pose = None;
        let pose = estimate_pose(self.oriented_quadrilateral(), self.frame, params)?;
        let pose: &PlanarPose = self.pose.insert(pose);
        Ok(pose)
    }

    pub fn name(&self) -> Option<&str> {
        self.recognized.as_ref().map(|r| r.glyph.name())
    }

    pub fn area(&self) -> f64 {
        glyphtrack_core::area(&self.quadrilateral)
    }

    pub fn perimeter(&self) -> f64 {
        glyphtrack_core::perimeter(&self.quadrilateral)
    }

    pub fn centroid(&self) -> Option<Point2<f64>> {
        glyphtrack_core::centroid(&self.quadrilateral)
    }

    /// Mean of the corners; the position used for tracking.
    pub fn center(&self) -> Option<Point2<f64>> {
        glyphtrack_core::center_of_gravity(&self.quadrilateral)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphtrack_core::Rotation;
    use glyphtrack_db::GlyphPattern;

    fn hook() -> BinaryGrid {
        BinaryGrid::from_bit_string(3, "110010011").unwrap()
    }

    fn db() -> GlyphDatabase {
        let mut db = GlyphDatabase::new(3);
        db.add(GlyphPattern::new("hook", hook())).unwrap();
        db
    }

    fn quad() -> Vec<Point2<i32>> {
        vec![
            Point2::new(270, 190),
            Point2::new(370, 190),
            Point2::new(370, 290),
            Point2::new(270, 290),
        ]
    }

    #[test]
    fn recognition_reorders_quadrilateral() {
        let seen = hook().rotated(Rotation::Deg90);
        let mut g = ExtractedGlyph::new(quad(), seen, 0.9, FrameSize::new(640, 480));
        assert!(g.recognize(&db()).unwrap());

        assert_eq!(g.name(), Some("hook"));
        let q = g.recognized_quadrilateral.as_ref().unwrap();
        assert_eq!(q[0], quad()[1]);
        assert_eq!(q[3], quad()[0]);
    }

    #[test]
    fn unrecognized_keeps_raw_quadrilateral() {
        let blank = BinaryGrid::from_bit_string(3, "000000000").unwrap();
        let mut g = ExtractedGlyph::new(quad(), blank, 0.7, FrameSize::new(640, 480));
        assert!(!g.recognize(&db()).unwrap());
        assert!(g.name().is_none());
        assert_eq!(g.oriented_quadrilateral(), quad().as_slice());
    }

    #[test]
    fn wrong_grid_size_is_refused() {
        let big = BinaryGrid::from_bit_string(2, "1001").unwrap();
        let mut g = ExtractedGlyph::new(quad(), big, 0.7, FrameSize::new(640, 480));
        assert!(matches!(
            g.recognize(&db()),
            Err(DatabaseError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn pose_uses_recognized_corner_order() {
        let seen = hook().rotated(Rotation::Deg90);
        let mut g = ExtractedGlyph::new(quad(), seen, 0.9, FrameSize::new(640, 480));
        g.recognize(&db()).unwrap();
        let roll = g.estimate_pose(&PoseParams::default()).unwrap().orientation.roll;
        assert!((roll + 90.0).abs() < 1e-3, "roll {roll}");
        assert!(g.pose.is_some());
    }

    #[test]
    fn failed_pose_clears_previous() {
        let mut g = ExtractedGlyph::new(quad(), hook(), 0.9, FrameSize::new(640, 480));
        g.estimate_pose(&PoseParams::default()).unwrap();
        g.quadrilateral.pop();
        assert!(g.estimate_pose(&PoseParams::default()).is_err());
        assert!(g.pose.is_none());
    }

    #[test]
    fn metrics_use_raw_quadrilateral() {
        let g = ExtractedGlyph::new(quad(), hook(), 0.9, FrameSize::new(640, 480));
        assert_eq!(g.area(), 10_000.0);
        let c = g.centroid().unwrap();
        assert!((c.x - 320.0).abs() < 1e-9 && (c.y - 240.0).abs() < 1e-9);
        assert_eq!(g.center(), Some(Point2::new(320.0, 240.0)));
    }
}
