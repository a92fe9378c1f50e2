//! A single registered glyph and its rotation matching.

use glyphtrack_core::{BinaryGrid, Rotation};

use crate::Visualization;

/// A named square binary pattern.
///
/// The pattern is fixed at construction. The four clockwise rotations are
/// computed once so that matching a candidate is a plain comparison per
/// orientation.
#[derive(Clone, Debug)]
pub struct GlyphPattern {
    name: String,
    visualization: Visualization,
    // rotated[k] == grid rotated clockwise by k quarter turns; rotated[0] is the pattern
    rotated: [BinaryGrid; 4],
}

impl GlyphPattern {
    pub fn new(name: impl Into<String>, grid: BinaryGrid) -> Self {
        let rotated = Rotation::ALL.map(|rot| grid.rotated(rot));
        Self {
            name: name.into(),
            visualization: Visualization::default(),
            rotated,
        }
    }

    pub fn with_visualization(mut self, visualization: Visualization) -> Self {
        self.visualization = visualization;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Grid side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.rotated[0].size()
    }

    #[inline]
    pub fn grid(&self) -> &BinaryGrid {
        &self.rotated[0]
    }

    #[inline]
    pub fn visualization(&self) -> &Visualization {
        &self.visualization
    }

    /// Find the rotation under which `candidate` shows this pattern.
    ///
    /// Returns `k` such that `candidate == pattern.rotated(k)`. Orientations
    /// are tried in the order 0, 90, 180, 270 degrees, so a symmetric pattern
    /// reports the smallest matching rotation.
    pub fn match_rotation(&self, candidate: &BinaryGrid) -> Option<Rotation> {
        if candidate.size() != self.size() {
            return None;
        }
        Rotation::ALL
            .into_iter()
            .zip(self.rotated.iter())
            .find(|(_, grid)| *grid == candidate)
            .map(|(rot, _)| rot)
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }
}
