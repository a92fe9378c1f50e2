use glyphtrack_pose::PoseParams;
use serde::{Deserialize, Serialize};

use crate::tracker::TrackerParams;

/// Configuration of the per-frame pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphProcessorParams {
    pub pose: PoseParams,
    pub tracker: TrackerParams,
    /// Estimate the pose of every recognized glyph.
    pub estimate_pose: bool,
    /// Assign stable ids to recognized glyphs across frames.
    pub track_identities: bool,
}

impl Default for GlyphProcessorParams {
    fn default() -> Self {
        Self {
            pose: PoseParams::default(),
            tracker: TrackerParams::default(),
            estimate_pose: true,
            track_identities: true,
        }
    }
}
