use serde::{Deserialize, Serialize};

/// Identity tracking policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerParams {
    /// Largest distance (pixels) between a track and a detection that may
    /// be matched to it.
    pub max_match_distance: f64,
    /// A track is evicted after this many consecutive frames without a match.
    pub max_missed_frames: u32,
    /// Only match detections whose recognized name equals the track's.
    pub match_by_name: bool,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            max_match_distance: 50.0,
            max_missed_frames: 5,
            match_by_name: true,
        }
    }
}
