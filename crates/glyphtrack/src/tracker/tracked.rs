use std::collections::VecDeque;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::ExtractedGlyph;

/// Number of positions kept in a track's motion history.
pub const MOTION_HISTORY_LIMIT: usize = 11;
/// Number of most recent history steps used for the motion statistics.
pub const RECENT_MOTION_STEPS: usize = MOTION_HISTORY_LIMIT - 1;

/// Lifecycle of a track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackState {
    /// Created this frame from an unmatched detection.
    New,
    /// Matched in the latest frame.
    Tracked,
    /// Not matched in the latest frame; evicted once missed long enough.
    Lost,
}

/// One physical glyph followed across frames.
#[derive(Clone, Debug)]
pub struct TrackedGlyph {
    id: u32,
    glyph: ExtractedGlyph,
    position: Point2<f64>,
    age: u32,
    missed_frames: u32,
    state: TrackState,
    motion_history: VecDeque<Point2<f64>>,
    recent_path_length: f64,
    average_recent_motion: f64,
}

impl TrackedGlyph {
    /// Start a track; `position` becomes the first history entry.
    pub fn new(id: u32, glyph: ExtractedGlyph, position: Point2<f64>) -> Self {
        let mut motion_history = VecDeque::with_capacity(MOTION_HISTORY_LIMIT + 1);
        motion_history.push_back(position);
        Self {
            id,
            glyph,
            position,
            age: 0,
            missed_frames: 0,
            state: TrackState::New,
            motion_history,
            recent_path_length: 0.0,
            average_recent_motion: 0.0,
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Detection from the last frame this track was matched in.
    #[inline]
    pub fn glyph(&self) -> &ExtractedGlyph {
        &self.glyph
    }

    #[inline]
    pub fn position(&self) -> Point2<f64> {
        self.position
    }

    /// Number of frames the track has been matched in since creation.
    #[inline]
    pub fn age(&self) -> u32 {
        self.age
    }

    #[inline]
    pub fn missed_frames(&self) -> u32 {
        self.missed_frames
    }

    #[inline]
    pub fn state(&self) -> TrackState {
        self.state
    }

    pub fn motion_history(&self) -> impl ExactSizeIterator<Item = &Point2<f64>> {
        self.motion_history.iter()
    }

    /// Length of the path over the last (up to 10) history steps.
    #[inline]
    pub fn recent_path_length(&self) -> f64 {
        self.recent_path_length
    }

    /// Mean step length over the last (up to 10) history steps.
    #[inline]
    pub fn average_recent_motion(&self) -> f64 {
        self.average_recent_motion
    }

    /// Append a position, dropping the oldest beyond the history limit, and
    /// recompute the recent motion statistics.
    pub fn add_motion_history(&mut self, position: Point2<f64>) {
        self.motion_history.push_back(position);
        while self.motion_history.len() > MOTION_HISTORY_LIMIT {
            self.motion_history.pop_front();
        }

        let steps = RECENT_MOTION_STEPS.min(self.motion_history.len().saturating_sub(1));
        let skip = self.motion_history.len() - (steps + 1);
        let recent = self.motion_history.iter().skip(skip);
        self.recent_path_length = recent
            .clone()
            .zip(recent.skip(1))
            .map(|(a, b)| (b - a).norm())
            .sum();
        self.average_recent_motion = if steps == 0 {
            0.0
        } else {
            self.recent_path_length / steps as f64
        };
    }

    pub(crate) fn matched(&mut self, glyph: ExtractedGlyph, position: Point2<f64>) {
        self.glyph = glyph;
        self.position = position;
        self.age += 1;
        self.missed_frames = 0;
        self.state = TrackState::Tracked;
        self.add_motion_history(position);
    }

    pub(crate) fn missed(&mut self) {
        self.missed_frames += 1;
        self.state = TrackState::Lost;
    }
}
