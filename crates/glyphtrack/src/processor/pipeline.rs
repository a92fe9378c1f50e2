use glyphtrack_core::{BinaryGrid, FrameSize};
use glyphtrack_db::{DatabaseError, GlyphDatabase};
use glyphtrack_pose::PoseError;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::GlyphProcessorParams;
use crate::tracker::{GlyphTracker, TrackState, TrackedGlyph};
use crate::ExtractedGlyph;

/// One candidate glyph as delivered by the detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    /// Image pixels, upper-left corner of the raw grid first, clockwise.
    pub quadrilateral: Vec<Point2<i32>>,
    pub pattern: BinaryGrid,
    pub confidence: f32,
}

/// All detections of one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    pub size: FrameSize,
    pub detections: Vec<RawDetection>,
}

/// Identity of a tracked glyph after the frame was processed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub id: u32,
    pub age: u32,
    pub state: TrackState,
    pub recent_path_length: f64,
    pub average_recent_motion: f64,
}

impl From<&TrackedGlyph> for TrackInfo {
    fn from(t: &TrackedGlyph) -> Self {
        Self {
            id: t.id(),
            age: t.age(),
            state: t.state(),
            recent_path_length: t.recent_path_length(),
            average_recent_motion: t.average_recent_motion(),
        }
    }
}

/// A processed detection.
///
/// Errors are per detection: a refused grid or an unresolved pose leaves the
/// rest of the frame untouched.
#[derive(Clone, Debug)]
pub struct GlyphObservation {
    pub glyph: ExtractedGlyph,
    pub track: Option<TrackInfo>,
    pub recognition_error: Option<DatabaseError>,
    pub pose_error: Option<PoseError>,
}

/// Output of [`GlyphProcessor::process_frame`], detections in input order.
#[derive(Clone, Debug)]
pub struct FrameResult {
    /// Zero-based count of frames processed before this one.
    pub frame_index: u64,
    pub size: FrameSize,
    pub observations: Vec<GlyphObservation>,
}

impl FrameResult {
    pub fn recognized(&self) -> impl Iterator<Item = &GlyphObservation> {
        self.observations
            .iter()
            .filter(|o| o.glyph.recognized.is_some())
    }
}

/// Owns the glyph database and the tracker, and runs frames through them in
/// arrival order.
#[derive(Clone, Debug)]
pub struct GlyphProcessor {
    params: GlyphProcessorParams,
    database: GlyphDatabase,
    tracker: GlyphTracker,
    frames_processed: u64,
}

impl GlyphProcessor {
    pub fn new(database: GlyphDatabase, params: GlyphProcessorParams) -> Self {
        let tracker = GlyphTracker::new(params.tracker.clone());
        Self {
            params,
            database,
            tracker,
            frames_processed: 0,
        }
    }

    #[inline]
    pub fn params(&self) -> &GlyphProcessorParams {
        &self.params
    }

    #[inline]
    pub fn database(&self) -> &GlyphDatabase {
        &self.database
    }

    /// Mutable access for database edits. Existing tracks are kept; use
    /// [`GlyphProcessor::set_database`] to swap databases.
    #[inline]
    pub fn database_mut(&mut self) -> &mut GlyphDatabase {
        &mut self.database
    }

    /// Swap the database. Tracks refer to glyphs of the old one, so the
    /// tracker is reset.
    pub fn set_database(&mut self, database: GlyphDatabase) -> GlyphDatabase {
        log::debug!(
            "switching to a database of {} {}x{} glyphs",
            database.len(),
            database.size(),
            database.size()
        );
        self.tracker.reset();
        std::mem::replace(&mut self.database, database)
    }

    #[inline]
    pub fn tracker(&self) -> &GlyphTracker {
        &self.tracker
    }

    #[inline]
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Forget all tracks, e.g. after the camera changed.
    pub fn reset(&mut self) {
        self.tracker.reset();
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, input),
            fields(frame = self.frames_processed, detections = input.detections.len())
        )
    )]
    pub fn process_frame(&mut self, input: FrameInput) -> FrameResult {
        let size = input.size;
        let mut observations: Vec<GlyphObservation> = input
            .detections
            .into_iter()
            .map(|det| self.observe(det, size))
            .collect();

        if self.params.track_identities {
            self.track(&mut observations);
        }

        let frame_index = self.frames_processed;
        self.frames_processed += 1;
        log::debug!(
            "frame {}: {} detections, {} recognized, {} tracks",
            frame_index,
            observations.len(),
            observations
                .iter()
                .filter(|o| o.glyph.recognized.is_some())
                .count(),
            self.tracker.len()
        );

        FrameResult {
            frame_index,
            size,
            observations,
        }
    }

    fn observe(&self, det: RawDetection, size: FrameSize) -> GlyphObservation {
        let mut glyph = ExtractedGlyph::new(det.quadrilateral, det.pattern, det.confidence, size);
        let mut recognition_error = None;
        let mut pose_error = None;

        match glyph.recognize(&self.database) {
            Ok(true) if self.params.estimate_pose => {
                if let Err(err) = glyph.estimate_pose(&self.params.pose) {
                    log::debug!("no pose for {:?}: {}", glyph.name(), err);
                    pose_error = Some(err);
                }
            }
            Ok(_) => {}
            Err(err) => recognition_error = Some(err),
        }

        GlyphObservation {
            glyph,
            track: None,
            recognition_error,
            pose_error,
        }
    }

    fn track(&mut self, observations: &mut [GlyphObservation]) {
        let (indices, glyphs): (Vec<usize>, Vec<ExtractedGlyph>) = observations
            .iter()
            .enumerate()
            .filter(|(_, o)| o.glyph.recognized.is_some())
            .map(|(i, o)| (i, o.glyph.clone()))
            .unzip();

        let ids = self.tracker.track(&glyphs);
        for (idx, id) in indices.into_iter().zip(ids) {
            observations[idx].track = id
                .and_then(|id| self.tracker.get(id))
                .map(TrackInfo::from);
        }
    }
}
