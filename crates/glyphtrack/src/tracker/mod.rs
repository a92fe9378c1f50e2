//! Identity tracking of glyphs across frames.
//!
//! Each frame the tracker receives that frame's detections and matches them
//! to its existing tracks by position (the mean of the quadrilateral
//! corners). Matching is 1:1, nearest pair first, gated by
//! [`TrackerParams::max_match_distance`] and, optionally, by recognized name.
//! Unmatched detections open new tracks; unmatched tracks become
//! [`TrackState::Lost`] and are evicted after
//! [`TrackerParams::max_missed_frames`] consecutive misses.

mod assign;
mod params;
mod tracked;

pub use params::TrackerParams;
pub use tracked::{TrackState, TrackedGlyph, MOTION_HISTORY_LIMIT, RECENT_MOTION_STEPS};

use assign::{assign_nearest, Site};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::ExtractedGlyph;

#[derive(Clone, Debug)]
pub struct GlyphTracker {
    params: TrackerParams,
    tracks: Vec<TrackedGlyph>,
    next_id: u32,
}

impl Default for GlyphTracker {
    fn default() -> Self {
        Self::new(TrackerParams::default())
    }
}

impl GlyphTracker {
    pub fn new(params: TrackerParams) -> Self {
        Self {
            params,
            tracks: Vec::new(),
            next_id: 1,
        }
    }

    #[inline]
    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    /// Live tracks, oldest first.
    #[inline]
    pub fn tracks(&self) -> &[TrackedGlyph] {
        &self.tracks
    }

    pub fn get(&self, id: u32) -> Option<&TrackedGlyph> {
        self.tracks.iter().find(|t| t.id() == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Drop all tracks and restart ids at 1.
    pub fn reset(&mut self) {
        log::debug!("tracker reset ({} tracks dropped)", self.tracks.len());
        self.tracks.clear();
        self.next_id = 1;
    }

    /// Feed one frame of detections.
    ///
    /// Returns the track id of each detection, in input order. Detections
    /// without corners have no position and get `None`.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, glyphs),
            fields(detections = glyphs.len(), tracks = self.tracks.len())
        )
    )]
    pub fn track(&mut self, glyphs: &[ExtractedGlyph]) -> Vec<Option<u32>> {
        let detections: Vec<Option<Site<'_>>> = glyphs
            .iter()
            .map(|g| {
                g.center().map(|position| Site {
                    position,
                    name: g.name(),
                })
            })
            .collect();
        let sites: Vec<Site<'_>> = self
            .tracks
            .iter()
            .map(|t| Site {
                position: t.position(),
                name: t.glyph().name(),
            })
            .collect();

        let assignment = assign_nearest(
            &sites,
            &detections,
            self.params.max_match_distance,
            self.params.match_by_name,
        );

        let mut matched = vec![false; self.tracks.len()];
        let mut ids = vec![None; glyphs.len()];
        for (d, track_idx) in assignment.iter().enumerate() {
            if let (Some(t), Some(site)) = (*track_idx, detections[d]) {
                matched[t] = true;
                self.tracks[t].matched(glyphs[d].clone(), site.position);
                ids[d] = Some(self.tracks[t].id());
            }
        }

        for (track, &hit) in self.tracks.iter_mut().zip(matched.iter()) {
            if !hit {
                track.missed();
            }
        }
        let max_missed = self.params.max_missed_frames;
        self.tracks.retain(|t| {
            let keep = t.missed_frames() < max_missed || t.state() != TrackState::Lost;
            if !keep {
                log::debug!("evict track {} after {} missed frames", t.id(), t.missed_frames());
            }
            keep
        });

        for (d, site) in detections.iter().enumerate() {
            let (None, Some(site)) = (assignment[d], site) else {
                continue;
            };
            let id = self.next_id;
            self.next_id = self.next_id.wrapping_add(1).max(1);
            log::debug!(
                "new track {} for {:?} at ({:.1}, {:.1})",
                id,
                site.name,
                site.position.x,
                site.position.y
            );
            self.tracks
                .push(TrackedGlyph::new(id, glyphs[d].clone(), site.position));
            ids[d] = Some(id);
        }

        ids
    }
}
