//! Square glyph recognition, planar pose and identity tracking.
//!
//! This is the facade over the `glyphtrack-*` crates. A frame arrives as a
//! list of [`RawDetection`]s (quadrilateral, binary cell grid, confidence)
//! produced by an external detector; the [`GlyphProcessor`] recognizes each
//! grid against a [`GlyphDatabase`], estimates the pose of recognized glyphs,
//! and hands them to the [`GlyphTracker`] for stable ids and motion
//! statistics.
//!
//! ## Quickstart
//!
//! ```
//! use glyphtrack::{FrameInput, GlyphProcessor, GlyphProcessorParams, RawDetection};
//! use glyphtrack::core::{BinaryGrid, FrameSize};
//! use glyphtrack::db::{GlyphDatabase, GlyphPattern};
//! use nalgebra::Point2;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let hook = BinaryGrid::from_bit_string(3, "110010011")?;
//! let mut db = GlyphDatabase::new(3);
//! db.add(GlyphPattern::new("hook", hook.clone()))?;
//!
//! let mut processor = GlyphProcessor::new(db, GlyphProcessorParams::default());
//! let result = processor.process_frame(FrameInput {
//!     size: FrameSize::new(640, 480),
//!     detections: vec![RawDetection {
//!         quadrilateral: vec![
//!             Point2::new(270, 190),
//!             Point2::new(370, 190),
//!             Point2::new(370, 290),
//!             Point2::new(270, 290),
//!         ],
//!         pattern: hook,
//!         confidence: 0.9,
//!     }],
//! });
//!
//! let obs = &result.observations[0];
//! assert_eq!(obs.glyph.name(), Some("hook"));
//! assert!(obs.glyph.pose.is_some());
//! assert_eq!(obs.track.map(|t| t.id), Some(1));
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `glyphtrack::core`: frame geometry, binary grids, polygon metrics, logging setup.
//! - `glyphtrack::db`: glyph patterns and databases.
//! - `glyphtrack::pose`: coplanar POSIT, yaw/pitch/roll, axis projection.
//! - [`tracker`]: per-glyph identity and motion history.
//! - [`processor`]: the per-frame pipeline and its thread-safe front end.
//! - [`report`], [`io`]: JSON reports and configuration.

pub use glyphtrack_core as core;
pub use glyphtrack_db as db;
pub use glyphtrack_pose as pose;

mod extracted;
pub mod io;
pub mod processor;
pub mod report;
pub mod tracker;

pub use extracted::ExtractedGlyph;
pub use glyphtrack_db::GlyphDatabase;
pub use io::{GlyphTrackConfig, IoError};
pub use processor::{
    FrameInput, FrameResult, GlyphObservation, GlyphProcessor, GlyphProcessorParams, RawDetection,
    SharedGlyphProcessor, TrackInfo,
};
pub use report::{FrameReport, GlyphReport};
pub use tracker::{GlyphTracker, TrackState, TrackedGlyph, TrackerParams};
