//! Per-frame processing: recognition, pose, metrics and tracking.

mod params;
mod pipeline;
mod shared;

pub use params::GlyphProcessorParams;
pub use pipeline::{
    FrameInput, FrameResult, GlyphObservation, GlyphProcessor, RawDetection, TrackInfo,
};
pub use shared::SharedGlyphProcessor;
