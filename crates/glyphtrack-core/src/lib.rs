//! Core types and utilities for square glyph recognition.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! touch pixels: quadrilaterals and binary cell grids are expected to come
//! from an external detector.

mod frame;
mod grid;
mod logger;
mod polygon;

pub use frame::FrameSize;
pub use grid::{BinaryGrid, GridError, Rotation};
pub use polygon::{area, center_of_gravity, centroid, perimeter, signed_area};

#[cfg(feature = "tracing")]
pub use logger::{init_tracing, TraceFormat};

pub use logger::{init_with_level, level_from_env, parse_level, LOG_ENV};
