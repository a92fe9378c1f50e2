//! Glyph pattern databases.
//!
//! A [`GlyphDatabase`] holds same-size [`GlyphPattern`]s under unique names and
//! recognizes candidate grids regardless of which of the four quarter-turn
//! orientations the camera observed. Several databases can be kept side by
//! side in a [`GlyphDatabases`] collection.
//!
//! Grids come from an external detector; this crate never touches pixels.

mod collection;
mod database;
mod error;
mod pattern;
mod visualization;

pub use collection::GlyphDatabases;
pub use database::{GlyphDatabase, Recognition};
pub use error::DatabaseError;
pub use pattern::GlyphPattern;
pub use visualization::Visualization;
