//! Planar pose estimation for square glyphs.
//!
//! Input is the ordered quadrilateral of a recognized glyph (upper-left,
//! upper-right, lower-right, lower-left in glyph orientation) and the size
//! of the frame it was seen in. Output is a rigid transform from the glyph
//! model into camera coordinates, the derived yaw/pitch/roll, and a
//! projection of the glyph's axes for rendering.
//!
//! Camera coordinates are centred on the frame with `x` right, `y` up and
//! `z` along the optical axis; the focal length equals the frame width.

mod error;
mod euler;
mod params;
mod pose;
mod posit;
mod projection;

pub use error::PoseError;
pub use euler::{facing_rotation, Orientation};
pub use params::PoseParams;
pub use pose::{estimate_pose, square_model, PlanarPose};
pub use posit::{CoplanarPosit, PoseCandidate};
pub use projection::AxisProjection;
