//! Serializable per-frame output for renderers and network publishers.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::processor::{FrameResult, GlyphObservation};

/// Flat record of one detection.
///
/// Positions are image pixels (top-left origin). Pose fields are present
/// only when a pose was estimated, track fields only when the glyph is
/// tracked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlyphReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub confidence: f32,
    pub area: f64,
    pub perimeter: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centroid: Option<Point2<f64>>,
    /// Projected glyph origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaw: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll: Option<f64>,
    /// Projected axes `[origin, x, y, z]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axes: Option<[Point2<f64>; 4]>,
    pub frame_width: u32,
    pub frame_height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_recent_motion: Option<f64>,
}

impl From<&GlyphObservation> for GlyphReport {
    fn from(obs: &GlyphObservation) -> Self {
        let g = &obs.glyph;
        let axes = g.pose.as_ref().map(|p| p.project_axes().to_image(g.frame));
        let orientation = g.pose.as_ref().map(|p| p.orientation);

        Self {
            name: g.name().map(str::to_owned),
            confidence: g.confidence,
            area: g.area(),
            perimeter: g.perimeter(),
            centroid: g.centroid(),
            x: axes.map(|a| a.origin.x),
            y: axes.map(|a| a.origin.y),
            yaw: orientation.map(|o| o.yaw),
            pitch: orientation.map(|o| o.pitch),
            roll: orientation.map(|o| o.roll),
            axes: axes.map(|a| a.points()),
            frame_width: g.frame.width,
            frame_height: g.frame.height,
            track_id: obs.track.map(|t| t.id),
            track_age: obs.track.map(|t| t.age),
            average_recent_motion: obs.track.map(|t| t.average_recent_motion),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub frame_index: u64,
    pub glyphs: Vec<GlyphReport>,
}

impl FrameReport {
    /// Report every detection of the frame, or only the recognized ones.
    pub fn from_result(result: &FrameResult, recognized_only: bool) -> Self {
        let glyphs = result
            .observations
            .iter()
            .filter(|o| !recognized_only || o.glyph.recognized.is_some())
            .map(GlyphReport::from)
            .collect();
        Self {
            frame_index: result.frame_index,
            glyphs,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
