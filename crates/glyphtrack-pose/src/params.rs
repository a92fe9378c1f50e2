use serde::{Deserialize, Serialize};

/// Parameters of the glyph model and the POSIT iteration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseParams {
    /// Half side length of the square glyph model, in model units.
    ///
    /// Translations come out in the same units.
    pub half_extent: f64,
    /// Upper bound on POSIT refinement rounds per solution branch.
    pub max_iterations: usize,
    /// Refinement stops once the mean corner-angle difference between the
    /// observed and the reprojected quadrilateral drops to this value (degrees).
    ///
    /// The default of 2 degrees favours speed: on strongly turned glyphs it
    /// stops a few degrees short of the true angle (a 40 degree yaw reads
    /// about 35.5, a 45 degree pitch about 40). Values around 0.01 recover
    /// such angles to within 0.1 degrees at the cost of more iterations.
    pub error_limit_deg: f64,
}

impl Default for PoseParams {
    fn default() -> Self {
        Self {
            half_extent: 56.5,
            max_iterations: 100,
            error_limit_deg: 2.0,
        }
    }
}
