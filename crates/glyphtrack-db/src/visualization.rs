use serde::{Deserialize, Serialize};

/// Rendering hints attached to a glyph.
///
/// Carried along with recognitions but never interpreted by the recognition,
/// pose or tracking code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Visualization {
    /// RGB color used to outline the glyph.
    pub color: Option<[u8; 3]>,
    /// Image to overlay on the glyph quadrilateral.
    pub image: Option<String>,
    /// 3-D model to render on top of the glyph.
    pub model: Option<String>,
}

impl Visualization {
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.image.is_none() && self.model.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_none() {
        let v: Visualization = serde_json::from_str(r#"{"model":"cube.obj"}"#).unwrap();
        assert_eq!(v.model.as_deref(), Some("cube.obj"));
        assert!(v.color.is_none());
        assert!(v.image.is_none());
        assert!(Visualization::default().is_empty());
    }
}
