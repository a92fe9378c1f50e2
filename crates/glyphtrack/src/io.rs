//! JSON configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::GlyphProcessorParams;

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// On-disk configuration of a glyph tracking run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GlyphTrackConfig {
    #[serde(default)]
    pub processor: GlyphProcessorParams,
    /// Where to write frame reports.
    #[serde(default)]
    pub output_path: Option<String>,
}

impl GlyphTrackConfig {
    /// Load a JSON config from disk. Missing fields take their defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("glyphtrack_report.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: GlyphTrackConfig = serde_json::from_str(
            r#"{ "processor": { "tracker": { "max_missed_frames": 2 }, "estimate_pose": false } }"#,
        )
        .unwrap();
        assert_eq!(cfg.processor.tracker.max_missed_frames, 2);
        assert_eq!(cfg.processor.tracker.max_match_distance, 50.0);
        assert!(!cfg.processor.estimate_pose);
        assert!(cfg.processor.track_identities);
        assert_eq!(cfg.processor.pose.half_extent, 56.5);
        assert_eq!(cfg.output_path(), PathBuf::from("glyphtrack_report.json"));
    }

    #[test]
    fn config_survives_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glyphtrack.json");

        let mut cfg = GlyphTrackConfig::default();
        cfg.processor.pose.error_limit_deg = 0.5;
        cfg.output_path = Some("out.json".into());
        cfg.write_json(&path).unwrap();

        assert_eq!(GlyphTrackConfig::load_json(&path).unwrap(), cfg);
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ processor: ").unwrap();
        assert!(matches!(
            GlyphTrackConfig::load_json(&path),
            Err(IoError::Json(_))
        ));
        assert!(matches!(
            GlyphTrackConfig::load_json(dir.path().join("missing.json")),
            Err(IoError::Io(_))
        ));
    }
}
