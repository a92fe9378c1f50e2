//! Feed synthetic frames of a glyph moving across the image through the
//! processor and print one JSON report per frame.
//!
//! Usage: `cargo run -p glyphtrack --example track_synthetic -- [config.json]`
//!
//! Set `GLYPHTRACK_LOG=debug` for per-frame tracker messages.

use glyphtrack::core::{BinaryGrid, FrameSize};
use glyphtrack::db::{GlyphDatabase, GlyphPattern};
use glyphtrack::pose::{square_model, Orientation};
use glyphtrack::{FrameInput, FrameReport, GlyphProcessor, GlyphTrackConfig, RawDetection};
use nalgebra::{Point2, Vector3};
use std::fs;

fn project(
    frame: FrameSize,
    orientation: Orientation,
    translation: Vector3<f64>,
) -> Vec<Point2<i32>> {
    let r = orientation.to_rotation();
    let f = frame.focal_length();
    square_model(56.5)
        .iter()
        .map(|m| {
            let v = r * m + translation;
            let p = frame.to_image(Point2::new(v.x * f / v.z, v.y * f / v.z));
            Point2::new(p.x.round() as i32, p.y.round() as i32)
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    glyphtrack::core::init_tracing(glyphtrack::core::TraceFormat::Pretty);
    #[cfg(not(feature = "tracing"))]
    glyphtrack::core::init_with_level(glyphtrack::core::level_from_env(log::LevelFilter::Info))?;

    let config = match std::env::args().nth(1) {
        Some(path) => GlyphTrackConfig::load_json(path)?,
        None => GlyphTrackConfig::default(),
    };

    let pattern = BinaryGrid::from_bit_string(5, "0000001010011100010000000")?;
    let mut db = GlyphDatabase::new(5);
    db.add(GlyphPattern::new("cube", pattern.clone()))?;

    let frame = FrameSize::new(1280, 960);
    let mut processor = GlyphProcessor::new(db, config.processor.clone());
    let mut reports = Vec::new();

    for i in 0..30 {
        let t = i as f64;
        let quad = project(
            frame,
            Orientation::new(-30.0 + 2.0 * t, 10.0, 0.0),
            Vector3::new(-300.0 + 20.0 * t, 0.0, 1200.0),
        );
        let result = processor.process_frame(FrameInput {
            size: frame,
            detections: vec![RawDetection {
                quadrilateral: quad,
                pattern: pattern.clone(),
                confidence: 0.9,
            }],
        });

        let report = FrameReport::from_result(&result, false);
        println!("{}", report.to_json()?);
        reports.push(report);
    }

    let out = config.output_path();
    fs::write(&out, serde_json::to_string_pretty(&reports)?)?;
    log::info!("wrote {} frame reports to {}", reports.len(), out.display());
    Ok(())
}
