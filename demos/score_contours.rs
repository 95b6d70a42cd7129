//! Example: Score a performance contour against a target contour
//!
//! Both files hold JSON arrays of `{"time": .., "frequency": ..|null, "confidence": ..}`.
//! An optional third argument points at an `AnalysisConfig` JSON file.
//!
//! ```text
//! cargo run --example score_contours -- performance.json target.json [config.json]
//! ```

use cantus::{analyze_performance, AnalysisConfig, FeedbackCategory, PitchContour};
use std::fs;

fn load_contour(path: &str) -> Result<PitchContour, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <performance.json> <target.json> [config.json]", args[0]);
        std::process::exit(2);
    }

    let performance = load_contour(&args[1])?;
    let target = load_contour(&args[2])?;
    let config: AnalysisConfig = match args.get(3) {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => AnalysisConfig::default(),
    };

    let report = analyze_performance(&performance, &target, &config)?;

    eprintln!("Score: {:.1}", report.total_score);
    eprintln!(
        "  Accuracy: {:.1}% over {} frames",
        report.pitch_metrics.accuracy_pct, report.pitch_metrics.voiced_frame_count
    );
    eprintln!("  Stability: {:.2}", report.pitch_metrics.stability);
    for category in FeedbackCategory::ALL {
        if let Some(note) = report.note(category) {
            eprintln!("  {}: {}", category.key(), note);
        }
    }

    println!("{}", report.to_json()?);

    Ok(())
}
