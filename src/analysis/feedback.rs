//! Feedback note generation
//!
//! Each category maps its metric onto a list of threshold bands. Bands are
//! checked from the highest threshold down; the first band whose `min` the
//! value reaches supplies the text, and the last band catches everything
//! below. Thresholds and wording are configuration.

use super::result::{FeedbackCategory, PitchMetrics, VibratoMetrics};
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One threshold band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackBand {
    /// Lowest metric value (inclusive) that selects this band
    pub min: f64,
    /// Feedback text
    pub text: String,
}

impl FeedbackBand {
    /// Band starting at `min`
    pub fn new(min: f64, text: impl Into<String>) -> Self {
        Self {
            min,
            text: text.into(),
        }
    }
}

/// Threshold bands and wording for every feedback category
///
/// Band lists must be non-empty with strictly decreasing `min`. The vibrato
/// template accepts `{frequency_hz}`, `{depth_cents}` and `{coverage_pct}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Bands over `accuracy_pct` (0-100)
    pub pitch_accuracy: Vec<FeedbackBand>,
    /// Bands over `stability` (0-1)
    pub stability: Vec<FeedbackBand>,
    /// Text when vibrato is detected
    pub vibrato_detected: String,
    /// Text when no vibrato is detected
    pub vibrato_absent: String,
    /// Bands over `total_score` (0-100)
    pub overall: Vec<FeedbackBand>,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            pitch_accuracy: vec![
                FeedbackBand::new(90.0, "Excellent pitch control!"),
                FeedbackBand::new(70.0, "Good pitch accuracy. Try to stay closer to the target."),
                FeedbackBand::new(50.0, "Fair pitch accuracy. Focus on hitting the right notes."),
                FeedbackBand::new(0.0, "Pitch accuracy needs work. Listen carefully to the melody."),
            ],
            stability: vec![
                FeedbackBand::new(0.8, "Great pitch stability!"),
                FeedbackBand::new(0.5, "Good stability. Try to reduce pitch wavering."),
                FeedbackBand::new(0.0, "Work on holding notes steady."),
            ],
            vibrato_detected: "Nice vibrato detected! ({frequency_hz} Hz, {depth_cents} cents)"
                .to_string(),
            vibrato_absent: "No sustained vibrato detected.".to_string(),
            overall: vec![
                FeedbackBand::new(90.0, "Outstanding performance!"),
                FeedbackBand::new(75.0, "Great job! Keep it up!"),
                FeedbackBand::new(60.0, "Good effort! Practice more to improve."),
                FeedbackBand::new(0.0, "Keep practicing! You'll improve with time."),
            ],
        }
    }
}

impl FeedbackConfig {
    /// Check band ordering
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidConfig` for an empty band list, a
    /// non-finite threshold, or thresholds that are not strictly decreasing
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (name, bands) in [
            ("pitch_accuracy", &self.pitch_accuracy),
            ("stability", &self.stability),
            ("overall", &self.overall),
        ] {
            if bands.is_empty() {
                return Err(AnalysisError::InvalidConfig(format!(
                    "feedback.{} needs at least one band",
                    name
                )));
            }
            if bands.iter().any(|b| !b.min.is_finite()) {
                return Err(AnalysisError::InvalidConfig(format!(
                    "feedback.{} has a non-finite threshold",
                    name
                )));
            }
            if bands.windows(2).any(|w| w[1].min >= w[0].min) {
                return Err(AnalysisError::InvalidConfig(format!(
                    "feedback.{} thresholds must be strictly decreasing",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Generate one note per category
///
/// # Arguments
///
/// * `pitch` - Pitch metrics
/// * `vibrato` - Vibrato metrics
/// * `total_score` - Composite score
/// * `config` - Bands and wording
///
/// # Returns
///
/// Map with an entry for every [`FeedbackCategory`]
pub fn generate_notes(
    pitch: &PitchMetrics,
    vibrato: &VibratoMetrics,
    total_score: f64,
    config: &FeedbackConfig,
) -> BTreeMap<FeedbackCategory, String> {
    let mut notes = BTreeMap::new();

    notes.insert(
        FeedbackCategory::PitchAccuracy,
        select_band(&config.pitch_accuracy, pitch.accuracy_pct).to_string(),
    );
    notes.insert(
        FeedbackCategory::Stability,
        select_band(&config.stability, pitch.stability).to_string(),
    );
    notes.insert(
        FeedbackCategory::Vibrato,
        if vibrato.detected {
            render_vibrato(&config.vibrato_detected, vibrato)
        } else {
            config.vibrato_absent.clone()
        },
    );
    notes.insert(
        FeedbackCategory::Overall,
        select_band(&config.overall, total_score).to_string(),
    );

    notes
}

/// Text of the first band the value reaches, else the last band
fn select_band(bands: &[FeedbackBand], value: f64) -> &str {
    bands
        .iter()
        .find(|band| value >= band.min)
        .or_else(|| bands.last())
        .map(|band| band.text.as_str())
        .unwrap_or("")
}

fn render_vibrato(template: &str, vibrato: &VibratoMetrics) -> String {
    template
        .replace("{frequency_hz}", &format!("{:.1}", vibrato.frequency_hz))
        .replace("{depth_cents}", &format!("{:.0}", vibrato.depth_cents))
        .replace("{coverage_pct}", &format!("{:.0}", vibrato.coverage_pct))
}
