//! Report assembly

use super::feedback::{generate_notes, FeedbackConfig};
use super::result::{AnalysisFlag, PitchMetrics, ReportMetadata, ScoreReport, VibratoMetrics};
use super::scoring::{composite_score, ScoringWeights};

/// Assembles a [`ScoreReport`] from finished metrics
///
/// Scoring and feedback are derived here; nothing can fail at this stage.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    pitch_metrics: PitchMetrics,
    vibrato_metrics: VibratoMetrics,
    duration_seconds: f64,
    flags: Vec<AnalysisFlag>,
}

impl ReportBuilder {
    /// Start a report from the metric stages' output
    pub fn new(pitch_metrics: PitchMetrics, vibrato_metrics: VibratoMetrics) -> Self {
        Self {
            pitch_metrics,
            vibrato_metrics,
            duration_seconds: 0.0,
            flags: vec![],
        }
    }

    /// Performance duration in seconds
    pub fn duration_seconds(mut self, duration_seconds: f64) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    /// Record an analysis flag (duplicates are ignored)
    pub fn flag(mut self, flag: AnalysisFlag) -> Self {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
        self
    }

    /// Score, annotate and freeze the report
    pub fn build(self, weights: &ScoringWeights, feedback: &FeedbackConfig) -> ScoreReport {
        let total_score = composite_score(&self.pitch_metrics, &self.vibrato_metrics, weights);
        let notes = generate_notes(
            &self.pitch_metrics,
            &self.vibrato_metrics,
            total_score,
            feedback,
        );

        ScoreReport {
            total_score,
            pitch_metrics: self.pitch_metrics,
            vibrato_metrics: self.vibrato_metrics,
            notes,
            metadata: ReportMetadata {
                duration_seconds: self.duration_seconds,
                algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
                flags: self.flags,
            },
        }
    }
}
