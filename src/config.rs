//! Configuration parameters for performance analysis

use crate::analysis::feedback::FeedbackConfig;
use crate::analysis::scoring::ScoringWeights;
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Analysis configuration parameters
///
/// One record passed explicitly into every stage. All fields have documented
/// defaults and can be overridden per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    // Input gating
    /// Samples with confidence below this value are treated as unvoiced (default: 0.5)
    pub min_confidence: f64,

    // Accuracy
    /// Allowed pitch error in cents, inclusive (default: 100.0, one semitone)
    pub pitch_tolerance_cents: f64,

    // Stability
    /// Length of the rolling median used to detrend the contour, in milliseconds (default: 300.0)
    pub stability_window_ms: f64,

    /// Jitter (cents) at which stability reaches 0 (default: 25.0)
    /// Typical untrained, vibrato-free singing lands around 0.6-0.8
    pub stability_scale_cents: f64,

    // Vibrato
    /// Accepted vibrato rate band in Hz (default: 4.0-8.0)
    pub vibrato_freq_range: (f64, f64),

    /// Oscillation band searched by the autocorrelation, in Hz (default: 3.0-10.0)
    /// Must contain `vibrato_freq_range`
    pub vibrato_search_range: (f64, f64),

    /// Minimum peak-to-peak vibrato depth in cents (default: 30.0)
    pub min_vibrato_depth_cents: f64,

    /// Voiced frames required before vibrato detection runs (default: 10)
    pub min_voiced_frames_for_vibrato: usize,

    /// Normalized autocorrelation value a peak must reach to count as periodic (default: 0.3)
    pub acf_significance: f64,

    /// Sliding window used by the vibrato coverage test, in milliseconds (default: 500.0)
    pub vibrato_coverage_window_ms: f64,

    // Composite score
    /// Bonus weights for the composite score
    pub weights: ScoringWeights,

    /// Threshold bands and wording for feedback notes
    pub feedback: FeedbackConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            pitch_tolerance_cents: 100.0,
            stability_window_ms: 300.0,
            stability_scale_cents: 25.0,
            vibrato_freq_range: (4.0, 8.0),
            vibrato_search_range: (3.0, 10.0),
            min_vibrato_depth_cents: 30.0,
            min_voiced_frames_for_vibrato: 10,
            acf_significance: 0.3,
            vibrato_coverage_window_ms: 500.0,
            weights: ScoringWeights::default(),
            feedback: FeedbackConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Check that every parameter is inside its meaningful range
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidConfig` naming the first offending field
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(invalid(format!(
                "min_confidence must be in [0, 1], got {}",
                self.min_confidence
            )));
        }

        if !self.pitch_tolerance_cents.is_finite() || self.pitch_tolerance_cents < 0.0 {
            return Err(invalid(format!(
                "pitch_tolerance_cents must be a non-negative number, got {}",
                self.pitch_tolerance_cents
            )));
        }

        if !is_positive(self.stability_window_ms) {
            return Err(invalid(format!(
                "stability_window_ms must be positive, got {}",
                self.stability_window_ms
            )));
        }

        if !is_positive(self.stability_scale_cents) {
            return Err(invalid(format!(
                "stability_scale_cents must be positive, got {}",
                self.stability_scale_cents
            )));
        }

        let (lo, hi) = self.vibrato_freq_range;
        if !is_positive(lo) || !hi.is_finite() || lo >= hi {
            return Err(invalid(format!(
                "vibrato_freq_range must satisfy 0 < min < max, got ({}, {})",
                lo, hi
            )));
        }

        let (search_lo, search_hi) = self.vibrato_search_range;
        if !is_positive(search_lo) || !search_hi.is_finite() || search_lo >= search_hi {
            return Err(invalid(format!(
                "vibrato_search_range must satisfy 0 < min < max, got ({}, {})",
                search_lo, search_hi
            )));
        }
        if search_lo > lo || search_hi < hi {
            return Err(invalid(format!(
                "vibrato_search_range ({}, {}) must contain vibrato_freq_range ({}, {})",
                search_lo, search_hi, lo, hi
            )));
        }

        if !self.min_vibrato_depth_cents.is_finite() || self.min_vibrato_depth_cents < 0.0 {
            return Err(invalid(format!(
                "min_vibrato_depth_cents must be non-negative, got {}",
                self.min_vibrato_depth_cents
            )));
        }

        if !(self.acf_significance > 0.0 && self.acf_significance < 1.0) {
            return Err(invalid(format!(
                "acf_significance must be in (0, 1), got {}",
                self.acf_significance
            )));
        }

        if !is_positive(self.vibrato_coverage_window_ms) {
            return Err(invalid(format!(
                "vibrato_coverage_window_ms must be positive, got {}",
                self.vibrato_coverage_window_ms
            )));
        }

        self.weights.validate()?;
        self.feedback.validate()?;

        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn invalid(msg: String) -> AnalysisError {
    AnalysisError::InvalidConfig(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let config = AnalysisConfig::default();
        assert_eq!(config.pitch_tolerance_cents, 100.0);
        assert_eq!(config.vibrato_freq_range, (4.0, 8.0));
        assert_eq!(config.min_vibrato_depth_cents, 30.0);
        assert_eq!(config.min_voiced_frames_for_vibrato, 10);
        assert_eq!(config.stability_window_ms, 300.0);
    }

    #[test]
    fn test_rejects_inverted_vibrato_range() {
        let config = AnalysisConfig {
            vibrato_freq_range: (8.0, 4.0),
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_band_outside_search_range() {
        let config = AnalysisConfig {
            vibrato_freq_range: (2.0, 8.0),
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_tolerance_and_confidence() {
        let config = AnalysisConfig {
            pitch_tolerance_cents: f64::NAN,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AnalysisConfig {
            min_confidence: 1.5,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"pitch_tolerance_cents": 50.0}"#).unwrap();
        assert_eq!(config.pitch_tolerance_cents, 50.0);
        assert_eq!(config.min_vibrato_depth_cents, 30.0);
        assert!(config.validate().is_ok());
    }
}
