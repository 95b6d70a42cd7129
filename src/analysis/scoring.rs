//! Composite score
//!
//! `total = clamp(accuracy_pct + stability_bonus * stability + vibrato_bonus * detected, 0, 100)`
//!
//! Accuracy carries the score; stability and vibrato can only add to it.

use super::result::{PitchMetrics, VibratoMetrics};
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Bonus weights for the composite score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Points awarded at stability 1.0 (default: 10.0)
    pub stability_bonus: f64,
    /// Points awarded when vibrato is detected (default: 5.0)
    pub vibrato_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            stability_bonus: 10.0,
            vibrato_bonus: 5.0,
        }
    }
}

impl ScoringWeights {
    /// Check that both bonuses are finite and non-negative
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidConfig` otherwise
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (name, value) in [
            ("stability_bonus", self.stability_bonus),
            ("vibrato_bonus", self.vibrato_bonus),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalysisError::InvalidConfig(format!(
                    "weights.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Combine metrics into a bounded score in [0.0, 100.0]
pub fn composite_score(
    pitch: &PitchMetrics,
    vibrato: &VibratoMetrics,
    weights: &ScoringWeights,
) -> f64 {
    let base = pitch.accuracy_pct;
    let stability_bonus = weights.stability_bonus * pitch.stability;
    let vibrato_bonus = if vibrato.detected {
        weights.vibrato_bonus
    } else {
        0.0
    };

    let total = (base + stability_bonus + vibrato_bonus).clamp(0.0, 100.0);

    log::debug!(
        "Composite score: base={:.1} + stability={:.1} + vibrato={:.1} -> {:.1}",
        base,
        stability_bonus,
        vibrato_bonus,
        total
    );

    total
}
