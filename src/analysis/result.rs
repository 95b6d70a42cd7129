//! Analysis result types
//!
//! Plain records with no behaviour beyond serialization. Field names and
//! ranges are the schema that storage and presentation layers depend on.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pitch accuracy and stability metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchMetrics {
    /// Mean signed pitch error `perf_hz - target_hz` over compared frames
    pub mean_error_hz: f64,

    /// Population standard deviation of the signed pitch error (Hz)
    pub std_error_hz: f64,

    /// Percentage of compared frames within tolerance (0.0-100.0)
    pub accuracy_pct: f64,

    /// Pitch stability (0.0-1.0), higher = smoother
    pub stability: f64,

    /// Frames voiced in both performance and target
    pub voiced_frame_count: usize,

    /// Frames in the aligned pair (performance length)
    pub total_frames: usize,
}

/// Vibrato metrics
///
/// When `detected` is false every other field is 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VibratoMetrics {
    /// Vibrato rate in Hz
    pub frequency_hz: f64,

    /// Peak-to-peak vibrato depth in cents
    pub depth_cents: f64,

    /// Percentage of voiced frames inside vibrato passages (0.0-100.0)
    pub coverage_pct: f64,

    /// Whether vibrato was detected
    pub detected: bool,
}

impl VibratoMetrics {
    /// Zeroed result for a performance without (detectable) vibrato
    pub fn not_detected() -> Self {
        Self {
            frequency_hz: 0.0,
            depth_cents: 0.0,
            coverage_pct: 0.0,
            detected: false,
        }
    }
}

impl Default for VibratoMetrics {
    fn default() -> Self {
        Self::not_detected()
    }
}

/// Feedback note categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    /// Closeness to the target melody
    PitchAccuracy,
    /// Steadiness of held pitch
    Stability,
    /// Vibrato presence and character
    Vibrato,
    /// Overall impression from the total score
    Overall,
}

impl FeedbackCategory {
    /// All categories in report order
    pub const ALL: [FeedbackCategory; 4] = [
        FeedbackCategory::PitchAccuracy,
        FeedbackCategory::Stability,
        FeedbackCategory::Vibrato,
        FeedbackCategory::Overall,
    ];

    /// Key used in the report document (e.g. `"pitch_accuracy"`)
    pub fn key(&self) -> &'static str {
        match self {
            FeedbackCategory::PitchAccuracy => "pitch_accuracy",
            FeedbackCategory::Stability => "stability",
            FeedbackCategory::Vibrato => "vibrato",
            FeedbackCategory::Overall => "overall",
        }
    }
}

/// Analysis flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisFlag {
    /// No frame was voiced in both performance and target
    NoVoicedFrames,
    /// Too few voiced performance frames for vibrato detection
    InsufficientVibratoData,
    /// Some voiced performance frames had no voiced target to compare against
    PartialTargetCoverage,
}

/// Report metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Performance duration in seconds (first to last frame)
    pub duration_seconds: f64,

    /// Algorithm version
    pub algorithm_version: String,

    /// Analysis flags
    pub flags: Vec<AnalysisFlag>,
}

/// Complete performance report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Composite score (0.0-100.0)
    pub total_score: f64,

    /// Pitch accuracy and stability
    pub pitch_metrics: PitchMetrics,

    /// Vibrato
    pub vibrato_metrics: VibratoMetrics,

    /// Feedback text per category
    pub notes: BTreeMap<FeedbackCategory, String>,

    /// Analysis metadata
    pub metadata: ReportMetadata,
}

impl ScoreReport {
    /// Feedback note for a category
    pub fn note(&self, category: FeedbackCategory) -> Option<&str> {
        self.notes.get(&category).map(String::as_str)
    }

    /// True if the flag was raised during analysis
    pub fn has_flag(&self, flag: AnalysisFlag) -> bool {
        self.metadata.flags.contains(&flag)
    }

    /// Key/value document for storage collaborators
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::SerializationError` if a value cannot be encoded
    pub fn to_document(&self) -> Result<serde_json::Value, AnalysisError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::SerializationError` if a value cannot be encoded
    pub fn to_json(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
