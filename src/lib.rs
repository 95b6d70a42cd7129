//! # Cantus
//!
//! Performance analysis engine for sung melodies: scores a performance's pitch
//! contour against a reference contour and produces an explainable report.
//!
//! ## Features
//!
//! - **Alignment**: Resamples the target onto the performance time base by linear interpolation
//! - **Accuracy**: Cents-based tolerance test per jointly voiced frame
//! - **Stability**: Jitter of the pitch residual after rolling-median detrending
//! - **Vibrato**: Autocorrelation periodicity with rate, depth and coverage
//! - **Report**: Bounded composite score with configurable feedback notes
//!
//! ## Quick Start
//!
//! ```
//! use cantus::{analyze_performance, AnalysisConfig, PitchContour};
//!
//! let times: Vec<f64> = (0..100).map(|i| i as f64 * 0.01).collect();
//! let target_hz: Vec<Option<f64>> = vec![Some(440.0); 100];
//! let sung_hz: Vec<Option<f64>> = vec![Some(442.0); 100];
//! let confidence = vec![0.9; 100];
//!
//! let target = PitchContour::from_arrays(&times, &target_hz, &confidence)?;
//! let performance = PitchContour::from_arrays(&times, &sung_hz, &confidence)?;
//!
//! let report = analyze_performance(&performance, &target, &AnalysisConfig::default())?;
//!
//! println!("Score: {:.1}", report.total_score);
//! println!("Accuracy: {:.1}%", report.pitch_metrics.accuracy_pct);
//! # assert_eq!(report.pitch_metrics.accuracy_pct, 100.0);
//! # Ok::<(), cantus::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Contours → Confidence gate → Alignment → Accuracy / Stability / Vibrato → Score → Report
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod contour;
pub mod error;
pub mod features;
pub mod preprocessing;

// Re-export main types
pub use analysis::feedback::{FeedbackBand, FeedbackConfig};
pub use analysis::result::{
    AnalysisFlag, FeedbackCategory, PitchMetrics, ReportMetadata, ScoreReport, VibratoMetrics,
};
pub use analysis::scoring::ScoringWeights;
pub use config::AnalysisConfig;
pub use contour::{Pitch, PitchContour, PitchSample};
pub use error::AnalysisError;

use analysis::report::ReportBuilder;
use features::accuracy::{score_accuracy, AccuracyMetrics};
use features::stability::estimate_stability;
use features::vibrato::detect_vibrato;
use preprocessing::alignment::{align, AlignedPair};

/// Main analysis function
///
/// Scores a performance contour against a target contour.
///
/// # Arguments
///
/// * `performance` - Pitch contour of the sung performance
/// * `target` - Reference pitch contour (any time base)
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// A fully populated `ScoreReport`. Sparse or unvoiced performances are not
/// errors; they produce zeroed metrics and analysis flags.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidConfig` if `config` fails validation and
/// `AnalysisError::AlignmentError` if the contours cannot be aligned
pub fn analyze_performance(
    performance: &PitchContour,
    target: &PitchContour,
    config: &AnalysisConfig,
) -> Result<ScoreReport, AnalysisError> {
    config.validate()?;

    log::debug!(
        "Starting performance analysis: {} performance frames ({} voiced), {} target frames ({} voiced)",
        performance.len(),
        performance.voiced_frame_count(),
        target.len(),
        target.voiced_frame_count()
    );

    let performance = performance.gated(config.min_confidence);
    let target = target.gated(config.min_confidence);

    let pair = align(&performance, &target)?;
    let frame_period = performance.frame_period_seconds().unwrap_or(0.0);
    let (voiced_times, voiced_hz) = pair.performance_voiced();

    log::debug!(
        "Aligned {} frames; {} voiced after confidence gate {:.2}",
        pair.len(),
        voiced_hz.len(),
        config.min_confidence
    );

    let (accuracy, (stability, vibrato)) = compute_metrics(
        &pair,
        &voiced_hz,
        &voiced_times,
        frame_period,
        config,
    );

    let pitch_metrics = PitchMetrics {
        mean_error_hz: accuracy.mean_error_hz,
        std_error_hz: accuracy.std_error_hz,
        accuracy_pct: accuracy.accuracy_pct,
        stability,
        voiced_frame_count: accuracy.voiced_frame_count,
        total_frames: pair.len(),
    };

    let mut builder = ReportBuilder::new(pitch_metrics, vibrato)
        .duration_seconds(performance.duration_seconds());

    if accuracy.voiced_frame_count == 0 {
        log::warn!("No frame is voiced in both performance and target");
        builder = builder.flag(AnalysisFlag::NoVoicedFrames);
    }
    if voiced_hz.len() < config.min_voiced_frames_for_vibrato {
        builder = builder.flag(AnalysisFlag::InsufficientVibratoData);
    }
    if pair.target_unvoiced_count() > 0 {
        log::debug!(
            "{} voiced performance frames have no voiced target",
            pair.target_unvoiced_count()
        );
        builder = builder.flag(AnalysisFlag::PartialTargetCoverage);
    }

    let report = builder.build(&config.weights, &config.feedback);

    log::debug!(
        "Analysis complete: score={:.1}, accuracy={:.1}%, stability={:.3}, vibrato={}",
        report.total_score,
        report.pitch_metrics.accuracy_pct,
        report.pitch_metrics.stability,
        report.vibrato_metrics.detected
    );

    Ok(report)
}

/// Analyze many (performance, target) pairs
///
/// Each pair is independent; one failure does not affect the others. With the
/// `parallel` feature the pairs are processed on the rayon thread pool.
///
/// # Returns
///
/// One result per input pair, in input order
pub fn analyze_batch(
    pairs: &[(PitchContour, PitchContour)],
    config: &AnalysisConfig,
) -> Vec<Result<ScoreReport, AnalysisError>> {
    log::debug!("Analyzing batch of {} performances", pairs.len());

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        pairs
            .par_iter()
            .map(|(performance, target)| analyze_performance(performance, target, config))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        pairs
            .iter()
            .map(|(performance, target)| analyze_performance(performance, target, config))
            .collect()
    }
}

#[cfg(feature = "parallel")]
fn compute_metrics(
    pair: &AlignedPair,
    voiced_hz: &[f64],
    voiced_times: &[f64],
    frame_period: f64,
    config: &AnalysisConfig,
) -> (AccuracyMetrics, (f64, VibratoMetrics)) {
    rayon::join(
        || score_accuracy(pair, config.pitch_tolerance_cents),
        || {
            rayon::join(
                || estimate_stability(voiced_hz, frame_period, config),
                || detect_vibrato(voiced_hz, voiced_times, config),
            )
        },
    )
}

#[cfg(not(feature = "parallel"))]
fn compute_metrics(
    pair: &AlignedPair,
    voiced_hz: &[f64],
    voiced_times: &[f64],
    frame_period: f64,
    config: &AnalysisConfig,
) -> (AccuracyMetrics, (f64, VibratoMetrics)) {
    (
        score_accuracy(pair, config.pitch_tolerance_cents),
        (
            estimate_stability(voiced_hz, frame_period, config),
            detect_vibrato(voiced_hz, voiced_times, config),
        ),
    )
}
