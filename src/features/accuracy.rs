//! Pitch accuracy scoring
//!
//! Compares the aligned performance against the target frame by frame. Only
//! frames voiced in both sources are scored; everything else is excluded from
//! the denominator rather than counted as a miss.
//!
//! A frame is accurate when `|1200 * log2(perf_hz / target_hz)| <= tolerance`.
//! The Hz statistics are reported alongside for diagnostic display.

use crate::preprocessing::alignment::AlignedPair;
use crate::preprocessing::detrend::cents;

/// Slack applied to the tolerance comparison so that an offset of exactly
/// `tolerance` cents survives floating-point rounding of the ratio
const CENTS_EPSILON: f64 = 1e-6;

/// Accuracy statistics over the frames voiced in both sources
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyMetrics {
    /// Percentage of compared frames within tolerance (0.0-100.0)
    pub accuracy_pct: f64,
    /// Mean of signed `perf_hz - target_hz`
    pub mean_error_hz: f64,
    /// Population standard deviation of signed `perf_hz - target_hz`
    pub std_error_hz: f64,
    /// Number of frames voiced in both sources
    pub voiced_frame_count: usize,
}

/// Score pitch accuracy of an aligned pair
///
/// # Arguments
///
/// * `pair` - Performance and target on a shared time base
/// * `tolerance_cents` - Inclusive error tolerance (default 100.0, one semitone)
///
/// # Returns
///
/// `AccuracyMetrics`; with no jointly voiced frames every field is zero
pub fn score_accuracy(pair: &AlignedPair, tolerance_cents: f64) -> AccuracyMetrics {
    let mut voiced = 0usize;
    let mut accurate = 0usize;
    let mut errors_hz = Vec::with_capacity(pair.len());

    for (perf_hz, target_hz) in pair.voiced_pairs() {
        voiced += 1;
        if cents(perf_hz, target_hz).abs() <= tolerance_cents + CENTS_EPSILON {
            accurate += 1;
        }
        errors_hz.push(perf_hz - target_hz);
    }

    if voiced == 0 {
        log::warn!("No frames voiced in both performance and target; accuracy is 0");
        return AccuracyMetrics {
            accuracy_pct: 0.0,
            mean_error_hz: 0.0,
            std_error_hz: 0.0,
            voiced_frame_count: 0,
        };
    }

    let (mean_error_hz, std_error_hz) = mean_and_std(&errors_hz);
    let accuracy_pct = (100.0 * accurate as f64 / voiced as f64).clamp(0.0, 100.0);

    log::debug!(
        "Accuracy: {}/{} frames within {:.1} cents ({:.1}%), error {:.2} ± {:.2} Hz",
        accurate,
        voiced,
        tolerance_cents,
        accuracy_pct,
        mean_error_hz,
        std_error_hz
    );

    AccuracyMetrics {
        accuracy_pct,
        mean_error_hz,
        std_error_hz,
        voiced_frame_count: voiced,
    }
}

/// Mean and population standard deviation; `(0, 0)` for an empty slice
pub(crate) fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::PitchSample;
    use crate::preprocessing::alignment::align_samples;

    fn pair_with_offset(n: usize, target_hz: f64, offset_cents: f64) -> AlignedPair {
        let perf_hz = target_hz * 2f64.powf(offset_cents / 1200.0);
        let performance: Vec<PitchSample> = (0..n)
            .map(|i| PitchSample::voiced(i as f64 * 0.01, perf_hz, 1.0))
            .collect();
        let target: Vec<PitchSample> = (0..n)
            .map(|i| PitchSample::voiced(i as f64 * 0.01, target_hz, 1.0))
            .collect();
        align_samples(&performance, &target).unwrap()
    }

    #[test]
    fn test_perfect_match_is_100_percent() {
        let pair = pair_with_offset(50, 330.0, 0.0);
        let metrics = score_accuracy(&pair, 100.0);
        assert_eq!(metrics.accuracy_pct, 100.0);
        assert_eq!(metrics.mean_error_hz, 0.0);
        assert_eq!(metrics.std_error_hz, 0.0);
        assert_eq!(metrics.voiced_frame_count, 50);
    }

    #[test]
    fn test_tolerance_boundary_is_inclusive() {
        for target_hz in [110.0, 261.63, 440.0, 987.77] {
            let pair = pair_with_offset(20, target_hz, 100.0);
            assert_eq!(score_accuracy(&pair, 100.0).accuracy_pct, 100.0);

            let pair = pair_with_offset(20, target_hz, -100.0);
            assert_eq!(score_accuracy(&pair, 100.0).accuracy_pct, 100.0);
        }
    }

    #[test]
    fn test_just_outside_tolerance_is_inaccurate() {
        let pair = pair_with_offset(20, 440.0, 100.01);
        assert_eq!(score_accuracy(&pair, 100.0).accuracy_pct, 0.0);
    }

    #[test]
    fn test_signed_hz_error_statistics() {
        let performance = vec![
            PitchSample::voiced(0.0, 222.0, 1.0),
            PitchSample::voiced(0.1, 218.0, 1.0),
            PitchSample::voiced(0.2, 224.0, 1.0),
            PitchSample::voiced(0.3, 216.0, 1.0),
        ];
        let target: Vec<PitchSample> = (0..4)
            .map(|i| PitchSample::voiced(i as f64 * 0.1, 220.0, 1.0))
            .collect();
        let pair = align_samples(&performance, &target).unwrap();
        let metrics = score_accuracy(&pair, 100.0);

        // Errors: +2, -2, +4, -4
        assert!(metrics.mean_error_hz.abs() < 1e-9);
        assert!((metrics.std_error_hz - 10f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_partial_accuracy() {
        let performance = vec![
            PitchSample::voiced(0.0, 440.0, 1.0),
            PitchSample::voiced(0.1, 440.0, 1.0),
            PitchSample::voiced(0.2, 523.25, 1.0),
            PitchSample::unvoiced(0.3, 0.0),
        ];
        let target: Vec<PitchSample> = (0..4)
            .map(|i| PitchSample::voiced(i as f64 * 0.1, 440.0, 1.0))
            .collect();
        let pair = align_samples(&performance, &target).unwrap();
        let metrics = score_accuracy(&pair, 100.0);

        assert_eq!(metrics.voiced_frame_count, 3);
        assert!((metrics.accuracy_pct - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_voiced_frames_is_zero() {
        let performance: Vec<PitchSample> = (0..10)
            .map(|i| PitchSample::unvoiced(i as f64 * 0.01, 0.0))
            .collect();
        let target: Vec<PitchSample> = (0..10)
            .map(|i| PitchSample::voiced(i as f64 * 0.01, 440.0, 1.0))
            .collect();
        let pair = align_samples(&performance, &target).unwrap();
        let metrics = score_accuracy(&pair, 100.0);
        assert_eq!(metrics.accuracy_pct, 0.0);
        assert_eq!(metrics.mean_error_hz, 0.0);
        assert_eq!(metrics.std_error_hz, 0.0);
        assert_eq!(metrics.voiced_frame_count, 0);
    }
}
