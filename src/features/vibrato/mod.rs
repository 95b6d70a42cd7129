//! Vibrato detection
//!
//! Finds periodic pitch oscillation in the voiced part of a performance.
//!
//! # Algorithm
//!
//! 1. Detrend the voiced contour against a rolling median (same residual as
//!    the stability estimator)
//! 2. Normalized autocorrelation of the residual (FFT-accelerated)
//! 3. First local peak at or above the significance threshold within the lags
//!    of a 3-10 Hz oscillation, confirmed by anti-correlation near half the lag
//! 4. Rate = frame rate / refined lag
//! 5. Depth = median peak-to-peak over one-period windows, after re-detrending
//!    with a window of two periods so the trend does not follow the oscillation
//! 6. Detected only if the rate is inside the accepted band and the depth
//!    reaches the minimum
//! 7. Coverage from an independent sliding-window test (see [`coverage`])
//!
//! Below `min_voiced_frames_for_vibrato` voiced frames the detector returns a
//! zeroed, not-detected result; periodicity estimates are meaningless there.

pub mod autocorrelation;
pub mod coverage;
pub mod peak_picking;

use crate::analysis::result::VibratoMetrics;
use crate::config::AnalysisConfig;
use crate::contour::median_step;
use crate::preprocessing::detrend::{median_in_place, residual_cents, window_frames};
use autocorrelation::normalized_autocorrelation;
use peak_picking::{find_peaks_in_range, refine_peak};

/// Inclusive lag range (frames) covering an oscillation band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LagRange {
    /// Shortest lag (fastest oscillation)
    pub min: usize,
    /// Longest lag (slowest oscillation)
    pub max: usize,
}

impl LagRange {
    /// Lags spanning `(min_hz, max_hz)` at `frame_rate` frames per second
    pub fn for_band(frame_rate: f64, (min_hz, max_hz): (f64, f64)) -> Self {
        let min = ((frame_rate / max_hz).floor() as usize).max(1);
        let max = ((frame_rate / min_hz).ceil() as usize).max(min);
        Self { min, max }
    }
}

/// Detect vibrato in a voiced pitch sequence
///
/// # Arguments
///
/// * `voiced_hz` - Voiced performance frequencies in time order
/// * `voiced_times` - Time stamps (seconds) of those frames
/// * `config` - Vibrato band, depth, significance and window parameters
///
/// # Returns
///
/// `VibratoMetrics`; `detected == false` comes with all other fields zeroed
///
/// # Example
///
/// ```
/// use cantus::features::vibrato::detect_vibrato;
/// use cantus::AnalysisConfig;
///
/// // 2 s of A4 with a 6 Hz, 40-cent (peak-to-peak) vibrato at 100 frames/s
/// let times: Vec<f64> = (0..200).map(|i| i as f64 * 0.01).collect();
/// let hz: Vec<f64> = times
///     .iter()
///     .map(|t| 440.0 * 2f64.powf(20.0 * (2.0 * std::f64::consts::PI * 6.0 * t).sin() / 1200.0))
///     .collect();
///
/// let vibrato = detect_vibrato(&hz, &times, &AnalysisConfig::default());
/// assert!(vibrato.detected);
/// assert!((vibrato.frequency_hz - 6.0).abs() < 0.3);
/// ```
pub fn detect_vibrato(voiced_hz: &[f64], voiced_times: &[f64], config: &AnalysisConfig) -> VibratoMetrics {
    let n = voiced_hz.len();
    if n < config.min_voiced_frames_for_vibrato || n != voiced_times.len() {
        log::debug!(
            "Vibrato detection disabled: {} voiced frames (minimum {})",
            n,
            config.min_voiced_frames_for_vibrato
        );
        return VibratoMetrics::not_detected();
    }

    let Some(frame_period) = median_step(voiced_times).filter(|p| *p > 0.0) else {
        return VibratoMetrics::not_detected();
    };
    let frame_rate = 1.0 / frame_period;

    let window = window_frames(config.stability_window_ms, frame_period);
    let residual = residual_cents(voiced_hz, window);

    let search = LagRange::for_band(frame_rate, config.vibrato_search_range);
    let acf = normalized_autocorrelation(&residual, search.max.saturating_add(1));

    let Some((peak_idx, peak_value)) = local_periodicity(&acf, search, config.acf_significance) else {
        log::debug!("No significant periodicity in pitch residual");
        return VibratoMetrics::not_detected();
    };

    let lag = refine_peak(&acf, peak_idx);
    let frequency_hz = frame_rate / lag;
    let depth_cents = period_depth_cents(voiced_hz, lag);

    let (band_lo, band_hi) = config.vibrato_freq_range;
    let in_band = (band_lo..=band_hi).contains(&frequency_hz);
    let deep_enough = depth_cents >= config.min_vibrato_depth_cents;

    log::debug!(
        "Vibrato candidate: lag={:.2} frames (acf={:.2}), rate={:.2} Hz, depth={:.1} cents, in_band={}, deep_enough={}",
        lag,
        peak_value,
        frequency_hz,
        depth_cents,
        in_band,
        deep_enough
    );

    if !(in_band && deep_enough) {
        return VibratoMetrics::not_detected();
    }

    let coverage_window = ((config.vibrato_coverage_window_ms / 1000.0) * frame_rate).round() as usize;
    let coverage_pct = coverage::vibrato_coverage(
        voiced_hz,
        &residual,
        coverage_window,
        LagRange::for_band(frame_rate, config.vibrato_freq_range),
        config.acf_significance,
        config.min_vibrato_depth_cents,
    );

    VibratoMetrics {
        frequency_hz,
        depth_cents,
        coverage_pct,
        detected: true,
    }
}

/// First autocorrelation peak in `range` that marks a genuine oscillation
///
/// A peak qualifies when it reaches `significance` and the autocorrelation
/// dips to `-significance` or below somewhere between a quarter and three
/// quarters of its lag, as an oscillation anti-correlates at half its period.
pub(crate) fn local_periodicity(
    acf: &[f64],
    range: LagRange,
    significance: f64,
) -> Option<(usize, f64)> {
    find_peaks_in_range(acf, range.min, range.max, significance)
        .into_iter()
        .find(|&(lag, _)| {
            let lo = (lag / 4).max(1);
            let hi = ((3 * lag) / 4).max(lo).min(acf.len() - 1);
            acf[lo..=hi].iter().copied().fold(f64::INFINITY, f64::min) <= -significance
        })
}

/// Median peak-to-peak excursion (cents) over consecutive one-period windows
///
/// The contour is detrended with a window of two periods, which spans whole
/// cycles and leaves the trend free of the oscillation itself.
pub(crate) fn period_depth_cents(voiced_hz: &[f64], lag: f64) -> f64 {
    let period = (lag.round() as usize).max(1);
    if voiced_hz.len() < 2 {
        return 0.0;
    }

    let residual = residual_cents(voiced_hz, 2 * period + 1);
    let mut excursions: Vec<f64> = residual
        .chunks_exact(period)
        .map(peak_to_peak)
        .collect();

    if excursions.is_empty() {
        return peak_to_peak(&residual);
    }
    median_in_place(&mut excursions)
}

fn peak_to_peak(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    if max >= min {
        max - min
    } else {
        0.0
    }
}
