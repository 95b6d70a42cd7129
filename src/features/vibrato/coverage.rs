//! Vibrato coverage
//!
//! Vibrato is often intermittent: held notes get it, short notes do not. The
//! coverage test slides a window over the voiced residual and asks, window by
//! window, whether there is an oscillation in the vibrato band deep enough to
//! count. Frames inside any passing window are covered.
//!
//! The local test does not reuse the global rate estimate; each window finds
//! its own period.

use super::autocorrelation::normalized_autocorrelation_direct;
use super::{local_periodicity, period_depth_cents, LagRange};

/// Percentage of frames inside windows that pass the local periodicity test
///
/// # Arguments
///
/// * `voiced_hz` - Voiced frequencies in time order
/// * `residual` - Detrended residual (cents) for the same frames
/// * `window` - Window length in frames (clamped to the signal length)
/// * `band` - Lag range of the accepted vibrato band
/// * `significance` - Minimum normalized autocorrelation at the period
/// * `min_depth_cents` - Minimum local peak-to-peak depth
///
/// # Returns
///
/// Coverage in [0.0, 100.0]
pub fn vibrato_coverage(
    voiced_hz: &[f64],
    residual: &[f64],
    window: usize,
    band: LagRange,
    significance: f64,
    min_depth_cents: f64,
) -> f64 {
    let n = residual.len();
    if n == 0 || voiced_hz.len() != n {
        return 0.0;
    }

    let window = window.clamp(3, n);
    let hop = (window / 4).max(1);

    let mut starts: Vec<usize> = (0..=n - window).step_by(hop).collect();
    if starts.last() != Some(&(n - window)) {
        starts.push(n - window);
    }

    let mut covered = vec![false; n];
    let mut passing = 0usize;

    for &start in &starts {
        let end = start + window;
        let acf = normalized_autocorrelation_direct(&residual[start..end], band.max.saturating_add(1));

        let Some((lag, _)) = local_periodicity(&acf, band, significance) else {
            continue;
        };

        if period_depth_cents(&voiced_hz[start..end], lag as f64) >= min_depth_cents {
            passing += 1;
            covered[start..end].iter_mut().for_each(|c| *c = true);
        }
    }

    let covered_frames = covered.iter().filter(|&&c| c).count();
    let coverage = 100.0 * covered_frames as f64 / n as f64;

    log::debug!(
        "Vibrato coverage: {}/{} windows passed ({} frames each), {:.1}% of voiced frames",
        passing,
        starts.len(),
        window,
        coverage
    );

    coverage.clamp(0.0, 100.0)
}
