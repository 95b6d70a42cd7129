//! Pitch residual detrending
//!
//! Intended melodic movement (note changes, slides) is removed by subtracting a
//! centred rolling median from the contour in the cent domain. What is left is
//! jitter and oscillation around the local pitch centre, which both the
//! stability estimator and the vibrato detector work on.

/// Median of a slice, reordering it in place
///
/// Even-length input averages the two middle values. Returns 0.0 for an empty slice.
pub fn median_in_place(values: &mut [f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }

    let mid = n / 2;
    let (lower, upper_mid, _) = values.select_nth_unstable_by(mid, f64::total_cmp);
    let upper_mid = *upper_mid;

    if n % 2 == 0 {
        let lower_mid = lower.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (lower_mid + upper_mid) * 0.5
    } else {
        upper_mid
    }
}

/// Convert a window duration into an odd frame count (at least 3)
///
/// Falls back to 3 frames when the frame period is unknown or degenerate.
pub fn window_frames(window_ms: f64, frame_period_s: f64) -> usize {
    if !(frame_period_s.is_finite() && frame_period_s > 0.0) {
        return 3;
    }

    let frames = (window_ms / 1000.0 / frame_period_s).round().max(3.0) as usize;
    if frames % 2 == 0 {
        frames + 1
    } else {
        frames
    }
}

/// Centred rolling median, truncated at the edges
///
/// A window longer than `values` covers the whole slice.
pub fn rolling_median(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.min(values.len());
    let half = window / 2;
    let mut scratch = Vec::with_capacity(window);

    (0..values.len())
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(values.len());
            scratch.clear();
            scratch.extend_from_slice(&values[start..end]);
            median_in_place(&mut scratch)
        })
        .collect()
}

/// Pitch residual in cents relative to the local median
///
/// `voiced_hz` must contain only voiced (positive) frequencies in time order.
pub fn residual_cents(voiced_hz: &[f64], window: usize) -> Vec<f64> {
    let trend = rolling_median(voiced_hz, window);
    voiced_hz
        .iter()
        .zip(&trend)
        .map(|(&hz, &centre)| cents(hz, centre))
        .collect()
}

/// Pitch distance `1200 * log2(f1 / f2)`
pub fn cents(f1: f64, f2: f64) -> f64 {
    1200.0 * (f1 / f2).log2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median_in_place(&mut [3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median_in_place(&mut [4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median_in_place(&mut []), 0.0);
    }

    #[test]
    fn test_window_frames_is_odd() {
        // 300 ms at 100 fps
        assert_eq!(window_frames(300.0, 0.01), 31);
        // 300 ms at 50 fps -> 15
        assert_eq!(window_frames(300.0, 0.02), 15);
        // very coarse frame rate clamps to 3
        assert_eq!(window_frames(300.0, 1.0), 3);
        assert_eq!(window_frames(300.0, 0.0), 3);
    }

    #[test]
    fn test_rolling_median_removes_outlier() {
        let values = vec![1.0, 1.0, 9.0, 1.0, 1.0];
        let smoothed = rolling_median(&values, 3);
        assert_eq!(smoothed, vec![1.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_oversized_window_spans_whole_slice() {
        let values = vec![1.0, 5.0, 3.0];
        assert_eq!(rolling_median(&values, usize::MAX), vec![3.0, 3.0, 3.0]);
        assert!(rolling_median(&[], usize::MAX).is_empty());

        // A sub-nanosecond hop asks for billions of frames
        let window = window_frames(300.0, 1e-10);
        assert!(window > 1_000_000);
        let residual = residual_cents(&[440.0; 20], window);
        assert_eq!(residual.len(), 20);
        assert!(residual.iter().all(|r| r.abs() < 1e-9));
    }

    #[test]
    fn test_residual_of_steady_tone_is_zero() {
        let hz = vec![440.0; 50];
        let residual = residual_cents(&hz, 31);
        assert!(residual.iter().all(|r| r.abs() < 1e-9));
    }

    #[test]
    fn test_residual_follows_note_change() {
        // A step from A4 to B4 should leave only a short transient in the residual
        let mut hz = vec![440.0; 40];
        hz.extend(vec![493.88; 40]);
        let residual = residual_cents(&hz, 11);
        assert!(residual[..30].iter().all(|r| r.abs() < 1e-9));
        assert!(residual[50..].iter().all(|r| r.abs() < 1e-9));
    }

    #[test]
    fn test_cents() {
        assert!((cents(880.0, 440.0) - 1200.0).abs() < 1e-9);
        assert!((cents(440.0, 440.0)).abs() < 1e-12);
    }
}
