//! Peak detection in autocorrelation functions
//!
//! The vibrato detector wants the *first* significant periodicity, not the
//! strongest: later peaks sit at integer multiples of the true period and can
//! be nearly as tall.

/// Local maxima of `signal` within `[min_idx, max_idx]` that reach `threshold`
///
/// # Arguments
///
/// * `signal` - Signal to search (e.g. a normalized ACF)
/// * `min_idx` - First index considered (inclusive)
/// * `max_idx` - Last index considered (inclusive, clamped to the signal)
/// * `threshold` - Minimum absolute peak height
///
/// # Returns
///
/// `(index, value)` pairs in index order
///
/// # Example
///
/// ```
/// use cantus::features::vibrato::peak_picking::find_peaks_in_range;
///
/// let signal = vec![1.0, 0.2, 0.5, 0.3, 0.1, 0.6, 0.2];
/// let peaks = find_peaks_in_range(&signal, 1, 6, 0.4);
/// assert_eq!(peaks, vec![(2, 0.5), (5, 0.6)]);
/// ```
pub fn find_peaks_in_range(
    signal: &[f64],
    min_idx: usize,
    max_idx: usize,
    threshold: f64,
) -> Vec<(usize, f64)> {
    if signal.len() < 3 {
        return vec![];
    }

    // Need a neighbour on both sides
    let lo = min_idx.max(1);
    let hi = max_idx.min(signal.len() - 2);
    if lo > hi {
        return vec![];
    }

    (lo..=hi)
        .filter(|&i| {
            let value = signal[i];
            value >= threshold && value > signal[i - 1] && value >= signal[i + 1]
        })
        .map(|i| (i, signal[i]))
        .collect()
}

/// Sub-sample peak position by parabolic interpolation
///
/// Fits a parabola through `signal[idx - 1..=idx + 1]` and returns the vertex
/// position. Falls back to `idx` at the edges or on a flat top.
pub fn refine_peak(signal: &[f64], idx: usize) -> f64 {
    if idx == 0 || idx + 1 >= signal.len() {
        return idx as f64;
    }

    let (left, centre, right) = (signal[idx - 1], signal[idx], signal[idx + 1]);
    let denom = left - 2.0 * centre + right;
    if denom.abs() < 1e-12 {
        return idx as f64;
    }

    let offset = 0.5 * (left - right) / denom;
    idx as f64 + offset.clamp(-0.5, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_filters_small_peaks() {
        let signal = vec![1.0, 0.0, 0.2, 0.0, 0.5, 0.0];
        assert_eq!(find_peaks_in_range(&signal, 1, 5, 0.3), vec![(4, 0.5)]);
    }

    #[test]
    fn test_range_is_respected() {
        let signal = vec![1.0, 0.0, 0.8, 0.0, 0.9, 0.0, 0.7, 0.0];
        assert_eq!(find_peaks_in_range(&signal, 3, 5, 0.3), vec![(4, 0.9)]);
        assert!(find_peaks_in_range(&signal, 7, 9, 0.3).is_empty());
    }

    #[test]
    fn test_short_signal() {
        assert!(find_peaks_in_range(&[1.0, 2.0], 0, 1, 0.0).is_empty());
        assert!(find_peaks_in_range(&[], 0, 10, 0.0).is_empty());
    }

    #[test]
    fn test_refine_symmetric_peak() {
        let signal = vec![0.0, 0.5, 1.0, 0.5, 0.0];
        assert!((refine_peak(&signal, 2) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_refine_skewed_peak() {
        // Samples of -(x - 2.25)^2: vertex at 2.25
        let signal: Vec<f64> = (0..5).map(|i| -((i as f64 - 2.25).powi(2))).collect();
        assert!((refine_peak(&signal, 2) - 2.25).abs() < 1e-9);
    }
}
