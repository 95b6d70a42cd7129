//! Pitch stability estimation
//!
//! Measures how steadily the singer holds pitch, independent of whether it is
//! the right pitch. The contour is detrended against a rolling median (~300 ms)
//! so that note changes and slides do not count against the singer; the
//! frame-to-frame change of what remains is the jitter.
//!
//! `stability = clamp(1 - jitter_cents / scale_cents, 0, 1)`

use crate::config::AnalysisConfig;
use crate::preprocessing::detrend::{residual_cents, window_frames};

/// Estimate stability of a voiced pitch sequence
///
/// # Arguments
///
/// * `voiced_hz` - Voiced performance frequencies in time order (unvoiced frames removed)
/// * `frame_period_s` - Contour hop in seconds, used to size the detrending window
/// * `config` - Uses `stability_window_ms` and `stability_scale_cents`
///
/// # Returns
///
/// Stability in [0.0, 1.0]; 0.0 with fewer than 2 voiced frames
pub fn estimate_stability(voiced_hz: &[f64], frame_period_s: f64, config: &AnalysisConfig) -> f64 {
    if voiced_hz.len() < 2 {
        log::debug!(
            "Stability needs at least 2 voiced frames, got {}",
            voiced_hz.len()
        );
        return 0.0;
    }

    let window = window_frames(config.stability_window_ms, frame_period_s);
    let residual = residual_cents(voiced_hz, window);
    let jitter = jitter_cents(&residual);

    let stability = (1.0 - jitter / config.stability_scale_cents).clamp(0.0, 1.0);

    log::debug!(
        "Stability: window={} frames, jitter={:.2} cents, stability={:.3}",
        window,
        jitter,
        stability
    );

    stability
}

/// Root mean square of the frame-to-frame residual change
///
/// This is the standard deviation of the steps taken about zero, not about
/// their mean.
fn jitter_cents(residual: &[f64]) -> f64 {
    let steps = residual.len().saturating_sub(1);
    if steps == 0 {
        return 0.0;
    }
    let sum_sq: f64 = residual.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
    (sum_sq / steps as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_cents(base_hz: f64, offsets: impl Iterator<Item = f64>) -> Vec<f64> {
        offsets
            .map(|c| base_hz * 2f64.powf(c / 1200.0))
            .collect()
    }

    #[test]
    fn test_steady_tone_is_fully_stable() {
        let hz = vec![261.63; 200];
        let stability = estimate_stability(&hz, 0.01, &AnalysisConfig::default());
        assert!((stability - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_note_changes_are_not_penalised() {
        // Four held notes; only the transitions produce residual
        let mut hz = vec![220.0; 100];
        hz.extend(vec![246.94; 100]);
        hz.extend(vec![261.63; 100]);
        hz.extend(vec![293.66; 100]);
        let stability = estimate_stability(&hz, 0.01, &AnalysisConfig::default());
        assert!(stability > 0.95, "stability {}", stability);
    }

    #[test]
    fn test_jitter_lowers_stability() {
        let config = AnalysisConfig::default();

        // Alternating ±1.5 cent jitter; the rolling median lands on the opposite
        // phase, so the residual swings ±3 cents
        let mild = with_cents(220.0, (0..300).map(|i| if i % 2 == 0 { 1.5 } else { -1.5 }));
        // ±15 cent jitter
        let rough = with_cents(220.0, (0..300).map(|i| if i % 2 == 0 { 15.0 } else { -15.0 }));

        let s_mild = estimate_stability(&mild, 0.01, &config);
        let s_rough = estimate_stability(&rough, 0.01, &config);

        assert!(s_mild > s_rough, "{} vs {}", s_mild, s_rough);
        assert!(s_mild > 0.6 && s_mild < 0.9, "mild {}", s_mild);
        assert_eq!(s_rough, 0.0);
    }

    #[test]
    fn test_insufficient_frames() {
        let config = AnalysisConfig::default();
        assert_eq!(estimate_stability(&[], 0.01, &config), 0.0);
        assert_eq!(estimate_stability(&[440.0], 0.01, &config), 0.0);
    }

    #[test]
    fn test_result_is_bounded() {
        let config = AnalysisConfig::default();
        let wild = with_cents(
            300.0,
            (0..500).map(|i| ((i * 7919) % 400) as f64 - 200.0),
        );
        let s = estimate_stability(&wild, 0.01, &config);
        assert!((0.0..=1.0).contains(&s));
    }
}
