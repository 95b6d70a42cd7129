//! Normalized autocorrelation of the pitch residual
//!
//! Uses FFT acceleration: `ACF = IFFT(|FFT(signal)|²)`, with the signal
//! mean-removed and zero-padded to at least twice its length so the circular
//! correlation equals the linear one. The result is divided by `ACF[0]`, so a
//! perfectly periodic signal approaches 1.0 at its period (minus the taper
//! from the shrinking overlap at longer lags).

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

const EPSILON: f64 = 1e-12;

/// Normalized autocorrelation for lags `0..=max_lag`
///
/// # Arguments
///
/// * `signal` - Input signal (residual in cents)
/// * `max_lag` - Largest lag to return (clamped to `signal.len() - 1`)
///
/// # Returns
///
/// `acf[lag]` with `acf[0] == 1.0`; empty when the signal is empty or has no
/// variance (a flat residual carries no periodicity)
pub fn normalized_autocorrelation(signal: &[f64], max_lag: usize) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return vec![];
    }

    let mean = signal.iter().sum::<f64>() / n as f64;
    let energy: f64 = signal.iter().map(|x| (x - mean).powi(2)).sum();
    if energy < EPSILON {
        return vec![];
    }

    let fft_size = (2 * n).next_power_of_two();
    let mut buffer: Vec<Complex<f64>> = signal
        .iter()
        .map(|&x| Complex::new(x - mean, 0.0))
        .collect();
    buffer.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    fft.process(&mut buffer);

    for x in &mut buffer {
        *x = *x * x.conj();
    }

    let ifft = planner.plan_fft_inverse(fft_size);
    ifft.process(&mut buffer);

    let last = max_lag.min(n - 1);
    let zero_lag = buffer[0].re;
    buffer[..=last]
        .iter()
        .map(|x| (x.re / zero_lag).clamp(-1.0, 1.0))
        .collect()
}

/// Direct time-domain normalized autocorrelation
///
/// Used for short windows where planning an FFT costs more than it saves.
/// Same normalization and return contract as [`normalized_autocorrelation`].
pub fn normalized_autocorrelation_direct(signal: &[f64], max_lag: usize) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return vec![];
    }

    let mean = signal.iter().sum::<f64>() / n as f64;
    let centred: Vec<f64> = signal.iter().map(|x| x - mean).collect();
    let energy: f64 = centred.iter().map(|x| x * x).sum();
    if energy < EPSILON {
        return vec![];
    }

    (0..=max_lag.min(n - 1))
        .map(|lag| {
            let sum: f64 = centred[..n - lag]
                .iter()
                .zip(&centred[lag..])
                .map(|(a, b)| a * b)
                .sum();
            (sum / energy).clamp(-1.0, 1.0)
        })
        .collect()
}
