//! Target-to-performance contour alignment
//!
//! The performance and the reference melody usually come from different pitch
//! tracker runs, with different hop sizes, start offsets and lengths. The
//! aligner resamples the target onto the performance's time points so that every
//! downstream metric compares frames that share one time base.
//!
//! # Algorithm
//!
//! Unvoiced target samples are dropped first; only voiced samples serve as
//! interpolation points. For each performance time `t`:
//! 1. Locate the nearest voiced target samples `a` and `b` with `a.time <= t <= b.time`
//! 2. If no voiced sample lies on one side of `t`, the target frame is unvoiced
//! 3. Otherwise interpolate linearly in Hz between `a` and `b`
//!
//! Unvoiced gaps inside the target are bridged. The target is never
//! extrapolated past its first or last voiced sample.

use crate::contour::{first_non_increasing, Pitch, PitchContour, PitchSample};
use crate::error::AnalysisError;

/// Performance and target pitch sharing the performance time base
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    times: Vec<f64>,
    performance: Vec<Pitch>,
    target: Vec<Pitch>,
}

impl AlignedPair {
    /// Number of frames (always the performance contour length)
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True when there are no frames
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Shared time base in seconds
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Performance pitch per frame
    pub fn performance(&self) -> &[Pitch] {
        &self.performance
    }

    /// Interpolated target pitch per frame
    pub fn target(&self) -> &[Pitch] {
        &self.target
    }

    /// True when both sources are voiced at `frame`; false past the last frame
    pub fn is_voiced(&self, frame: usize) -> bool {
        match (self.performance.get(frame), self.target.get(frame)) {
            (Some(p), Some(t)) => p.is_voiced() && t.is_voiced(),
            _ => false,
        }
    }

    /// `(performance_hz, target_hz)` for every frame voiced in both sources
    pub fn voiced_pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.performance
            .iter()
            .zip(&self.target)
            .filter_map(|(p, t)| Some((p.hz()?, t.hz()?)))
    }

    /// Voiced performance frames as `(times, frequencies_hz)`, chronological
    ///
    /// Independent of target voicing: stability and vibrato describe the singer alone.
    pub fn performance_voiced(&self) -> (Vec<f64>, Vec<f64>) {
        self.times
            .iter()
            .zip(&self.performance)
            .filter_map(|(&t, p)| p.hz().map(|hz| (t, hz)))
            .unzip()
    }

    /// Frames where the performance is voiced but the target is not
    pub fn target_unvoiced_count(&self) -> usize {
        self.performance
            .iter()
            .zip(&self.target)
            .filter(|(p, t)| p.is_voiced() && !t.is_voiced())
            .count()
    }
}

/// Align a target contour onto a performance contour's time points
///
/// # Errors
///
/// Returns `AnalysisError::AlignmentError` if either contour cannot be
/// interpolated (see [`align_samples`])
///
/// # Example
///
/// ```
/// use cantus::contour::{PitchContour, PitchSample};
/// use cantus::preprocessing::alignment::align;
///
/// let performance = PitchContour::new(vec![
///     PitchSample::voiced(0.0, 220.0, 1.0),
///     PitchSample::voiced(0.5, 221.0, 1.0),
/// ])?;
/// let target = PitchContour::new(vec![
///     PitchSample::voiced(0.0, 220.0, 1.0),
///     PitchSample::voiced(1.0, 240.0, 1.0),
/// ])?;
///
/// let pair = align(&performance, &target)?;
/// assert_eq!(pair.len(), 2);
/// assert_eq!(pair.target()[1].hz(), Some(230.0));
/// # Ok::<(), cantus::AnalysisError>(())
/// ```
pub fn align(
    performance: &PitchContour,
    target: &PitchContour,
) -> Result<AlignedPair, AnalysisError> {
    align_samples(performance.samples(), target.samples())
}

/// Align raw sample sequences
///
/// Slice-level entry point for callers that hold samples outside a validated
/// [`PitchContour`].
///
/// # Errors
///
/// Returns `AnalysisError::AlignmentError` if either sequence is empty or its
/// times are not finite and strictly increasing
pub fn align_samples(
    performance: &[PitchSample],
    target: &[PitchSample],
) -> Result<AlignedPair, AnalysisError> {
    check_interpolable("performance", performance)?;
    check_interpolable("target", target)?;

    log::debug!(
        "Aligning target ({} frames, {:.3}-{:.3}s) onto performance ({} frames, {:.3}-{:.3}s)",
        target.len(),
        target[0].time,
        target[target.len() - 1].time,
        performance.len(),
        performance[0].time,
        performance[performance.len() - 1].time
    );

    let times: Vec<f64> = performance.iter().map(|s| s.time).collect();
    let perf_pitch: Vec<Pitch> = performance.iter().map(|s| s.pitch).collect();

    let voiced: Vec<(f64, f64)> = target
        .iter()
        .filter_map(|s| s.pitch.hz().map(|hz| (s.time, hz)))
        .collect();

    // Performance times are increasing, so the bracketing segment only moves forward
    let mut segment = 0;
    let target_pitch: Vec<Pitch> = times
        .iter()
        .map(|&t| {
            while segment + 1 < voiced.len() && voiced[segment + 1].0 < t {
                segment += 1;
            }
            interpolate_at(&voiced, segment, t)
        })
        .collect();

    let pair = AlignedPair {
        times,
        performance: perf_pitch,
        target: target_pitch,
    };

    log::debug!(
        "Aligned pair: {} frames, {} voiced in both, {} performance frames without target",
        pair.len(),
        pair.voiced_pairs().count(),
        pair.target_unvoiced_count()
    );

    Ok(pair)
}

/// Target pitch at `t` from voiced `(time, hz)` points, given the first
/// candidate segment start `segment`
fn interpolate_at(voiced: &[(f64, f64)], segment: usize, t: f64) -> Pitch {
    let (Some(&(first, _)), Some(&(last, _))) = (voiced.first(), voiced.last()) else {
        return Pitch::Unvoiced;
    };
    if t < first || t > last {
        return Pitch::Unvoiced;
    }

    let (ta, fa) = voiced[segment];
    if t == ta {
        return Pitch::Voiced(fa);
    }

    let Some(&(tb, fb)) = voiced.get(segment + 1) else {
        return Pitch::Unvoiced;
    };
    if t == tb {
        return Pitch::Voiced(fb);
    }

    let frac = (t - ta) / (tb - ta);
    Pitch::Voiced(fa + (fb - fa) * frac)
}

fn check_interpolable(label: &str, samples: &[PitchSample]) -> Result<(), AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::AlignmentError(format!(
            "Empty {} contour",
            label
        )));
    }

    if let Some(i) = samples.iter().position(|s| !s.time.is_finite()) {
        return Err(AnalysisError::AlignmentError(format!(
            "Non-finite time in {} contour at frame {}",
            label, i
        )));
    }

    if let Some(i) = first_non_increasing(samples) {
        return Err(AnalysisError::AlignmentError(format!(
            "Non-monotonic time in {} contour at frame {}",
            label, i
        )));
    }

    Ok(())
}
