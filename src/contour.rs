//! Pitch contour data model
//!
//! A contour is the output of the pitch-extraction stage: a time-ordered list
//! of frames, each either voiced (a usable fundamental frequency) or unvoiced.
//! Unvoiced frames are an explicit variant, never a sentinel frequency.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Pitch of a single frame
///
/// Serialized as a plain number (Hz) or `null` for unvoiced frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Pitch {
    /// Fundamental frequency in Hz (finite, > 0)
    Voiced(f64),
    /// Silence, noise or unvoiced speech
    Unvoiced,
}

impl Pitch {
    /// Frequency in Hz, `None` when unvoiced
    pub fn hz(&self) -> Option<f64> {
        match self {
            Pitch::Voiced(hz) => Some(*hz),
            Pitch::Unvoiced => None,
        }
    }

    /// True for `Pitch::Voiced`
    pub fn is_voiced(&self) -> bool {
        matches!(self, Pitch::Voiced(_))
    }
}

impl From<Option<f64>> for Pitch {
    fn from(hz: Option<f64>) -> Self {
        match hz {
            Some(hz) => Pitch::Voiced(hz),
            None => Pitch::Unvoiced,
        }
    }
}

impl From<Pitch> for Option<f64> {
    fn from(pitch: Pitch) -> Self {
        pitch.hz()
    }
}

/// One frame of a pitch contour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchSample {
    /// Frame time in seconds
    pub time: f64,

    /// Detected pitch
    #[serde(rename = "frequency")]
    pub pitch: Pitch,

    /// Extractor confidence (0.0-1.0)
    #[serde(default = "full_confidence")]
    pub confidence: f64,
}

fn full_confidence() -> f64 {
    1.0
}

impl PitchSample {
    /// Voiced frame
    pub fn voiced(time: f64, frequency_hz: f64, confidence: f64) -> Self {
        Self {
            time,
            pitch: Pitch::Voiced(frequency_hz),
            confidence,
        }
    }

    /// Unvoiced frame
    pub fn unvoiced(time: f64, confidence: f64) -> Self {
        Self {
            time,
            pitch: Pitch::Unvoiced,
            confidence,
        }
    }
}

/// Validated, immutable pitch contour
///
/// Construction guarantees:
/// - at least one sample
/// - times finite and strictly increasing
/// - voiced frequencies finite and positive
/// - confidences finite and within [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PitchSample>", into = "Vec<PitchSample>")]
pub struct PitchContour {
    samples: Vec<PitchSample>,
}

impl PitchContour {
    /// Build a contour from samples
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ValidationError` if the contour is empty, times are
    /// not strictly increasing, or a frequency/confidence is out of range
    pub fn new(samples: Vec<PitchSample>) -> Result<Self, AnalysisError> {
        if samples.is_empty() {
            return Err(AnalysisError::ValidationError(
                "Empty pitch contour".to_string(),
            ));
        }

        for (i, sample) in samples.iter().enumerate() {
            if !sample.time.is_finite() {
                return Err(AnalysisError::ValidationError(format!(
                    "Non-finite time at frame {}",
                    i
                )));
            }

            if let Pitch::Voiced(hz) = sample.pitch {
                if !hz.is_finite() || hz <= 0.0 {
                    return Err(AnalysisError::ValidationError(format!(
                        "Invalid voiced frequency {} Hz at frame {}",
                        hz, i
                    )));
                }
            }

            if !(0.0..=1.0).contains(&sample.confidence) {
                return Err(AnalysisError::ValidationError(format!(
                    "Confidence {} outside [0, 1] at frame {}",
                    sample.confidence, i
                )));
            }
        }

        if let Some(i) = first_non_increasing(&samples) {
            return Err(AnalysisError::ValidationError(format!(
                "Times not strictly increasing at frame {} ({:.6}s after {:.6}s)",
                i,
                samples[i].time,
                samples[i - 1].time
            )));
        }

        Ok(Self { samples })
    }

    /// Build a contour from parallel arrays as produced by a pitch tracker
    ///
    /// `frequencies` uses `None` for unvoiced frames.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ValidationError` if the array lengths differ or
    /// the resulting contour is malformed
    pub fn from_arrays(
        times: &[f64],
        frequencies: &[Option<f64>],
        confidences: &[f64],
    ) -> Result<Self, AnalysisError> {
        if times.len() != frequencies.len() || times.len() != confidences.len() {
            return Err(AnalysisError::ValidationError(format!(
                "Mismatched contour arrays: {} times, {} frequencies, {} confidences",
                times.len(),
                frequencies.len(),
                confidences.len()
            )));
        }

        let samples = times
            .iter()
            .zip(frequencies)
            .zip(confidences)
            .map(|((&time, &hz), &confidence)| PitchSample {
                time,
                pitch: Pitch::from(hz),
                confidence,
            })
            .collect();

        Self::new(samples)
    }

    /// All samples in time order
    pub fn samples(&self) -> &[PitchSample] {
        &self.samples
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed contour; present for API symmetry
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of voiced frames
    pub fn voiced_frame_count(&self) -> usize {
        self.samples.iter().filter(|s| s.pitch.is_voiced()).count()
    }

    /// Time span between the first and last frame, in seconds
    pub fn duration_seconds(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }

    /// Median spacing between consecutive frames, in seconds
    ///
    /// `None` for a single-frame contour.
    pub fn frame_period_seconds(&self) -> Option<f64> {
        let times: Vec<f64> = self.samples.iter().map(|s| s.time).collect();
        median_step(&times)
    }

    /// Copy of the contour with low-confidence frames marked unvoiced
    pub fn gated(&self, min_confidence: f64) -> PitchContour {
        let samples = self
            .samples
            .iter()
            .map(|s| {
                if s.confidence < min_confidence {
                    PitchSample {
                        pitch: Pitch::Unvoiced,
                        ..*s
                    }
                } else {
                    *s
                }
            })
            .collect();
        PitchContour { samples }
    }
}

impl TryFrom<Vec<PitchSample>> for PitchContour {
    type Error = AnalysisError;

    fn try_from(samples: Vec<PitchSample>) -> Result<Self, Self::Error> {
        Self::new(samples)
    }
}

impl From<PitchContour> for Vec<PitchSample> {
    fn from(contour: PitchContour) -> Self {
        contour.samples
    }
}

/// Index of the first sample whose time does not exceed its predecessor's
pub(crate) fn first_non_increasing(samples: &[PitchSample]) -> Option<usize> {
    samples
        .windows(2)
        .position(|w| w[1].time <= w[0].time)
        .map(|i| i + 1)
}

/// Median of consecutive differences; `None` with fewer than two values
pub(crate) fn median_step(times: &[f64]) -> Option<f64> {
    if times.len() < 2 {
        return None;
    }
    let mut steps: Vec<f64> = times.windows(2).map(|w| w[1] - w[0]).collect();
    Some(crate::preprocessing::detrend::median_in_place(&mut steps))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_contour() {
        let contour = PitchContour::new(vec![
            PitchSample::voiced(0.00, 220.0, 0.9),
            PitchSample::unvoiced(0.01, 0.1),
            PitchSample::voiced(0.02, 221.0, 0.8),
        ])
        .unwrap();

        assert_eq!(contour.len(), 3);
        assert_eq!(contour.voiced_frame_count(), 2);
        assert!((contour.duration_seconds() - 0.02).abs() < 1e-12);
        assert!((contour.frame_period_seconds().unwrap() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_empty_contour_rejected() {
        let result = PitchContour::new(vec![]);
        assert!(matches!(result, Err(AnalysisError::ValidationError(_))));
    }

    #[test]
    fn test_non_monotonic_rejected() {
        let result = PitchContour::new(vec![
            PitchSample::voiced(0.0, 220.0, 1.0),
            PitchSample::voiced(0.02, 220.0, 1.0),
            PitchSample::voiced(0.02, 220.0, 1.0),
        ]);
        match result {
            Err(AnalysisError::ValidationError(msg)) => assert!(msg.contains("frame 2")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_frequency_rejected() {
        assert!(PitchContour::new(vec![PitchSample::voiced(0.0, 0.0, 1.0)]).is_err());
        assert!(PitchContour::new(vec![PitchSample::voiced(0.0, -5.0, 1.0)]).is_err());
        assert!(PitchContour::new(vec![PitchSample::voiced(0.0, f64::NAN, 1.0)]).is_err());
    }

    #[test]
    fn test_mismatched_arrays_rejected() {
        let result = PitchContour::from_arrays(&[0.0, 0.01], &[Some(220.0)], &[1.0, 1.0]);
        assert!(matches!(result, Err(AnalysisError::ValidationError(_))));
    }

    #[test]
    fn test_gating_marks_low_confidence_unvoiced() {
        let contour = PitchContour::from_arrays(
            &[0.0, 0.01, 0.02],
            &[Some(220.0), Some(230.0), None],
            &[0.9, 0.3, 0.9],
        )
        .unwrap();

        let gated = contour.gated(0.5);
        assert_eq!(gated.samples()[0].pitch, Pitch::Voiced(220.0));
        assert_eq!(gated.samples()[1].pitch, Pitch::Unvoiced);
        assert_eq!(gated.voiced_frame_count(), 1);
    }

    #[test]
    fn test_json_shape() {
        let json = r#"[
            {"time": 0.0, "frequency": 440.0, "confidence": 0.95},
            {"time": 0.01, "frequency": null, "confidence": 0.1},
            {"time": 0.02, "frequency": 441.0}
        ]"#;
        let contour: PitchContour = serde_json::from_str(json).unwrap();
        assert_eq!(contour.len(), 3);
        assert_eq!(contour.samples()[1].pitch, Pitch::Unvoiced);
        assert_eq!(contour.samples()[2].confidence, 1.0);

        let bad = r#"[{"time": 0.1, "frequency": 440.0}, {"time": 0.0, "frequency": 440.0}]"#;
        assert!(serde_json::from_str::<PitchContour>(bad).is_err());
    }
}
