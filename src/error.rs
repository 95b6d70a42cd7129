//! Error types for the performance analysis engine

use std::fmt;

/// Errors that can occur during performance analysis
///
/// Sparse or unvoiced input is not an error: it yields zeroed metrics and a
/// complete report. Only structurally malformed input ends up here.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Malformed contour (empty, non-monotonic time, mismatched array lengths,
    /// invalid frequency or confidence)
    ValidationError(String),

    /// Contour cannot be used as an interpolation source
    AlignmentError(String),

    /// Configuration value out of its meaningful range
    InvalidConfig(String),

    /// Report could not be encoded as a document
    SerializationError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AnalysisError::AlignmentError(msg) => write!(f, "Alignment error: {}", msg),
            AnalysisError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            AnalysisError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::SerializationError(err.to_string())
    }
}
