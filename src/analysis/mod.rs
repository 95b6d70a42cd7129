//! Scoring and report assembly
//!
//! Combines the metric stages into the final report:
//! - Result types
//! - Composite score
//! - Feedback notes
//! - Report builder

pub mod feedback;
pub mod report;
pub mod result;
pub mod scoring;
