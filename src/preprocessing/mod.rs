//! Contour preprocessing
//!
//! This module prepares pitch contours for the metric stages:
//! - Alignment of the target onto the performance time base
//! - Detrending of the pitch contour into a residual around the local median

pub mod alignment;
pub mod detrend;
