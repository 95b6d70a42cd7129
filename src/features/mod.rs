//! Performance metrics
//!
//! The three metric stages run on the aligned pair and are independent of one
//! another:
//! - Pitch accuracy against the target
//! - Pitch stability (smoothness of the performance alone)
//! - Vibrato rate, depth and coverage

pub mod accuracy;
pub mod stability;
pub mod vibrato;
