//! Cognitive processes acting on a trial's state.
//!
//! Each process is a method on [`TrialContext`]: it consumes simulated time,
//! advances the clock and lets the associations decay.

pub mod context;
pub mod encoding;
pub mod processing;
pub mod recall;
pub mod refresh;

pub use context::TrialContext;
