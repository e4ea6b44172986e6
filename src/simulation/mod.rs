//! Running the model: parameters, stimulus lists, trials and batches.

pub mod batch;
pub mod params;
pub mod report;
pub mod stimulus;
pub mod trial;

pub use batch::{run_batch, run_span, BatchStats};
pub use params::{ExperimentConfig, ModelParams};
pub use report::{BatchReport, SpanReport};
pub use stimulus::{Stimulus, StimulusSequence};
pub use trial::{run_trial, TrialOutcome};
