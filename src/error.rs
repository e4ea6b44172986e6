//! Error types for the simulator.
//!
//! Every variant is fatal for the batch that raised it: a misconfigured run or
//! a malformed stimulus aborts without partial results. A failed retrieval is
//! not an error and never shows up here.

use std::path::PathBuf;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Errors raised while configuring or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("cannot handle more than {max} operations between memoranda (got {got})")]
    TooManyOperations { got: usize, max: usize },

    #[error("cannot study more than {max} memoranda (got {got})")]
    TooManyMemoranda { got: usize, max: usize },

    #[error("number of distractors exceeds the {capacity} available slots")]
    DistractorCapacity { capacity: usize },

    #[error("unknown symbol {0:?} in stimulus")]
    UnknownSymbol(char),

    #[error("stimulus sequence has no recall marker")]
    MissingRecall,

    #[error("embedding table {path}: {reason}")]
    Embeddings { path: PathBuf, reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SimulationError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
