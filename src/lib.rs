//! # TBRS*
//!
//! A simulator of the **Time-Based Resource-Sharing** model of working memory
//! (TBRS*, Oberauer & Lewandowsky 2010) with distributed item representations.
//!
//! A trial presents an ordered list of memoranda, each followed by a burst of
//! distractor operations, and ends with serial recall. Between events the
//! simulated subject refreshes what it can within the free time left over.
//!
//! ## Moving parts
//!
//! 1. **Representations**: block-coded binary position vectors with temporal
//!    persistence, continuous item vectors with unspecified dimensions.
//! 2. **Associations**: an item × position-unit weight matrix that decays
//!    exponentially with simulated time.
//! 3. **Processes**: encoding, refreshing, distractor processing and recall,
//!    each consuming a stochastic duration.
//! 4. **Simulation**: stimulus sequencing, trial orchestration and batch
//!    statistics (proportion correct overall and per serial position).

pub mod error;
pub mod memory;
pub mod process;
pub mod random;
pub mod representation;
pub mod simulation;

pub use error::{Result, SimulationError};

/// Model geometry and fixed constants.
pub mod config {
    /// Number of unit blocks in the position layer.
    pub const N_UNIT_BLOCKS: usize = 9;

    /// Units per position block (exactly one is active).
    pub const POSITION_BLOCK_SIZE: usize = 6;

    /// Units in the position layer.
    pub const N_POSITION_UNITS: usize = N_UNIT_BLOCKS * POSITION_BLOCK_SIZE; // 54

    /// Number of position vectors generated per trial.
    pub const MAX_POSITION: usize = 100;

    /// Memorandum slots, created before the trial starts.
    pub const MAX_MEMORANDA: usize = 10;

    /// Distractor slots, instantiated on the fly.
    pub const MAX_DISTRACTORS: usize = 90;

    /// Total item slots.
    pub const MAX_ITEM: usize = MAX_MEMORANDA + MAX_DISTRACTORS;

    /// Dimensions of an item vector.
    pub const N_ITEM_UNITS: usize = 100;

    /// Distractors are encoded at this fraction of the item encoding strength,
    /// and pull the retrieved item toward them by the same proportion.
    pub const DISTRACTOR_ENCODING_WEIGHT: f64 = 0.5;

    /// Proportion by which a refreshed WM vector moves back to its LTM form.
    pub const REFRESH_RESTORE_WEIGHT: f64 = 0.5;

    /// Floor applied to every sampled processing rate.
    pub const MIN_RATE: f64 = 0.1;

    /// Floor applied to the retrieval noise standard deviation.
    pub const MIN_NOISE_SIGMA: f64 = 1e-4;

    /// Upper bound on a single recall retrieval duration.
    pub const MAX_RECALL_DURATION: f64 = 5.0;

    /// Longest burst of operations a stimulus sequence may hold.
    pub const MAX_OPERATIONS: usize = 16;

    /// Symbol emitted when nothing is retrieved at a position.
    pub const NO_ANSWER: char = '.';

    /// Symbol emitted for a retrieved item with no letter name.
    pub const WILDCARD: char = '*';

    /// Symbol closing a stimulus sequence.
    pub const RECALL_MARKER: char = '#';
}
