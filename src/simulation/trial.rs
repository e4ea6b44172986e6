//! One simulated trial: study, distractor processing, refreshing, recall.

use rand::Rng;
use serde::Serialize;

use crate::config::MAX_MEMORANDA;
use crate::error::{Result, SimulationError};
use crate::process::TrialContext;
use crate::random::RandomSource;
use crate::representation::embeddings::EmbeddingTable;
use crate::representation::item::ItemId;
use crate::simulation::params::ModelParams;
use crate::simulation::stimulus::{Stimulus, StimulusSequence};

/// Result of a single trial.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrialOutcome {
    /// One symbol per studied position.
    pub recalled: String,

    /// Whether position `i` was recalled as the `i`-th letter.
    pub correct: Vec<bool>,

    /// Simulated time at the end of recall.
    pub clock: f64,
}

impl TrialOutcome {
    fn score(recalled: String, clock: f64) -> Self {
        let correct = recalled
            .chars()
            .enumerate()
            .map(|(i, c)| c == ItemId(i).symbol())
            .collect();
        Self {
            recalled,
            correct,
            clock,
        }
    }

    /// Number of studied positions.
    pub fn studied(&self) -> usize {
        self.correct.len()
    }

    /// Fraction of positions recalled in their correct place.
    pub fn proportion_correct(&self) -> f64 {
        if self.correct.is_empty() {
            return 0.0;
        }
        let hits = self.correct.iter().filter(|&&c| c).count();
        hits as f64 / self.correct.len() as f64
    }
}

/// Run one trial of `sequence` with its own random stream.
pub fn run_trial<R: Rng>(
    params: &ModelParams,
    sequence: &StimulusSequence,
    preset: Option<&EmbeddingTable>,
    rng: RandomSource<R>,
) -> Result<TrialOutcome> {
    let mut ctx = TrialContext::new(params, rng, preset);
    let mut recalled = None;

    for &stimulus in sequence.events() {
        match stimulus {
            Stimulus::Memorandum(i) => {
                if i >= MAX_MEMORANDA {
                    return Err(SimulationError::TooManyMemoranda {
                        got: i + 1,
                        max: MAX_MEMORANDA,
                    });
                }
                let position = ctx.open_position();
                let d = ctx.encode_memorandum(ItemId::memorandum(i), position);
                ctx.refresh(params.presentation_time - d);
            }
            Stimulus::Operation(_) => {
                let ta = ctx.process()?;
                let time_left = if params.free_time_includes_operation {
                    params.free_time - ta
                } else {
                    params.free_time
                };
                ctx.refresh(time_left);
            }
            Stimulus::Recall => {
                recalled = Some(ctx.recall());
                break;
            }
        }
    }

    let recalled = recalled.ok_or(SimulationError::MissingRecall)?;
    tracing::debug!(recalled = %recalled, clock = ctx.clock, "trial finished");
    Ok(TrialOutcome::score(recalled, ctx.clock))
}
