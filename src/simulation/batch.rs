//! Batches of independent trials and span sweeps.
//!
//! A batch runs the same list design many times. Each trial gets its own
//! generator seeded from a master stream before anything runs, so the
//! results of a seeded batch are the same whether trials run sequentially or
//! on the rayon pool.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::error::Result;
use crate::random::RandomSource;
use crate::representation::embeddings::EmbeddingTable;
use crate::simulation::params::ExperimentConfig;
use crate::simulation::report::{BatchReport, SpanReport};
use crate::simulation::stimulus::StimulusSequence;
use crate::simulation::trial::{run_trial, TrialOutcome};

// ──────────────────────────────────────────────────────────────
// Statistics
// ──────────────────────────────────────────────────────────────

/// Running totals over the trials of a batch.
#[derive(Clone, Debug, Default)]
pub struct BatchStats {
    trials: usize,
    proportion_sum: f64,
    position_hits: Vec<usize>,
}

impl BatchStats {
    pub fn new(positions: usize) -> Self {
        Self {
            trials: 0,
            proportion_sum: 0.0,
            position_hits: vec![0; positions],
        }
    }

    pub fn record(&mut self, outcome: &TrialOutcome) {
        self.trials += 1;
        self.proportion_sum += outcome.proportion_correct();
        if self.position_hits.len() < outcome.correct.len() {
            self.position_hits.resize(outcome.correct.len(), 0);
        }
        for (hits, &ok) in self.position_hits.iter_mut().zip(&outcome.correct) {
            if ok {
                *hits += 1;
            }
        }
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Mean proportion of positions recalled correctly.
    pub fn mean_proportion_correct(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.proportion_sum / self.trials as f64
    }

    /// Accuracy at each serial position.
    pub fn position_accuracy(&self) -> Vec<f64> {
        if self.trials == 0 {
            return vec![0.0; self.position_hits.len()];
        }
        let n = self.trials as f64;
        self.position_hits.iter().map(|&h| h as f64 / n).collect()
    }
}

// ──────────────────────────────────────────────────────────────
// Runners
// ──────────────────────────────────────────────────────────────

/// Run `config.trials` trials of the standard sequence for `config.memoranda`.
pub fn run_batch(config: &ExperimentConfig, preset: Option<&EmbeddingTable>) -> Result<BatchReport> {
    config.validate()?;
    let mut master = match config.seed {
        Some(seed) => RandomSource::seeded(seed),
        None => RandomSource::from_entropy(),
    };
    run_list(config, config.memoranda, preset, &mut master)
}

/// Run a batch for every list length `1..=config.memoranda` and sum the
/// proportions correct into a span estimate.
pub fn run_span(config: &ExperimentConfig, preset: Option<&EmbeddingTable>) -> Result<SpanReport> {
    config.validate()?;
    let mut master = match config.seed {
        Some(seed) => RandomSource::seeded(seed),
        None => RandomSource::from_entropy(),
    };
    let mut lists = Vec::with_capacity(config.memoranda);
    for length in 1..=config.memoranda {
        lists.push(run_list(config, length, preset, &mut master)?);
    }
    Ok(SpanReport::new(lists))
}

fn run_list(
    config: &ExperimentConfig,
    memoranda: usize,
    preset: Option<&EmbeddingTable>,
    master: &mut RandomSource,
) -> Result<BatchReport> {
    let sequence = StimulusSequence::standard(memoranda, config.operations)?;
    let seeds: Vec<u64> = (0..config.trials).map(|_| master.next_seed()).collect();
    tracing::info!(
        memoranda,
        operations = config.operations,
        trials = config.trials,
        parallel = config.parallel,
        "running {}",
        sequence
    );

    let trial = |seed: u64| {
        let rng = RandomSource::new(StdRng::seed_from_u64(seed));
        run_trial(&config.params, &sequence, preset, rng)
    };
    let outcomes: Vec<TrialOutcome> = if config.parallel {
        seeds.into_par_iter().map(trial).collect::<Result<_>>()?
    } else {
        seeds.into_iter().map(trial).collect::<Result<_>>()?
    };

    let mut stats = BatchStats::new(memoranda);
    for (n, outcome) in outcomes.iter().enumerate() {
        tracing::debug!(trial = n + 1, recalled = %outcome.recalled, "trial");
        stats.record(outcome);
    }

    Ok(BatchReport::new(
        config,
        memoranda,
        &stats,
        outcomes.into_iter().map(|o| o.recalled).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::params::ModelParams;

    fn config(params: ModelParams, memoranda: usize, operations: usize, trials: usize) -> ExperimentConfig {
        ExperimentConfig {
            params,
            memoranda,
            operations,
            trials,
            seed: Some(42),
            parallel: false,
        }
    }

    #[test]
    fn test_stats_accumulate() {
        let mut stats = BatchStats::new(3);
        stats.record(&TrialOutcome {
            recalled: "ABC".into(),
            correct: vec![true, true, true],
            clock: 1.0,
        });
        stats.record(&TrialOutcome {
            recalled: "A.B".into(),
            correct: vec![true, false, false],
            clock: 1.0,
        });
        assert_eq!(stats.trials(), 2);
        assert!((stats.mean_proportion_correct() - (1.0 + 1.0 / 3.0) / 2.0).abs() < 1e-12);
        assert_eq!(stats.position_accuracy(), vec![1.0, 0.5, 0.5]);
    }

    #[test]
    fn test_no_noise_no_decay_batch_is_perfect() {
        let params = ModelParams {
            sigma: 0.0,
            decay_rate: 0.0,
            ..Default::default()
        };
        let report = run_batch(&config(params, 4, 0, 20), None).unwrap();
        assert!(report.proportion_correct > 0.95, "{}", report.proportion_correct);
    }

    #[test]
    fn test_position_accuracy_bounded() {
        let report = run_batch(&config(ModelParams::default(), 6, 4, 40), None).unwrap();
        assert_eq!(report.position_accuracy.len(), 6);
        for &acc in &report.position_accuracy {
            assert!((0.0..=1.0).contains(&acc));
        }
        let mean: f64 = report.position_accuracy.iter().sum::<f64>() / 6.0;
        assert!((mean - report.proportion_correct).abs() < 1e-9);
    }

    #[test]
    fn test_faster_decay_lowers_accuracy() {
        let slow = ModelParams {
            decay_rate: 0.1,
            ..Default::default()
        };
        let fast = ModelParams {
            decay_rate: 3.0,
            ..Default::default()
        };
        let slow = run_batch(&config(slow, 7, 4, 100), None).unwrap();
        let fast = run_batch(&config(fast, 7, 4, 100), None).unwrap();
        assert!(
            slow.proportion_correct > fast.proportion_correct,
            "D=0.1: {}, D=3: {}",
            slow.proportion_correct,
            fast.proportion_correct
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = config(ModelParams::default(), 5, 2, 24);
        let parallel = ExperimentConfig {
            parallel: true,
            ..sequential.clone()
        };
        let a = run_batch(&sequential, None).unwrap();
        let b = run_batch(&parallel, None).unwrap();
        assert_eq!(a.recalled, b.recalled);
        assert_eq!(a.proportion_correct, b.proportion_correct);
    }

    #[test]
    fn test_span_sums_list_lengths() {
        let report = run_span(&config(ModelParams::default(), 3, 1, 10), None).unwrap();
        assert_eq!(report.lists.len(), 3);
        let sum: f64 = report.lists.iter().map(|l| l.proportion_correct).sum();
        assert!((report.span - sum).abs() < 1e-12);
        assert_eq!(report.lists[2].memoranda, 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = config(ModelParams::default(), 3, 17, 10);
        assert!(run_batch(&cfg, None).is_err());
    }
}
