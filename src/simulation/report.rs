//! Batch results, printable as a whitespace-separated table or as JSON.

use std::fmt;

use serde::Serialize;

use crate::simulation::batch::BatchStats;
use crate::simulation::params::{ExperimentConfig, ModelParams};

/// Summary of one batch of trials at a fixed list length.
#[derive(Clone, Debug, Serialize)]
pub struct BatchReport {
    pub trials: usize,
    pub memoranda: usize,
    pub operations: usize,
    pub proportion_correct: f64,
    pub position_accuracy: Vec<f64>,
    pub params: ModelParams,
    /// Recalled string of every trial, in trial order.
    pub recalled: Vec<String>,
}

impl BatchReport {
    pub fn new(
        config: &ExperimentConfig,
        memoranda: usize,
        stats: &BatchStats,
        recalled: Vec<String>,
    ) -> Self {
        Self {
            trials: stats.trials(),
            memoranda,
            operations: config.operations,
            proportion_correct: stats.mean_proportion_correct(),
            position_accuracy: stats.position_accuracy(),
            params: config.params.clone(),
            recalled,
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.params;
        writeln!(
            f,
            "NBSimulations NbMemo NbOp ProportionCorrect P R s tauE L theta sigma D Tr \
             tauOp Ta freeTime ftIncludesOp refreshLastStopped attentionalFocusSize"
        )?;
        writeln!(
            f,
            "{} {} {} {:.3} {:.3} {:.3} {:.3} {:.3} {:.3} {:.3} {:.3} {:.3} {:.3} {:.3} {:.3} {:.3} {} {} {}",
            self.trials,
            self.memoranda,
            self.operations,
            self.proportion_correct,
            p.persistence,
            p.rate_mean,
            p.rate_std,
            p.tau_encoding,
            p.asymptote,
            p.theta,
            p.sigma,
            p.decay_rate,
            p.refresh_time,
            p.tau_operation,
            p.capture_time,
            p.free_time,
            u8::from(p.free_time_includes_operation),
            u8::from(p.refresh_last_stopped),
            p.attentional_focus_size,
        )?;
        let headings: Vec<String> = (1..=self.position_accuracy.len())
            .map(|i| format!("Pos{}", i))
            .collect();
        writeln!(f, "{}", headings.join(" "))?;
        let values: Vec<String> = self
            .position_accuracy
            .iter()
            .map(|a| format!("{:.4}", a))
            .collect();
        write!(f, "{}", values.join(" "))
    }
}

/// Batches over list lengths `1..=n` and their summed accuracy.
#[derive(Clone, Debug, Serialize)]
pub struct SpanReport {
    pub lists: Vec<BatchReport>,
    pub span: f64,
}

impl SpanReport {
    pub fn new(lists: Vec<BatchReport>) -> Self {
        let span = lists.iter().map(|l| l.proportion_correct).sum();
        Self { lists, span }
    }
}

impl fmt::Display for SpanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for list in &self.lists {
            writeln!(f, "{}", list)?;
        }
        write!(f, "Span {:.4}", self.span)
    }
}
