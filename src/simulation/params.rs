//! Model parameters and experiment configuration.
//!
//! Defaults are the published TBRS* values. Both structs deserialize from TOML
//! with missing fields falling back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{MAX_DISTRACTORS, MAX_MEMORANDA, MAX_OPERATIONS};
use crate::error::{Result, SimulationError};

/// Tunable scalars of the model, read-only during a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    /// `P`: probability that a position block carries over to the next position.
    pub persistence: f64,

    /// `R`: mean memory processing rate (encoding, refreshing, recall).
    pub rate_mean: f64,

    /// `s`: standard deviation of processing rates.
    pub rate_std: f64,

    /// `τE`: encoding-strength criterion.
    pub tau_encoding: f64,

    /// `L`: asymptotic association strength.
    pub asymptote: f64,

    /// `θ`: retrieval threshold.
    pub theta: f64,

    /// `σ`: retrieval noise standard deviation.
    pub sigma: f64,

    /// `D`: decay rate.
    pub decay_rate: f64,

    /// `Tr`: mean time to refresh an item.
    pub refresh_time: f64,

    /// `τOp`: response criterion for processing.
    pub tau_operation: f64,

    /// `Ta`: mean duration of attentional capture by a processing step.
    pub capture_time: f64,

    /// Free time following each processing step.
    pub free_time: f64,

    /// Whether the operation duration is taken out of the free time.
    pub free_time_includes_operation: bool,

    /// Resume refreshing where the previous refresh stopped instead of at the
    /// first position.
    pub refresh_last_stopped: bool,

    /// Positions refreshed together in one attentional step.
    pub attentional_focus_size: usize,

    /// Presentation time of a memorandum.
    pub presentation_time: f64,

    /// Fraction of a distractor's characterised span shared with the item it
    /// interferes with.
    pub item_distractor_overlap: f64,

    /// Noise used when copying item features into a distractor.
    pub item_distractor_noise: f64,

    /// All operations of a trial use the same distractor.
    pub same_distractors: bool,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            persistence: 0.3,
            rate_mean: 6.0,
            rate_std: 1.0,
            tau_encoding: 0.95,
            asymptote: 1.0 / 9.0,
            theta: 0.05,
            sigma: 0.02,
            decay_rate: 0.5,
            refresh_time: 0.08,
            tau_operation: 0.95,
            capture_time: 0.5,
            free_time: 1.0,
            free_time_includes_operation: true,
            refresh_last_stopped: false,
            attentional_focus_size: 1,
            presentation_time: 1.5,
            item_distractor_overlap: 0.4,
            item_distractor_noise: 1.0,
            same_distractors: false,
        }
    }
}

fn check_unit_interval(name: &'static str, v: f64) -> Result<()> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(SimulationError::invalid(name, format!("{} is outside [0, 1]", v)))
    }
}

fn check_criterion(name: &'static str, v: f64) -> Result<()> {
    if (0.0..1.0).contains(&v) {
        Ok(())
    } else {
        Err(SimulationError::invalid(name, format!("{} is outside [0, 1)", v)))
    }
}

fn check_non_negative(name: &'static str, v: f64) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::invalid(name, format!("{} must be finite and >= 0", v)))
    }
}

fn check_positive(name: &'static str, v: f64) -> Result<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::invalid(name, format!("{} must be finite and > 0", v)))
    }
}

impl ModelParams {
    /// Reject values the model cannot run with.
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("item_distractor_overlap", self.item_distractor_overlap)?;
        check_unit_interval("persistence", self.persistence)?;
        check_criterion("tau_encoding", self.tau_encoding)?;
        check_criterion("tau_operation", self.tau_operation)?;
        check_positive("rate_mean", self.rate_mean)?;
        check_positive("capture_time", self.capture_time)?;
        check_positive("presentation_time", self.presentation_time)?;
        check_non_negative("rate_std", self.rate_std)?;
        check_non_negative("sigma", self.sigma)?;
        check_non_negative("decay_rate", self.decay_rate)?;
        check_non_negative("refresh_time", self.refresh_time)?;
        check_non_negative("free_time", self.free_time)?;
        check_non_negative("item_distractor_noise", self.item_distractor_noise)?;
        if !self.asymptote.is_finite() {
            return Err(SimulationError::invalid("asymptote", "must be finite"));
        }
        if !self.theta.is_finite() {
            return Err(SimulationError::invalid("theta", "must be finite"));
        }
        if self.attentional_focus_size == 0 {
            return Err(SimulationError::invalid(
                "attentional_focus_size",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// `−ln(1 − τE)`: numerator of encoding and recall durations.
    pub fn log_tau_encoding(&self) -> f64 {
        -(1.0 - self.tau_encoding).ln()
    }

    /// `τR = 1 − exp(−R·Tr)`: refresh criterion implied by the mean refresh time.
    pub fn tau_refresh(&self) -> f64 {
        1.0 - (-self.rate_mean * self.refresh_time).exp()
    }

    /// `−ln(1 − τR)`: numerator of refresh durations.
    pub fn log_tau_refresh(&self) -> f64 {
        -(1.0 - self.tau_refresh()).ln()
    }

    /// `−ln(1 − τOp)`: numerator of processing durations.
    pub fn log_tau_operation(&self) -> f64 {
        -(1.0 - self.tau_operation).ln()
    }

    /// `Rop = −ln(1 − τOp) / Ta`: mean processing rate.
    pub fn operation_rate_mean(&self) -> f64 {
        self.log_tau_operation() / self.capture_time
    }

    /// Association decay factor over `dt` time units.
    pub fn decay_factor(&self, dt: f64) -> f64 {
        (-self.decay_rate * dt).exp()
    }
}

/// A batch of trials: model parameters plus the list design.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub params: ModelParams,

    /// Memoranda per list.
    pub memoranda: usize,

    /// Operations after each memorandum.
    pub operations: usize,

    /// Simulated trials per list length.
    pub trials: usize,

    /// Master seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Run trials on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            params: ModelParams::default(),
            memoranda: 7,
            operations: 4,
            trials: 500,
            seed: None,
            parallel: false,
        }
    }
}

impl ExperimentConfig {
    /// Load from a TOML file.
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        if self.operations > MAX_OPERATIONS {
            return Err(SimulationError::TooManyOperations {
                got: self.operations,
                max: MAX_OPERATIONS,
            });
        }
        if self.memoranda > MAX_MEMORANDA {
            return Err(SimulationError::TooManyMemoranda {
                got: self.memoranda,
                max: MAX_MEMORANDA,
            });
        }
        if self.memoranda == 0 {
            return Err(SimulationError::invalid("memoranda", "must be at least 1"));
        }
        // One fresh distractor per operation unless they are all the same.
        if !self.params.same_distractors && self.memoranda * self.operations > MAX_DISTRACTORS {
            return Err(SimulationError::DistractorCapacity {
                capacity: MAX_DISTRACTORS,
            });
        }
        if self.trials == 0 {
            return Err(SimulationError::invalid("trials", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        ExperimentConfig::default().validate().unwrap();
    }

    #[test]
    fn test_derived_quantities() {
        let p = ModelParams::default();
        assert!((p.log_tau_encoding() - 20f64.ln()).abs() < 1e-12);
        // −ln(1 − τR) collapses back to R·Tr.
        assert!((p.log_tau_refresh() - 6.0 * 0.08).abs() < 1e-12);
        assert!((p.operation_rate_mean() - 20f64.ln() / 0.5).abs() < 1e-12);
        assert!((p.decay_factor(2.0) - (-1.0f64).exp()).abs() < 1e-12);
        assert_eq!(p.decay_factor(0.0), 1.0);
    }

    #[test]
    fn test_overlap_out_of_range_rejected() {
        let mut p = ModelParams::default();
        p.item_distractor_overlap = 1.5;
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("item_distractor_overlap"), "{}", err);
    }

    #[test]
    fn test_operation_limit() {
        let cfg = ExperimentConfig {
            operations: 17,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimulationError::TooManyOperations { got: 17, max: 16 })
        ));
    }

    #[test]
    fn test_memoranda_limit() {
        let cfg = ExperimentConfig {
            memoranda: 11,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(SimulationError::TooManyMemoranda { .. })));
    }

    #[test]
    fn test_distractor_capacity_checked_up_front() {
        let cfg = ExperimentConfig {
            memoranda: 10,
            operations: 16,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimulationError::DistractorCapacity { capacity: 90 })
        ));

        let exact = ExperimentConfig {
            memoranda: 9,
            operations: 10,
            ..Default::default()
        };
        exact.validate().unwrap();

        let mut same = cfg.clone();
        same.params.same_distractors = true;
        same.validate().unwrap();
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let cfg: ExperimentConfig = toml::from_str(
            r#"
            memoranda = 5
            seed = 9

            [params]
            decay_rate = 1.25
            same_distractors = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.memoranda, 5);
        assert_eq!(cfg.operations, 4);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.params.decay_rate, 1.25);
        assert!(cfg.params.same_distractors);
        assert_eq!(cfg.params.rate_mean, 6.0);
    }
}
