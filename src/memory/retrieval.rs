//! Cued retrieval.
//!
//! Retrieval runs in two stages. The position cue activates every live item
//! through its associations (plus Gaussian noise) and the most active WM item
//! wins. That WM vector, possibly distorted by interference, is then matched
//! against the stable LTM vectors and the closest one is what gets retrieved.

use rand::Rng;

use crate::config::MIN_NOISE_SIGMA;
use crate::process::context::TrialContext;
use crate::representation::item::ItemId;

/// What the retrieval is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetrievalMode {
    /// Serial recall: draws its own retrieval duration.
    Recall,
    /// Refreshing: duration is accounted for by reencoding.
    Refresh,
}

/// Outcome of one retrieval.
#[derive(Clone, Debug, PartialEq)]
pub struct Retrieval {
    /// Closest LTM item, or `None` when the best activation is below `θ`.
    pub item: Option<ItemId>,

    /// Most active WM item.
    pub best_wm_item: ItemId,

    /// Activation of `best_wm_item`, noise included.
    pub activation_max: f64,

    /// RMSE between the best WM vector and the retrieved LTM vector.
    pub rmse: Option<f64>,

    /// Retrieval duration (recall mode), or the last one drawn (refresh mode).
    pub duration: f64,
}

impl<'p, R: Rng> TrialContext<'p, R> {
    /// Retrieve the item cued by `position`.
    ///
    /// Ties go to the lowest index in both the activation and the RMSE search.
    pub fn retrieve(&mut self, position: usize, mode: RetrievalMode) -> Retrieval {
        if mode == RetrievalMode::Recall {
            let r = self.draw_rate();
            self.last_retrieval_duration =
                (self.params.log_tau_encoding() / r).min(self.params.presentation_time);
        }

        let sigma = self.params.sigma.max(MIN_NOISE_SIGMA);
        let cue = self.positions.get(position);
        let mut best_wm_item = ItemId(0);
        let mut activation_max = f64::NEG_INFINITY;
        let mut activations = Vec::with_capacity(self.items.live_count());
        for item in self.items.live_items() {
            let a = self.associations.activation(item, cue) + self.rng.normal(0.0, sigma);
            if a > activation_max {
                activation_max = a;
                best_wm_item = item;
            }
            activations.push(a);
        }

        tracing::trace!(
            clock = self.clock,
            position,
            best = %best_wm_item,
            "activations: {}",
            activations
                .iter()
                .enumerate()
                .map(|(i, a)| format!("{}:{:.3}", ItemId(i), a))
                .collect::<Vec<_>>()
                .join(" ")
        );

        if activation_max < self.params.theta {
            tracing::debug!(
                position,
                activation_max,
                "no item above the retrieval threshold"
            );
            return Retrieval {
                item: None,
                best_wm_item,
                activation_max,
                rmse: None,
                duration: self.last_retrieval_duration,
            };
        }

        let (item, rmse) = self.items.closest_ltm(best_wm_item);
        tracing::debug!(
            position,
            retrieved = %item,
            best_wm = %best_wm_item,
            activation_max,
            rmse,
            "closest LTM item to the best WM item"
        );

        Retrieval {
            item: Some(item),
            best_wm_item,
            activation_max,
            rmse: Some(rmse),
            duration: self.last_retrieval_duration,
        }
    }
}
