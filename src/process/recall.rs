//! Forward serial recall with response suppression.

use rand::Rng;

use crate::config::{MAX_RECALL_DURATION, NO_ANSWER, N_POSITION_UNITS};
use crate::memory::retrieval::RetrievalMode;
use crate::process::context::TrialContext;

impl<'p, R: Rng> TrialContext<'p, R> {
    /// Recall every studied position in order.
    ///
    /// Returns one symbol per position: the letter of the retrieved item, or
    /// [`NO_ANSWER`] when the best activation does not exceed `θ`. A recalled
    /// item's links are suppressed in proportion to its activation so it is
    /// less likely to be given again.
    pub fn recall(&mut self) -> String {
        let mut answer = String::with_capacity(self.last_position);
        for position in 0..self.last_position {
            let retrieval = self.retrieve(position, RetrievalMode::Recall);
            let duration = retrieval.duration.min(MAX_RECALL_DURATION);
            self.decay(duration, None);

            let symbol = match retrieval.item {
                Some(item) if retrieval.activation_max > self.params.theta => {
                    let best = retrieval.best_wm_item;
                    let amount = self.associations.asymptote() * retrieval.activation_max;
                    let wm = self.items.wm(best);
                    self.associations.suppress(best, amount, |unit| {
                        unit < N_POSITION_UNITS && wm.get(unit).numeric() != 0.0
                    });
                    item.symbol()
                }
                _ => NO_ANSWER,
            };

            self.advance_clock(duration);
            tracing::debug!(
                clock = self.clock,
                position,
                symbol = %symbol,
                activation = retrieval.activation_max,
                "recalled"
            );
            answer.push(symbol);
        }
        answer
    }
}
