//! Encoding: binding an item to a serial position.
//!
//! Three flavours share the same tail (advance the clock, decay, strengthen):
//! initial encoding of a memorandum, reencoding during refreshing, and
//! encoding of the distractor produced by a processing step.

use rand::Rng;

use crate::config::{DISTRACTOR_ENCODING_WEIGHT, N_ITEM_UNITS, REFRESH_RESTORE_WEIGHT};
use crate::error::Result;
use crate::memory::retrieval::RetrievalMode;
use crate::process::context::TrialContext;
use crate::representation::item::{ItemId, ItemVector};
use crate::representation::pattern::overlapping_pattern;

/// Proportion of the asymptote reached after attending for `duration` at rate `r`.
fn learning_rate(r: f64, duration: f64) -> f64 {
    1.0 - (-r * duration).exp()
}

impl<'p, R: Rng> TrialContext<'p, R> {
    /// Study a memorandum at `position` and return the encoding duration.
    ///
    /// The WM copy is reset from LTM, every other item decays over the
    /// encoding time and the item's links move toward the asymptote.
    pub fn encode_memorandum(&mut self, item: ItemId, position: usize) -> f64 {
        self.items.load_into_wm(item);
        let r = self.draw_rate();
        let duration = (self.params.log_tau_encoding() / r).min(self.params.presentation_time);
        let eta = learning_rate(r, duration);
        self.last_eta = eta;

        self.advance_clock(duration);
        self.decay(duration, Some(item));
        let cue = self.positions.get(position);
        self.associations.strengthen(item, cue, eta);

        tracing::debug!(
            clock = self.clock,
            item = %item,
            position,
            duration,
            eta,
            "encoded memorandum"
        );
        duration
    }

    /// Reencode the item retrieved at `position` during refreshing.
    ///
    /// Without `shared_duration` the refresh time is drawn and clamped to
    /// `time_budget` and everything but `item` decays. With it, the caller
    /// has already applied the decay. The clock advances either way. The
    /// learning rate is divided by `strength_divisor` when a focus window
    /// refreshes several positions at once.
    ///
    /// When retrieval failed (`item` is `None`) nothing is strengthened but
    /// the time is still spent.
    pub fn reencode(
        &mut self,
        item: Option<ItemId>,
        best_wm_item: ItemId,
        position: usize,
        time_budget: f64,
        strength_divisor: usize,
        shared_duration: Option<f64>,
    ) -> f64 {
        let r = self.draw_rate();
        let duration = match shared_duration {
            Some(d) => {
                self.advance_clock(d);
                d
            }
            None => {
                let d = (self.params.log_tau_refresh() / r).min(time_budget.max(0.0));
                self.advance_clock(d);
                self.decay(d, item);
                d
            }
        };
        let eta = learning_rate(r, duration) / strength_divisor.max(1) as f64;
        self.last_eta = eta;

        if let Some(item) = item {
            let cue = self.positions.get(position);
            self.associations.strengthen(item, cue, eta);
            self.items
                .restore_toward_ltm(best_wm_item, item, REFRESH_RESTORE_WEIGHT);
            tracing::trace!(
                clock = self.clock,
                item = %item,
                best_wm = %best_wm_item,
                position,
                duration,
                eta,
                "refreshed"
            );
        }
        duration
    }

    /// Create the distractor of one processing step and bind it to `position`.
    ///
    /// The distractor's LTM pattern overlaps the item currently retrieved at
    /// `position`, and that item's WM copy is pulled toward the distractor.
    /// With no studied position yet the distractor is still created but left
    /// unbound.
    ///
    /// The binding strength is not drawn from `duration`: it is the learning
    /// rate of the latest encoding scaled by [`DISTRACTOR_ENCODING_WEIGHT`],
    /// and the scaled value becomes the latest rate. A run of operations
    /// therefore binds each distractor more weakly than the one before.
    pub fn encode_distractor(&mut self, position: Option<usize>, duration: f64) -> Result<ItemId> {
        // A rate is drawn for every encoding, distractors included.
        let _ = self.draw_rate();
        let eta = self.last_eta * DISTRACTOR_ENCODING_WEIGHT;
        self.last_eta = eta;

        let retrieved = position.and_then(|p| self.retrieve(p, RetrievalMode::Refresh).item);
        let (distractor, fresh) = self.items.next_distractor(self.params.same_distractors)?;

        if fresh {
            let reference = match retrieved {
                Some(item) => self.items.wm(item).clone(),
                None => ItemVector::unspecified(N_ITEM_UNITS),
            };
            let pattern = overlapping_pattern(
                &reference,
                self.params.item_distractor_overlap,
                self.params.item_distractor_noise,
                &mut self.rng,
            );
            self.items.set_ltm(distractor, pattern);
        }
        self.items.load_into_wm(distractor);

        if let Some(item) = retrieved {
            self.items
                .interfere_with_wm(item, distractor, DISTRACTOR_ENCODING_WEIGHT);
        }
        if let Some(p) = position {
            let cue = self.positions.get(p);
            self.associations.strengthen(distractor, cue, eta);
        }

        tracing::debug!(
            clock = self.clock,
            distractor = %distractor,
            fresh,
            retrieved = ?retrieved.map(|i| i.to_string()),
            duration,
            eta,
            "encoded distractor"
        );
        Ok(distractor)
    }
}
