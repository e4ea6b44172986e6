//! Per-trial simulation state.
//!
//! Everything a trial mutates lives here: the random stream, the position
//! layer, the item store, the association matrix and the simulated clock. A
//! trial owns its context exclusively, so independent trials can run on
//! separate threads.

use rand::rngs::StdRng;
use rand::Rng;

use crate::memory::association::AssociationMatrix;
use crate::random::RandomSource;
use crate::representation::embeddings::EmbeddingTable;
use crate::representation::item::ItemId;
use crate::representation::position::PositionLayer;
use crate::representation::store::ItemStore;
use crate::simulation::params::ModelParams;

/// Mutable state of one trial over read-only parameters.
pub struct TrialContext<'p, R: Rng = StdRng> {
    pub params: &'p ModelParams,
    pub rng: RandomSource<R>,
    pub positions: PositionLayer,
    pub items: ItemStore,
    pub associations: AssociationMatrix,

    /// Simulated time elapsed since the start of the trial.
    pub clock: f64,

    /// Memoranda studied so far; positions `0..last_position` are in use.
    pub last_position: usize,

    /// Next position the refresh scheduler visits.
    pub(crate) refresh_cursor: usize,

    /// Duration of the latest recall-mode retrieval, reported again by
    /// refresh-mode retrievals.
    pub(crate) last_retrieval_duration: f64,

    /// Learning rate of the latest encoding. Distractors are bound at a
    /// weighted fraction of it, and the weighted value carries over.
    pub(crate) last_eta: f64,
}

impl<'p, R: Rng> TrialContext<'p, R> {
    /// Fresh trial: generate position vectors, then memorandum LTM vectors.
    pub fn new(
        params: &'p ModelParams,
        mut rng: RandomSource<R>,
        preset: Option<&EmbeddingTable>,
    ) -> Self {
        let positions = PositionLayer::generate(params.persistence, &mut rng);
        let items = ItemStore::generate(preset, &mut rng);
        Self::from_parts(params, rng, positions, items)
    }

    /// Trial over given representations.
    pub fn from_parts(
        params: &'p ModelParams,
        rng: RandomSource<R>,
        positions: PositionLayer,
        items: ItemStore,
    ) -> Self {
        Self {
            params,
            rng,
            positions,
            items,
            associations: AssociationMatrix::new(params.asymptote),
            clock: 0.0,
            last_position: 0,
            refresh_cursor: 0,
            last_retrieval_duration: 0.0,
            last_eta: 0.0,
        }
    }

    pub fn advance_clock(&mut self, dt: f64) {
        self.clock += dt;
    }

    /// Decay every association over `dt`, except those of `excluded`.
    pub fn decay(&mut self, dt: f64, excluded: Option<ItemId>) {
        let factor = self.params.decay_factor(dt);
        self.associations.decay(factor, excluded);
    }

    /// Draw a memory processing rate `r ~ Normal(R, s)`, floored.
    pub(crate) fn draw_rate(&mut self) -> f64 {
        self.rng.rate(self.params.rate_mean, self.params.rate_std)
    }

    /// Open the next serial position and return its index.
    pub fn open_position(&mut self) -> usize {
        self.last_position += 1;
        self.last_position - 1
    }

    /// Index of the most recently opened position.
    pub fn current_position(&self) -> Option<usize> {
        self.last_position.checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAX_MEMORANDA, MAX_POSITION};

    #[test]
    fn test_new_context_is_blank() {
        let params = ModelParams::default();
        let ctx = TrialContext::new(&params, RandomSource::seeded(1), None);
        assert_eq!(ctx.positions.len(), MAX_POSITION);
        assert_eq!(ctx.items.live_count(), MAX_MEMORANDA);
        assert_eq!(ctx.associations.total_strength(), 0.0);
        assert_eq!(ctx.clock, 0.0);
        assert_eq!(ctx.current_position(), None);
    }

    #[test]
    fn test_open_position_counts_up() {
        let params = ModelParams::default();
        let mut ctx = TrialContext::new(&params, RandomSource::seeded(2), None);
        assert_eq!(ctx.open_position(), 0);
        assert_eq!(ctx.open_position(), 1);
        assert_eq!(ctx.last_position, 2);
        assert_eq!(ctx.current_position(), Some(1));
    }
}
