//! Item store: LTM and WM vectors for every item slot of a trial.

use rand::Rng;

use crate::config::{MAX_DISTRACTORS, MAX_ITEM, MAX_MEMORANDA, N_ITEM_UNITS};
use crate::error::{Result, SimulationError};
use crate::random::RandomSource;
use crate::representation::embeddings::EmbeddingTable;
use crate::representation::item::{ItemId, ItemVector};
use crate::representation::pattern::random_pattern;

/// Two representations per item: a stable LTM vector and a mutable WM copy.
///
/// Memoranda are created up front. Distractor slots start unspecified and are
/// handed out one at a time; only memoranda and handed-out distractors are
/// live for retrieval.
#[derive(Clone, Debug)]
pub struct ItemStore {
    ltm: Vec<ItemVector>,
    wm: Vec<ItemVector>,
    distractors: usize,
}

impl ItemStore {
    /// Create the store with memorandum LTM vectors drawn at random, or copied
    /// from `preset` when given.
    pub fn generate<R: Rng>(preset: Option<&EmbeddingTable>, rng: &mut RandomSource<R>) -> Self {
        let mut ltm = Vec::with_capacity(MAX_ITEM);
        for n in 0..MAX_MEMORANDA {
            let vector = match preset.and_then(|table| table.row(n)) {
                Some(row) => row.clone(),
                None => random_pattern(N_ITEM_UNITS, rng),
            };
            ltm.push(vector);
        }
        ltm.resize(MAX_ITEM, ItemVector::unspecified(N_ITEM_UNITS));

        Self {
            ltm,
            wm: vec![ItemVector::unspecified(N_ITEM_UNITS); MAX_ITEM],
            distractors: 0,
        }
    }

    /// Create the store from explicit memorandum vectors (missing slots stay
    /// unspecified).
    pub fn from_memoranda(memoranda: Vec<ItemVector>) -> Self {
        let mut ltm = memoranda;
        ltm.truncate(MAX_MEMORANDA);
        ltm.resize(MAX_ITEM, ItemVector::unspecified(N_ITEM_UNITS));
        Self {
            ltm,
            wm: vec![ItemVector::unspecified(N_ITEM_UNITS); MAX_ITEM],
            distractors: 0,
        }
    }

    /// Number of items taking part in retrieval.
    pub fn live_count(&self) -> usize {
        MAX_MEMORANDA + self.distractors
    }

    pub fn live_items(&self) -> impl Iterator<Item = ItemId> {
        (0..self.live_count()).map(ItemId)
    }

    /// Distractors instantiated so far.
    pub fn distractor_count(&self) -> usize {
        self.distractors
    }

    /// Slot for the next distractor.
    ///
    /// With `same` set, every operation reuses the first distractor; the flag
    /// in the result tells whether the slot is new and needs a pattern.
    pub fn next_distractor(&mut self, same: bool) -> Result<(ItemId, bool)> {
        if same && self.distractors > 0 {
            return Ok((ItemId::distractor(0), false));
        }
        if self.distractors >= MAX_DISTRACTORS {
            return Err(SimulationError::DistractorCapacity {
                capacity: MAX_DISTRACTORS,
            });
        }
        let id = ItemId::distractor(self.distractors);
        self.distractors += 1;
        Ok((id, true))
    }

    pub fn ltm(&self, id: ItemId) -> &ItemVector {
        &self.ltm[id.index()]
    }

    pub fn wm(&self, id: ItemId) -> &ItemVector {
        &self.wm[id.index()]
    }

    pub fn set_ltm(&mut self, id: ItemId, vector: ItemVector) {
        self.ltm[id.index()] = vector;
    }

    /// Reset the WM vector of `id` to its LTM form.
    pub fn load_into_wm(&mut self, id: ItemId) {
        let i = id.index();
        self.wm[i] = self.ltm[i].clone();
    }

    /// Move the WM vector of `target` toward the WM vector of `source`.
    pub fn interfere_with_wm(&mut self, target: ItemId, source: ItemId, proportion: f64) {
        if target == source {
            return;
        }
        let source = self.wm[source.index()].clone();
        self.wm[target.index()].interfere(&source, proportion);
    }

    /// Move the WM vector of `target` toward the LTM vector of `source`.
    pub fn restore_toward_ltm(&mut self, target: ItemId, source: ItemId, proportion: f64) {
        let (wm, ltm) = (&mut self.wm, &self.ltm);
        wm[target.index()].interfere(&ltm[source.index()], proportion);
    }

    /// Live item whose LTM vector is closest (RMSE) to the WM vector of
    /// `probe`. The first minimum wins on ties.
    pub fn closest_ltm(&self, probe: ItemId) -> (ItemId, f64) {
        let target = self.wm(probe);
        let mut best = (ItemId(0), f64::INFINITY);
        for id in self.live_items() {
            let err = target.rmse(self.ltm(id));
            if err < best.1 {
                best = (id, err);
            }
        }
        best
    }
}
