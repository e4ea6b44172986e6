//! Position representations.
//!
//! A position vector is binary over `N_UNIT_BLOCKS × POSITION_BLOCK_SIZE`
//! units with exactly one active unit per block. Consecutive positions share
//! blocks with probability `P`, which gives neighbouring positions overlapping
//! codes.

use ndarray::{s, Array1, ArrayView1};
use rand::Rng;

use crate::config::{MAX_POSITION, N_POSITION_UNITS, N_UNIT_BLOCKS, POSITION_BLOCK_SIZE};
use crate::random::RandomSource;

/// Binary code of one serial position.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionVector {
    /// 0/1 activation per position unit.
    units: Array1<f64>,
}

impl PositionVector {
    fn blank() -> Self {
        Self {
            units: Array1::zeros(N_POSITION_UNITS),
        }
    }

    /// Activate one unit of `block` and clear the others.
    fn set_block(&mut self, block: usize, unit: usize) {
        let base = block * POSITION_BLOCK_SIZE;
        self.units
            .slice_mut(s![base..base + POSITION_BLOCK_SIZE])
            .fill(0.0);
        self.units[base + unit] = 1.0;
    }

    fn copy_block(&mut self, block: usize, from: &PositionVector) {
        let (start, end) = (block * POSITION_BLOCK_SIZE, (block + 1) * POSITION_BLOCK_SIZE);
        self.units
            .slice_mut(s![start..end])
            .assign(&from.units.slice(s![start..end]));
    }

    pub fn units(&self) -> &Array1<f64> {
        &self.units
    }

    pub fn is_active(&self, unit: usize) -> bool {
        self.units[unit] != 0.0
    }

    /// Indices of the active units.
    pub fn active_units(&self) -> impl Iterator<Item = usize> + '_ {
        self.units
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0.0)
            .map(|(i, _)| i)
    }

    pub fn block(&self, block: usize) -> ArrayView1<'_, f64> {
        self.units
            .slice(s![block * POSITION_BLOCK_SIZE..(block + 1) * POSITION_BLOCK_SIZE])
    }

    /// Number of active units shared with `other`.
    pub fn overlap(&self, other: &PositionVector) -> usize {
        self.units
            .iter()
            .zip(other.units.iter())
            .filter(|(&a, &b)| a != 0.0 && b != 0.0)
            .count()
    }
}

/// The position vectors of one trial, indexed from 0.
#[derive(Clone, Debug)]
pub struct PositionLayer {
    vectors: Vec<PositionVector>,
}

impl PositionLayer {
    /// Generate `MAX_POSITION` position vectors.
    ///
    /// The first position picks one random unit per block. Each later block is
    /// kept from the previous position unless an integer draw in `0..100`
    /// exceeds `persistence · 100`, in which case a fresh unit is picked.
    pub fn generate<R: Rng>(persistence: f64, rng: &mut RandomSource<R>) -> Self {
        let threshold = persistence * 100.0;
        let mut vectors: Vec<PositionVector> = Vec::with_capacity(MAX_POSITION);

        let mut first = PositionVector::blank();
        for block in 0..N_UNIT_BLOCKS {
            first.set_block(block, rng.below(POSITION_BLOCK_SIZE));
        }
        vectors.push(first);

        for p in 1..MAX_POSITION {
            let mut next = PositionVector::blank();
            for block in 0..N_UNIT_BLOCKS {
                if rng.percent() as f64 > threshold {
                    next.set_block(block, rng.below(POSITION_BLOCK_SIZE));
                } else {
                    next.copy_block(block, &vectors[p - 1]);
                }
            }
            vectors.push(next);
        }

        tracing::trace!(
            "position layer: {}",
            vectors
                .iter()
                .take(8)
                .map(|v| v.units.iter().map(|&u| if u != 0.0 { '1' } else { '0' }).collect::<String>())
                .collect::<Vec<_>>()
                .join(" | ")
        );

        Self { vectors }
    }

    pub fn get(&self, position: usize) -> &PositionVector {
        &self.vectors[position]
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PositionVector> {
        self.vectors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_block_is_one_hot() {
        let mut rng = RandomSource::seeded(5);
        let layer = PositionLayer::generate(0.3, &mut rng);
        assert_eq!(layer.len(), MAX_POSITION);
        for (p, v) in layer.iter().enumerate() {
            for b in 0..N_UNIT_BLOCKS {
                let block = v.block(b);
                assert_eq!(block.sum(), 1.0, "position {} block {}", p, b);
                assert!(block.iter().all(|&u| u == 0.0 || u == 1.0));
            }
            assert_eq!(v.active_units().count(), N_UNIT_BLOCKS);
        }
    }

    #[test]
    fn test_full_persistence_repeats_first_position() {
        let mut rng = RandomSource::seeded(6);
        let layer = PositionLayer::generate(1.0, &mut rng);
        for v in layer.iter() {
            assert_eq!(v, layer.get(0));
        }
    }

    #[test]
    fn test_persistence_controls_neighbour_overlap() {
        let mut rng = RandomSource::seeded(7);
        let sticky = PositionLayer::generate(0.9, &mut rng);
        let loose = PositionLayer::generate(0.0, &mut rng);
        let mean_overlap = |layer: &PositionLayer| {
            (1..layer.len())
                .map(|p| layer.get(p).overlap(layer.get(p - 1)) as f64)
                .sum::<f64>()
                / (layer.len() - 1) as f64
        };
        // Kept blocks always match; replaced blocks match 1 time in 6.
        assert!(mean_overlap(&sticky) > 7.5, "sticky = {}", mean_overlap(&sticky));
        assert!(mean_overlap(&loose) < 3.5, "loose = {}", mean_overlap(&loose));
    }
}
