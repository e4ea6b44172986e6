//! Item × position association matrix.
//!
//! Row `i` holds the links from item `i` to every position unit. Encoding
//! moves the links of active units toward the asymptote `L`; elapsed time
//! multiplies every link by `exp(−D·Δt)`. Response suppression at recall can
//! push links below zero.

use ndarray::{Array2, Zip};

use crate::config::{MAX_ITEM, N_POSITION_UNITS};
use crate::representation::item::ItemId;
use crate::representation::position::PositionVector;

#[derive(Clone, Debug)]
pub struct AssociationMatrix {
    /// weights[[item, unit]]
    weights: Array2<f64>,

    /// Asymptotic link strength `L`.
    asymptote: f64,
}

impl AssociationMatrix {
    /// All-zero matrix over every item slot.
    pub fn new(asymptote: f64) -> Self {
        Self {
            weights: Array2::zeros((MAX_ITEM, N_POSITION_UNITS)),
            asymptote,
        }
    }

    pub fn asymptote(&self) -> f64 {
        self.asymptote
    }

    pub fn weight(&self, item: ItemId, unit: usize) -> f64 {
        self.weights[[item.index(), unit]]
    }

    /// Multiply the links of every item except `excluded` by `factor`.
    pub fn decay(&mut self, factor: f64, excluded: Option<ItemId>) {
        for (i, mut row) in self.weights.outer_iter_mut().enumerate() {
            if excluded.map_or(false, |e| e.index() == i) {
                continue;
            }
            row.mapv_inplace(|w| w * factor);
        }
    }

    /// `w ← w + (L − w)·eta` on the units active in `position`.
    pub fn strengthen(&mut self, item: ItemId, position: &PositionVector, eta: f64) {
        let asymptote = self.asymptote;
        let row = self.weights.row_mut(item.index());
        Zip::from(row)
            .and(position.units())
            .for_each(|w, &p| {
                if p != 0.0 {
                    *w += (asymptote - *w) * eta;
                }
            });
    }

    /// Subtract `amount` from the links of `item` on every unit selected by
    /// `mask`.
    pub fn suppress<F>(&mut self, item: ItemId, amount: f64, mask: F)
    where
        F: Fn(usize) -> bool,
    {
        for (unit, w) in self.weights.row_mut(item.index()).iter_mut().enumerate() {
            if mask(unit) {
                *w -= amount;
            }
        }
    }

    /// Cue strength of `item` at `position`: Σ position · link.
    pub fn activation(&self, item: ItemId, position: &PositionVector) -> f64 {
        self.weights.row(item.index()).dot(position.units())
    }

    /// Sum of all links, for diagnostics.
    pub fn total_strength(&self) -> f64 {
        self.weights.sum()
    }
}
