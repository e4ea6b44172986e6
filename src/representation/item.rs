//! Item identifiers and distributed item vectors.
//!
//! An item vector holds one [`Feature`] per item unit. A feature is either a
//! value in feature space or `Unspecified`, meaning the item is not
//! characterised along that dimension. Unspecified features never take part
//! in interference or pattern generation; where a numeric value is needed
//! (RMSE, response-suppression masks) they read as `-1`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{MAX_ITEM, MAX_MEMORANDA, WILDCARD};

/// Index of an item slot (0-based). Slots `0..MAX_MEMORANDA` hold memoranda,
/// the rest hold distractors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub usize);

impl ItemId {
    /// The `n`-th memorandum (0-based).
    pub fn memorandum(n: usize) -> Self {
        debug_assert!(n < MAX_MEMORANDA);
        Self(n)
    }

    /// The `n`-th distractor (0-based).
    pub fn distractor(n: usize) -> Self {
        debug_assert!(MAX_MEMORANDA + n < MAX_ITEM);
        Self(MAX_MEMORANDA + n)
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn is_memorandum(self) -> bool {
        self.0 < MAX_MEMORANDA
    }

    /// Recall symbol: `A`..`Z` for the first 26 slots, [`WILDCARD`] beyond.
    pub fn symbol(self) -> char {
        if self.0 < 26 {
            (b'A' + self.0 as u8) as char
        } else {
            WILDCARD
        }
    }
}

impl fmt::Display for ItemId {
    /// Memoranda print as their letter, distractors as `d<n>` (1-based).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_memorandum() {
            write!(f, "{}", self.symbol())
        } else {
            write!(f, "d{}", self.0 - MAX_MEMORANDA + 1)
        }
    }
}

/// One dimension of an item vector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Feature {
    Unspecified,
    Value(f64),
}

impl Feature {
    /// Numeric stand-in for an unspecified feature.
    pub const SENTINEL: f64 = -1.0;

    /// Read a raw value, mapping the sentinel back to `Unspecified`.
    pub fn from_raw(value: f64) -> Self {
        if value == Self::SENTINEL {
            Feature::Unspecified
        } else {
            Feature::Value(value)
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Feature::Value(v) => Some(v),
            Feature::Unspecified => None,
        }
    }

    pub fn is_specified(self) -> bool {
        matches!(self, Feature::Value(_))
    }

    /// Value with unspecified features read as [`Feature::SENTINEL`].
    pub fn numeric(self) -> f64 {
        self.value().unwrap_or(Self::SENTINEL)
    }
}

/// A distributed item representation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemVector {
    features: Vec<Feature>,
}

impl ItemVector {
    /// A vector with every dimension unspecified.
    pub fn unspecified(dim: usize) -> Self {
        Self {
            features: vec![Feature::Unspecified; dim],
        }
    }

    pub fn from_features(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Build from raw values; entries equal to the sentinel become unspecified.
    pub fn from_raw(values: &[f64]) -> Self {
        Self {
            features: values.iter().map(|&v| Feature::from_raw(v)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, i: usize) -> Feature {
        self.features[i]
    }

    pub fn set(&mut self, i: usize, feature: Feature) {
        self.features[i] = feature;
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub(crate) fn features_mut(&mut self) -> &mut [Feature] {
        &mut self.features
    }

    /// Index of the first specified dimension.
    pub fn first_specified(&self) -> Option<usize> {
        self.features.iter().position(|f| f.is_specified())
    }

    /// Number of specified dimensions.
    pub fn specified_count(&self) -> usize {
        self.features.iter().filter(|f| f.is_specified()).count()
    }

    /// Raw values with the sentinel in unspecified dimensions.
    pub fn to_raw(&self) -> Vec<f64> {
        self.features.iter().map(|f| f.numeric()).collect()
    }

    /// Move this vector toward `source` by `proportion`.
    ///
    /// Only dimensions specified in both vectors and holding different values
    /// are blended: `x ← x·(1 − p) + y·p`.
    pub fn interfere(&mut self, source: &ItemVector, proportion: f64) {
        debug_assert_eq!(self.len(), source.len());
        for (target, &src) in self.features.iter_mut().zip(source.features.iter()) {
            if let (Feature::Value(x), Feature::Value(y)) = (*target, src) {
                if x != y {
                    *target = Feature::Value(x * (1.0 - proportion) + y * proportion);
                }
            }
        }
    }

    /// Root-mean-square error over all dimensions.
    ///
    /// Unspecified dimensions are not masked: they enter the sum as `-1`.
    pub fn rmse(&self, other: &ItemVector) -> f64 {
        debug_assert_eq!(self.len(), other.len());
        if self.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .features
            .iter()
            .zip(other.features.iter())
            .map(|(a, b)| {
                let d = a.numeric() - b.numeric();
                d * d
            })
            .sum();
        (sum / self.len() as f64).sqrt()
    }
}
