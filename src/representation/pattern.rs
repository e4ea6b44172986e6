//! Item pattern generation.
//!
//! Memoranda get fully random patterns (or preset embeddings, see
//! [`super::embeddings`]). Distractor patterns are derived on the fly from the
//! item currently best associated with the position being processed.

use rand::Rng;

use crate::random::RandomSource;
use crate::representation::item::{Feature, ItemVector};

/// Random pattern: every dimension uniform in [0, 1).
pub fn random_pattern<R: Rng>(dim: usize, rng: &mut RandomSource<R>) -> ItemVector {
    ItemVector::from_features((0..dim).map(|_| Feature::Value(rng.uniform())).collect())
}

/// One feature close to `reference`: `Normal(reference, std)` clamped to
/// [0, 1], or uniform when the reference is unspecified.
fn similar_feature<R: Rng>(reference: Feature, std: f64, rng: &mut RandomSource<R>) -> Feature {
    match reference {
        Feature::Unspecified => Feature::Value(rng.uniform()),
        Feature::Value(v) => Feature::Value(rng.normal(v, std).clamp(0.0, 1.0)),
    }
}

/// Pattern more or less similar to `reference`, dimension by dimension.
pub fn similar_pattern<R: Rng>(
    reference: &ItemVector,
    std: f64,
    rng: &mut RandomSource<R>,
) -> ItemVector {
    ItemVector::from_features(
        reference
            .features()
            .iter()
            .map(|&f| similar_feature(f, std, rng))
            .collect(),
    )
}

/// Distractor pattern sharing a fraction `overlap` of its characterised span
/// with `reference`.
///
/// The reference window starts at the first specified dimension of
/// `reference` and is `len / 4` wide. The new pattern characterises a span of
/// the same width, shifted past the window start by `(1 − overlap)·span`:
///
/// ```text
///   reference   -1 -1 x x x x -1 -1 -1 -1
///   overlap=1   -1 -1 y y y y -1 -1 -1 -1
///   overlap=.5  -1 -1 -1 -1 y y u u -1 -1
///   overlap=0   -1 -1 -1 -1 -1 -1 u u u u
/// ```
///
/// Dimensions inside the window (`y`) are noisy copies of the reference with
/// standard deviation `noise`; those past it (`u`) are uniform. Values are
/// then shuffled within the window only, so the number of characterised units
/// inside the window stays `overlap·span`. Every other dimension is
/// unspecified.
pub fn overlapping_pattern<R: Rng>(
    reference: &ItemVector,
    overlap: f64,
    noise: f64,
    rng: &mut RandomSource<R>,
) -> ItemVector {
    let size = reference.len();
    let span = size / 4;
    let first = reference.first_specified().unwrap_or(0);
    let window_end = (first + span).min(size);
    let shift = ((1.0 - overlap.clamp(0.0, 1.0)) * span as f64).round() as usize;
    let start = (first + shift).min(size);
    let end = (start + span).min(size);

    let mut pattern = ItemVector::unspecified(size);
    for d in start..end {
        let source = if d < window_end {
            reference.get(d)
        } else {
            Feature::Unspecified
        };
        pattern.set(d, similar_feature(source, noise, rng));
    }

    // Fisher–Yates restricted to [first, window_end).
    let features = pattern.features_mut();
    for c in (first + 1..window_end).rev() {
        let j = first + rng.below(c - first + 1);
        features.swap(c, j);
    }

    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_range_or_unspecified(v: &ItemVector) -> bool {
        v.features().iter().all(|f| match f {
            Feature::Unspecified => true,
            Feature::Value(x) => (0.0..=1.0).contains(x),
        })
    }

    #[test]
    fn test_random_pattern_range() {
        let mut rng = RandomSource::seeded(7);
        let p = random_pattern(100, &mut rng);
        assert_eq!(p.len(), 100);
        assert_eq!(p.specified_count(), 100);
        assert!(in_range_or_unspecified(&p));
    }

    #[test]
    fn test_similar_pattern_clamps() {
        let mut rng = RandomSource::seeded(8);
        let reference = ItemVector::from_raw(&[0.0, 1.0, -1.0, 0.5]);
        for _ in 0..200 {
            let p = similar_pattern(&reference, 3.0, &mut rng);
            assert_eq!(p.specified_count(), 4);
            assert!(in_range_or_unspecified(&p));
        }
    }

    #[test]
    fn test_similar_pattern_zero_noise_copies() {
        let mut rng = RandomSource::seeded(9);
        let reference = ItemVector::from_raw(&[0.25, 0.75]);
        assert_eq!(similar_pattern(&reference, 0.0, &mut rng), reference);
    }

    #[test]
    fn test_overlapping_pattern_support() {
        let mut rng = RandomSource::seeded(10);
        let reference = random_pattern(100, &mut rng);
        for &overlap in &[0.0, 0.4, 1.0] {
            let p = overlapping_pattern(&reference, overlap, 1.0, &mut rng);
            assert_eq!(p.len(), 100);
            assert_eq!(p.specified_count(), 25, "overlap = {}", overlap);
            assert!(in_range_or_unspecified(&p));
        }
    }

    #[test]
    fn test_overlapping_pattern_shift() {
        let mut rng = RandomSource::seeded(11);
        let reference = random_pattern(100, &mut rng);

        let none = overlapping_pattern(&reference, 0.0, 1.0, &mut rng);
        assert!((0..25).all(|d| !none.get(d).is_specified()));
        assert!((25..50).all(|d| none.get(d).is_specified()));

        let full = overlapping_pattern(&reference, 1.0, 1.0, &mut rng);
        assert!((0..25).all(|d| full.get(d).is_specified()));
        assert!((25..100).all(|d| !full.get(d).is_specified()));

        let part = overlapping_pattern(&reference, 0.4, 1.0, &mut rng);
        // 10 of the 25 characterised units land in the reference window.
        assert_eq!((0..25).filter(|&d| part.get(d).is_specified()).count(), 10);
    }

    fn mean<F: FnMut() -> f64>(draws: usize, mut f: F) -> f64 {
        (0..draws).map(|_| f()).sum::<f64>() / draws as f64
    }

    #[test]
    fn test_zero_overlap_is_unrelated_to_source() {
        let mut rng = RandomSource::seeded(13);
        let mut to_source = 0.0;
        let mut to_unrelated = 0.0;
        let draws = 2000;
        for _ in 0..draws {
            let source = random_pattern(100, &mut rng);
            let unrelated = random_pattern(100, &mut rng);
            let p = overlapping_pattern(&source, 0.0, 1.0, &mut rng);
            to_source += p.rmse(&source);
            to_unrelated += p.rmse(&unrelated);
        }
        let (to_source, to_unrelated) = (to_source / draws as f64, to_unrelated / draws as f64);
        assert!(
            (to_source - to_unrelated).abs() < 0.02,
            "source {:.4}, unrelated {:.4}",
            to_source,
            to_unrelated
        );
    }

    #[test]
    fn test_full_overlap_stays_close_to_source() {
        let mut rng = RandomSource::seeded(14);
        // Sparse source, characterised on 40..65 only.
        let mut source = || {
            let mut raw = vec![-1.0; 100];
            for v in raw.iter_mut().skip(40).take(25) {
                *v = rng.uniform();
            }
            ItemVector::from_raw(&raw)
        };
        let sources: Vec<ItemVector> = (0..500).map(|_| source()).collect();

        let mut rng = RandomSource::seeded(15);
        let mut it = sources.iter();
        let full = mean(sources.len(), || {
            let s = it.next().unwrap();
            overlapping_pattern(s, 1.0, 1.0, &mut rng).rmse(s)
        });
        let mut it = sources.iter();
        let none = mean(sources.len(), || {
            let s = it.next().unwrap();
            overlapping_pattern(s, 0.0, 1.0, &mut rng).rmse(s)
        });
        assert!(full + 0.5 < none, "overlap 1: {:.4}, overlap 0: {:.4}", full, none);
    }

    #[test]
    fn test_overlapping_pattern_follows_reference_window() {
        let mut rng = RandomSource::seeded(12);
        let mut raw = vec![-1.0; 100];
        for v in raw.iter_mut().skip(40).take(25) {
            *v = 0.5;
        }
        let reference = ItemVector::from_raw(&raw);
        let p = overlapping_pattern(&reference, 1.0, 0.0, &mut rng);
        for d in 0..100 {
            if (40..65).contains(&d) {
                assert_eq!(p.get(d), Feature::Value(0.5));
            } else {
                assert_eq!(p.get(d), Feature::Unspecified);
            }
        }
    }
}
