//! Shuffle algorithms for playback order randomization
//!
//! Uniform Fisher-Yates over an explicit RNG, plus the "current track first"
//! variant used when shuffle is switched on mid-playback.

use rand::Rng;
use tracing::debug;

/// Uniform in-place shuffle (Fisher-Yates, descending swap)
///
/// Every permutation is equally likely given a uniform `rng`.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Shuffle, then rotate so `current` sits at position 0
///
/// Rotation keeps the cyclic order of the shuffle intact. If `current` is not
/// in `items` the plain shuffle is returned.
pub fn shuffle_with_current_first<T, R>(items: &mut [T], current: &T, rng: &mut R)
where
    T: PartialEq,
    R: Rng + ?Sized,
{
    fisher_yates(items, rng);

    match items.iter().position(|item| item == current) {
        Some(position) => items.rotate_left(position),
        None => debug!("Current item not in shuffle input; leaving order unrotated"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn shuffle_preserves_all_items() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut items: Vec<u32> = (0..50).collect();

        fisher_yates(&mut items, &mut rng);

        let unique: HashSet<u32> = items.iter().copied().collect();
        assert_eq!(unique.len(), 50);
        assert!((0..50).all(|i| unique.contains(&i)));
    }

    #[test]
    fn shuffle_changes_order() {
        let mut rng = StdRng::seed_from_u64(42);
        let original: Vec<u32> = (0..20).collect();
        let mut items = original.clone();

        fisher_yates(&mut items, &mut rng);

        // 1/20! chance of identity with a fixed seed; deterministic either way
        assert_ne!(items, original);
    }

    #[test]
    fn same_seed_same_order() {
        let mut a: Vec<u32> = (0..10).collect();
        let mut b = a.clone();

        fisher_yates(&mut a, &mut StdRng::seed_from_u64(3));
        fisher_yates(&mut b, &mut StdRng::seed_from_u64(3));

        assert_eq!(a, b);
    }

    #[test]
    fn current_item_moves_to_front() {
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut items: Vec<u32> = (0..8).collect();

            shuffle_with_current_first(&mut items, &5, &mut rng);

            assert_eq!(items[0], 5);
            assert_eq!(items.len(), 8);
        }
    }

    #[test]
    fn missing_current_leaves_plain_shuffle() {
        let mut items: Vec<u32> = (0..6).collect();
        let mut expected = items.clone();

        fisher_yates(&mut expected, &mut StdRng::seed_from_u64(11));
        shuffle_with_current_first(&mut items, &99, &mut StdRng::seed_from_u64(11));

        assert_eq!(items, expected);
    }

    #[test]
    fn empty_and_single() {
        let mut rng = StdRng::seed_from_u64(1);

        let mut empty: Vec<u32> = vec![];
        fisher_yates(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut single = vec![9];
        shuffle_with_current_first(&mut single, &9, &mut rng);
        assert_eq!(single, vec![9]);
    }
}
