//! Choice shuffler — seedable permutation helpers.
//!
//! Shared by question generation (option order) and encounter zones (choice
//! order on activation, hint selection).

use crate::rng::DeterministicRng;

/// Shuffles `items` in place with the Fisher–Yates algorithm.
#[allow(clippy::cast_possible_truncation)]
pub fn shuffle_in_place<T>(items: &mut [T], rng: &mut dyn DeterministicRng) {
    for i in (1..items.len()).rev() {
        let j = rng.next_u32_range(0, i as u32) as usize;
        items.swap(i, j.min(i));
    }
}

/// Returns a uniformly random permutation of `0..len`.
#[must_use]
pub fn permutation(len: usize, rng: &mut dyn DeterministicRng) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    shuffle_in_place(&mut order, rng);
    order
}

/// Picks `count` distinct elements of `pool` uniformly, without replacement.
///
/// Returns fewer than `count` elements only when the pool is smaller.
#[must_use]
pub fn sample_without_replacement<T: Copy>(
    pool: &[T],
    count: usize,
    rng: &mut dyn DeterministicRng,
) -> Vec<T> {
    let mut candidates = pool.to_vec();
    shuffle_in_place(&mut candidates, rng);
    candidates.truncate(count);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;

    #[test]
    fn test_permutation_contains_every_index_once() {
        let mut rng = SeededRng::from_seed_u64(99);
        let mut order = permutation(8, &mut rng);
        order.sort_unstable();
        assert_eq!(order, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_empty_and_single_are_untouched() {
        let mut rng = SeededRng::from_seed_u64(1);
        let mut empty: Vec<u8> = Vec::new();
        shuffle_in_place(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut single = vec![5];
        shuffle_in_place(&mut single, &mut rng);
        assert_eq!(single, vec![5]);
    }

    #[test]
    fn test_sample_without_replacement_is_distinct() {
        let mut rng = SeededRng::from_seed_u64(21);
        for _ in 0..100 {
            let picked = sample_without_replacement(&[0, 1, 3], 2, &mut rng);
            assert_eq!(picked.len(), 2);
            assert_ne!(picked[0], picked[1]);
        }
    }

    #[test]
    fn test_sample_larger_than_pool_returns_pool() {
        let mut rng = SeededRng::from_seed_u64(2);
        let mut picked = sample_without_replacement(&[4, 9], 5, &mut rng);
        picked.sort_unstable();
        assert_eq!(picked, vec![4, 9]);
    }

    #[test]
    fn test_permutation_reaches_every_position() {
        // Every element should land in every slot across enough shuffles.
        let mut rng = SeededRng::from_seed_u64(1234);
        let mut seen = [[false; 4]; 4];
        for _ in 0..400 {
            let order = permutation(4, &mut rng);
            for (slot, &item) in order.iter().enumerate() {
                seen[item][slot] = true;
            }
        }
        assert!(seen.iter().flatten().all(|&hit| hit));
    }
}
