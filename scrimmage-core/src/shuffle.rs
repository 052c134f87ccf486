//! Uniform random permutations

use rand::seq::SliceRandom;
use rand::Rng;

/// Return a uniformly shuffled copy, leaving the input untouched
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    shuffle_in_place(&mut out, rng);
    out
}

/// Fisher-Yates shuffle in place
pub fn shuffle_in_place<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_shuffled_is_permutation() {
        let items: Vec<u32> = (0..20).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let mut out = shuffled(&items, &mut rng);
        assert_eq!(items, (0..20).collect::<Vec<_>>(), "input must not change");

        out.sort_unstable();
        assert_eq!(out, items);
    }

    #[test]
    fn test_shuffled_is_seed_deterministic() {
        let items: Vec<u32> = (0..10).collect();
        let a = shuffled(&items, &mut ChaCha8Rng::seed_from_u64(3));
        let b = shuffled(&items, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_covers_all_positions() {
        // Every element should land first at least once over many draws
        let items = [0usize, 1, 2, 3];
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut firsts = [0u32; 4];
        for _ in 0..400 {
            firsts[shuffled(&items, &mut rng)[0]] += 1;
        }
        assert!(firsts.iter().all(|&n| n > 50), "skewed: {:?}", firsts);
    }

    #[test]
    fn test_empty_and_single() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(shuffled::<u8, _>(&[], &mut rng).is_empty());
        assert_eq!(shuffled(&[9], &mut rng), vec![9]);
    }
}
