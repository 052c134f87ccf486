//! Sitting fairness - pick exactly who sits out this round
//!
//! Level 2 - Phase run on the players left after linked groups are seated

use rand::Rng;
use scrimmage_core::{shuffle_in_place, shuffled, PlayerIdx, SittingTracker};

/// Sitters for a round plus the tiered play pool
#[derive(Clone, Debug, Default)]
pub struct SitterSelection {
    /// Players sitting out, in selection order
    pub sitters: Vec<PlayerIdx>,
    /// Everyone else: must-play tier, then should-play, then normal
    pub play_pool: Vec<PlayerIdx>,
    /// Size of the must-play tier (sat out last round)
    pub must_play: usize,
    /// Size of the should-play tier (sat out more than the roster minimum)
    pub should_play: usize,
}

/// Players left over once every full matchup is formed
pub fn sitters_needed(pool_size: usize, match_size: usize) -> usize {
    if match_size == 0 {
        return pool_size;
    }
    pool_size % match_size
}

/// Choose this round's sitters from `residual`.
///
/// Order of preference for sitting: zero streak before any streak, then
/// lowest cumulative sit count, random among equals. A player on a streak
/// only sits again when the zero-streak candidates run out.
pub fn select_sitters<R: Rng + ?Sized>(
    residual: &[PlayerIdx],
    sitting: &SittingTracker,
    match_size: usize,
    rng: &mut R,
) -> SitterSelection {
    let needed = sitters_needed(residual.len(), match_size);

    let mut candidates = shuffled(residual, rng);
    candidates.sort_by_key(|&p| (sitting.streak(p), sitting.cumulative_count(p)));

    let remaining = candidates.split_off(needed);
    let sitters = candidates;

    let forced = sitters.iter().filter(|&&p| sitting.streak(p) > 0).count();
    if forced > 0 {
        tracing::debug!(
            "{} player(s) sit out consecutive rounds: pool of {} too small to avoid it",
            forced,
            residual.len()
        );
    }

    let min_sits = sitting.min_cumulative();
    let (mut must, rest): (Vec<PlayerIdx>, Vec<PlayerIdx>) = remaining
        .into_iter()
        .partition(|&p| sitting.sat_out_last_round(p));
    let (mut should, mut normal): (Vec<PlayerIdx>, Vec<PlayerIdx>) = rest
        .into_iter()
        .partition(|&p| sitting.cumulative_count(p) > min_sits);

    shuffle_in_place(&mut must, rng);
    shuffle_in_place(&mut should, rng);
    shuffle_in_place(&mut normal, rng);

    let must_play = must.len();
    let should_play = should.len();
    let mut play_pool = must;
    play_pool.append(&mut should);
    play_pool.append(&mut normal);

    SitterSelection {
        sitters,
        play_pool,
        must_play,
        should_play,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_sitters_needed() {
        assert_eq!(sitters_needed(10, 4), 2);
        assert_eq!(sitters_needed(8, 4), 0);
        assert_eq!(sitters_needed(3, 4), 3);
        assert_eq!(sitters_needed(0, 2), 0);
    }

    #[test]
    fn test_lowest_cumulative_sits_first() {
        let mut sitting = SittingTracker::new(5);
        sitting.record_round(&[0]);
        sitting.record_round(&[1]);
        sitting.record_round(&[2]);
        sitting.record_round(&[3]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let selection = select_sitters(&[0, 1, 2, 3, 4], &sitting, 2, &mut rng);
        assert_eq!(selection.sitters, vec![4]);
        assert_eq!(selection.play_pool.len(), 4);
        // player 3 sat last round
        assert_eq!(selection.must_play, 1);
        assert_eq!(selection.play_pool[0], 3);
    }

    #[test]
    fn test_streak_players_protected() {
        let mut sitting = SittingTracker::new(5);
        sitting.record_round(&[0, 1]);
        let mut rng = ChaCha8Rng::seed_from_u64(10);

        for _ in 0..50 {
            let selection = select_sitters(&[0, 1, 2, 3, 4], &sitting, 2, &mut rng);
            assert_eq!(selection.sitters.len(), 1);
            assert!(!selection.sitters.contains(&0));
            assert!(!selection.sitters.contains(&1));
        }
    }

    #[test]
    fn test_streak_players_sit_when_unavoidable() {
        // 7 players, 4-player matches: 3 must sit but only 2 have no streak
        let mut sitting = SittingTracker::new(7);
        sitting.record_round(&[0, 1, 2, 3, 4]);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let selection = select_sitters(&[0, 1, 2, 3, 4, 5, 6], &sitting, 4, &mut rng);
        assert_eq!(selection.sitters.len(), 3);
        assert!(selection.sitters.contains(&5));
        assert!(selection.sitters.contains(&6));
        assert_eq!(selection.play_pool.len(), 4);

        // under-resourced: everyone sits
        let selection = select_sitters(&[0, 1, 2], &sitting, 4, &mut rng);
        assert_eq!(selection.sitters.len(), 3);
        assert!(selection.play_pool.is_empty());
    }

    #[test]
    fn test_pool_tiers() {
        let mut sitting = SittingTracker::new(6);
        sitting.record_round(&[0, 1]);
        sitting.record_round(&[2]);
        let mut rng = ChaCha8Rng::seed_from_u64(12);

        let selection = select_sitters(&[0, 1, 2, 3, 4, 5], &sitting, 2, &mut rng);
        assert!(selection.sitters.is_empty());
        assert_eq!(selection.must_play, 1);
        assert_eq!(selection.should_play, 2);
        assert_eq!(selection.play_pool[0], 2);

        let mut should: Vec<PlayerIdx> = selection.play_pool[1..3].to_vec();
        should.sort_unstable();
        assert_eq!(should, vec![0, 1]);
    }
}
