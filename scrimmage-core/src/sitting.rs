//! Sitting history - cumulative sit-outs, streaks and last round's sitters

use crate::roster::PlayerIdx;

/// Per-player sit-out bookkeeping for one schedule generation
#[derive(Clone, Debug)]
pub struct SittingTracker {
    cumulative: Vec<u32>,
    streak: Vec<u32>,
    sat_last_round: Vec<bool>,
}

impl SittingTracker {
    /// Fresh history for `players` participants
    pub fn new(players: usize) -> Self {
        Self {
            cumulative: vec![0; players],
            streak: vec![0; players],
            sat_last_round: vec![false; players],
        }
    }

    /// Close out a round. Call exactly once per round, with its final sitters.
    pub fn record_round(&mut self, sitters: &[PlayerIdx]) {
        self.sat_last_round.iter_mut().for_each(|s| *s = false);
        for &p in sitters {
            self.sat_last_round[p] = true;
        }

        for p in 0..self.cumulative.len() {
            if self.sat_last_round[p] {
                self.cumulative[p] += 1;
                self.streak[p] += 1;
            } else {
                self.streak[p] = 0;
            }
        }
    }

    pub fn cumulative_count(&self, player: PlayerIdx) -> u32 {
        self.cumulative[player]
    }

    pub fn streak(&self, player: PlayerIdx) -> u32 {
        self.streak[player]
    }

    pub fn sat_out_last_round(&self, player: PlayerIdx) -> bool {
        self.sat_last_round[player]
    }

    /// Players who sat out the previous round, in roster order
    pub fn previous_sitters(&self) -> Vec<PlayerIdx> {
        (0..self.sat_last_round.len())
            .filter(|&p| self.sat_last_round[p])
            .collect()
    }

    /// Lowest cumulative count across the roster
    pub fn min_cumulative(&self) -> u32 {
        self.cumulative.iter().copied().min().unwrap_or(0)
    }

    /// Highest cumulative count across the roster
    pub fn max_cumulative(&self) -> u32 {
        self.cumulative.iter().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_tracker() {
        let tracker = SittingTracker::new(3);
        assert_eq!(tracker.cumulative_count(2), 0);
        assert_eq!(tracker.streak(2), 0);
        assert!(tracker.previous_sitters().is_empty());
        assert_eq!(tracker.max_cumulative(), 0);
    }

    #[test]
    fn test_streak_grows_and_resets() {
        let mut tracker = SittingTracker::new(3);

        tracker.record_round(&[0]);
        tracker.record_round(&[0, 1]);
        assert_eq!(tracker.streak(0), 2);
        assert_eq!(tracker.streak(1), 1);
        assert_eq!(tracker.cumulative_count(0), 2);
        assert_eq!(tracker.previous_sitters(), vec![0, 1]);

        tracker.record_round(&[2]);
        assert_eq!(tracker.streak(0), 0);
        assert_eq!(tracker.streak(1), 0);
        assert_eq!(tracker.cumulative_count(0), 2, "cumulative never resets");
        assert!(tracker.sat_out_last_round(2));
        assert!(!tracker.sat_out_last_round(0));
    }

    #[test]
    fn test_min_max_cumulative() {
        let mut tracker = SittingTracker::new(3);
        tracker.record_round(&[0, 1]);
        tracker.record_round(&[0]);

        assert_eq!(tracker.min_cumulative(), 0);
        assert_eq!(tracker.max_cumulative(), 2);
    }
}
