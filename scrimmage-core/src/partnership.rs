//! Partnership tracking - how often each pair of players has been grouped
//!
//! One tracker lives for a single schedule generation. The same structure
//! counts teammate pairs and, in a second instance, opponent pairs.

use rustc_hash::FxHashMap;

use crate::roster::PlayerIdx;

/// Unordered pair of players, stored low index first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartnershipKey {
    low: PlayerIdx,
    high: PlayerIdx,
}

impl PartnershipKey {
    pub fn new(a: PlayerIdx, b: PlayerIdx) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn players(&self) -> (PlayerIdx, PlayerIdx) {
        (self.low, self.high)
    }
}

/// Usage counts for player pairs
#[derive(Clone, Debug, Default)]
pub struct PartnershipTracker {
    usage: FxHashMap<PartnershipKey, u32>,
}

impl PartnershipTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every pair within one team
    pub fn record_partnerships(&mut self, team: &[PlayerIdx]) {
        for (i, &a) in team.iter().enumerate() {
            for &b in &team[i + 1..] {
                self.record_pair(a, b);
            }
        }
    }

    /// Count every pair with one player on each side
    pub fn record_opposition(&mut self, team_a: &[PlayerIdx], team_b: &[PlayerIdx]) {
        for &a in team_a {
            for &b in team_b {
                self.record_pair(a, b);
            }
        }
    }

    pub fn record_pair(&mut self, a: PlayerIdx, b: PlayerIdx) {
        *self.usage.entry(PartnershipKey::new(a, b)).or_insert(0) += 1;
    }

    /// Times the pair has been grouped, 0 if never
    pub fn usage_count(&self, a: PlayerIdx, b: PlayerIdx) -> u32 {
        self.usage
            .get(&PartnershipKey::new(a, b))
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct pairs seen so far
    pub fn distinct_pairs(&self) -> usize {
        self.usage.len()
    }

    /// Pairs grouped more than once
    pub fn repeated_pairs(&self) -> usize {
        self.usage.values().filter(|&&n| n > 1).count()
    }

    pub fn max_usage(&self) -> u32 {
        self.usage.values().copied().max().unwrap_or(0)
    }
}
