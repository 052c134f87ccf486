//! Configuration types for schedule generation
//!
//! Level 4 - Utilities and configuration

use serde::{Deserialize, Serialize};

/// Weights for scoring a candidate team split (lower score is better)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PenaltyWeights {
    /// Multiplied by usage² for every repeated teammate pair
    pub partnership: i64,
    /// Multiplied by usage² for every repeated opponent pair
    pub opponent: i64,
    /// Excluded player sat out last round
    pub excluded_sat_last_round: i64,
    /// Excluded player is below the current maximum sit count
    pub excluded_below_max: i64,
    /// Multiplied by streak² for every excluded player
    pub excluded_streak: i64,
    /// Discount for including a player who sat out last round
    pub bonus_sat_last_round: i64,
    /// Discount for including a player at the current maximum sit count
    pub bonus_at_max: i64,
    /// Discount for including a player above the current minimum sit count
    pub bonus_above_min: i64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            partnership: 10,
            opponent: 2,
            excluded_sat_last_round: 10_000,
            excluded_below_max: 5_000,
            excluded_streak: 1_000,
            bonus_sat_last_round: 200,
            bonus_at_max: 100,
            bonus_above_min: 50,
        }
    }
}

/// Options for one generation run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorOptions {
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
    /// Cap on candidate splits evaluated per team-pair
    pub max_attempts: usize,
    /// A split scoring at or below this is accepted immediately
    pub near_perfect_score: i64,
    /// Scoring weights
    pub weights: PenaltyWeights,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            seed: None,
            max_attempts: 100,
            near_perfect_score: 10,
            weights: PenaltyWeights::default(),
        }
    }
}

impl GeneratorOptions {
    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the per-team-pair attempt cap
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set custom weights
    pub fn with_weights(mut self, weights: PenaltyWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sampling attempts for a pool: min(cap, pool^min(team, 3))
    pub fn attempt_budget(&self, pool_size: usize, players_per_team: usize) -> usize {
        let exponent = players_per_team.min(3) as u32;
        let space = (pool_size as u64).saturating_pow(exponent);
        space.min(self.max_attempts as u64) as usize
    }
}
