//! Pairing strategies - choose the next two teams out of a play pool
//!
//! The composer asks a strategy for one team-pair at a time. Swapping the
//! strategy changes the search without touching round orchestration.

use rand::Rng;
use scrimmage_core::{shuffled, PlayerIdx};

use crate::config::GeneratorOptions;
use crate::scoring::score_split;
use crate::state::RoundContext;

/// Two teams picked from a pool
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairSelection {
    pub team_a: Vec<PlayerIdx>,
    pub team_b: Vec<PlayerIdx>,
    /// None when the split was taken without scoring
    pub score: Option<i64>,
    /// Candidate splits scored to reach this one
    pub evaluated: usize,
}

/// Picks the next team-pair from the pool
pub trait PairingStrategy {
    /// Select two disjoint teams of `ctx.players_per_team()` from `pool`.
    ///
    /// Returns None when the strategy evaluated nothing; the caller then
    /// falls back to a positional split.
    fn select_pair<R: Rng + ?Sized>(
        &self,
        pool: &[PlayerIdx],
        ctx: &RoundContext<'_>,
        rng: &mut R,
    ) -> Option<PairSelection>;
}

/// Take the first two teams in pool order without scoring
#[derive(Clone, Copy, Debug, Default)]
pub struct PositionalStrategy;

impl PositionalStrategy {
    pub fn split(pool: &[PlayerIdx], players_per_team: usize) -> PairSelection {
        let k = players_per_team.min(pool.len() / 2);
        PairSelection {
            team_a: pool[..k].to_vec(),
            team_b: pool[k..2 * k].to_vec(),
            score: None,
            evaluated: 0,
        }
    }
}

impl PairingStrategy for PositionalStrategy {
    fn select_pair<R: Rng + ?Sized>(
        &self,
        pool: &[PlayerIdx],
        ctx: &RoundContext<'_>,
        _rng: &mut R,
    ) -> Option<PairSelection> {
        Some(Self::split(pool, ctx.players_per_team()))
    }
}

/// Bounded random search over candidate splits.
///
/// Each attempt shuffles the pool and takes the first two teams. When the
/// pool has no more distinct splits than the attempt cap, every split is
/// scored instead and the best one kept.
#[derive(Clone, Debug, Default)]
pub struct SamplingStrategy {
    options: GeneratorOptions,
}

impl SamplingStrategy {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    fn sample<R: Rng + ?Sized>(
        &self,
        pool: &[PlayerIdx],
        ctx: &RoundContext<'_>,
        budget: usize,
        rng: &mut R,
    ) -> Option<PairSelection> {
        let k = ctx.players_per_team();
        let mut best: Option<PairSelection> = None;
        let mut evaluated = 0;

        for _ in 0..budget {
            let order = shuffled(pool, rng);
            let (team_a, rest) = order.split_at(k);
            let (team_b, excluded) = rest.split_at(k);
            let score = score_split(team_a, team_b, excluded, ctx, &self.options.weights);
            evaluated += 1;

            if best.as_ref().map_or(true, |b| Some(score) < b.score) {
                best = Some(PairSelection {
                    team_a: team_a.to_vec(),
                    team_b: team_b.to_vec(),
                    score: Some(score),
                    evaluated: 0,
                });
            }
            if score <= self.options.near_perfect_score {
                break;
            }
        }

        best.map(|b| PairSelection { evaluated, ..b })
    }

    fn enumerate<R: Rng + ?Sized>(
        &self,
        pool: &[PlayerIdx],
        ctx: &RoundContext<'_>,
        rng: &mut R,
    ) -> Option<PairSelection> {
        let k = ctx.players_per_team();
        // Shuffle first so equal scores resolve randomly
        let order = shuffled(pool, rng);
        let mut best: Option<PairSelection> = None;
        let mut evaluated = 0;

        for a_idx in combinations(order.len(), k) {
            let rest: Vec<usize> = (0..order.len()).filter(|i| !a_idx.contains(i)).collect();
            for b_pos in combinations(rest.len(), k) {
                let team_a: Vec<PlayerIdx> = a_idx.iter().map(|&i| order[i]).collect();
                let team_b: Vec<PlayerIdx> = b_pos.iter().map(|&j| order[rest[j]]).collect();
                let excluded: Vec<PlayerIdx> = rest
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| !b_pos.contains(j))
                    .map(|(_, &i)| order[i])
                    .collect();

                let score = score_split(&team_a, &team_b, &excluded, ctx, &self.options.weights);
                evaluated += 1;
                if best.as_ref().map_or(true, |b| Some(score) < b.score) {
                    best = Some(PairSelection {
                        team_a,
                        team_b,
                        score: Some(score),
                        evaluated: 0,
                    });
                }
            }
        }

        best.map(|b| PairSelection { evaluated, ..b })
    }
}

impl PairingStrategy for SamplingStrategy {
    fn select_pair<R: Rng + ?Sized>(
        &self,
        pool: &[PlayerIdx],
        ctx: &RoundContext<'_>,
        rng: &mut R,
    ) -> Option<PairSelection> {
        let k = ctx.players_per_team();
        if k == 0 || pool.len() < 2 * k {
            return None;
        }

        let budget = self.options.attempt_budget(pool.len(), k);
        if budget == 0 {
            return None;
        }

        if split_count(pool.len(), k) <= self.options.max_attempts as u128 {
            self.enumerate(pool, ctx, rng)
        } else {
            self.sample(pool, ctx, budget, rng)
        }
    }
}

/// Ordered (team A, team B) splits of `n` players into two teams of `k`
fn split_count(n: usize, k: usize) -> u128 {
    binomial(n, k).saturating_mul(binomial(n.saturating_sub(k), k))
}

fn binomial(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        result = result.saturating_mul((n - i) as u128) / (i as u128 + 1);
    }
    result
}

/// All k-element index subsets of 0..n, in lexicographic order
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k > n {
        return out;
    }
    let mut current: Vec<usize> = (0..k).collect();
    loop {
        out.push(current.clone());

        // Rightmost index that can still move right
        let Some(i) = (0..k).rev().find(|&i| current[i] < n - k + i) else {
            return out;
        };
        current[i] += 1;
        for j in i + 1..k {
            current[j] = current[j - 1] + 1;
        }
    }
}
