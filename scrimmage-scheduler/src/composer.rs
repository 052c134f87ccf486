//! Team composition - split the play pool into balanced team-pairs
//!
//! Level 2 - Phase run after sitters are chosen

use rand::Rng;
use scrimmage_core::{PlayerIdx, Roster};

use crate::error::{ScheduleError, ScheduleResult};
use crate::state::{RoundContext, ScheduleState};
use crate::strategy::{PairingStrategy, PositionalStrategy};

/// Team-pairs formed from one round's play pool
#[derive(Clone, Debug, Default)]
pub struct ComposedTeams {
    pub matchups: Vec<(Vec<PlayerIdx>, Vec<PlayerIdx>)>,
    /// Team-pairs taken positionally because the strategy evaluated nothing
    pub fallbacks: usize,
    /// Candidate splits scored across all team-pairs
    pub evaluated: usize,
}

/// Form team-pairs until the pool is exhausted.
///
/// The pool size must be a multiple of the match size; the sitting
/// selector guarantees this and it is checked here rather than assumed.
pub fn compose_teams<S, R>(
    mut pool: Vec<PlayerIdx>,
    round: usize,
    roster: &Roster,
    state: &mut ScheduleState,
    strategy: &S,
    rng: &mut R,
) -> ScheduleResult<ComposedTeams>
where
    S: PairingStrategy,
    R: Rng + ?Sized,
{
    let match_size = roster.match_size();
    if match_size == 0 || pool.len() % match_size != 0 {
        return Err(ScheduleError::UnbalancedPool {
            round,
            pool_size: pool.len(),
            match_size,
        });
    }

    let mut composed = ComposedTeams::default();

    while pool.len() >= match_size {
        let selection = {
            let ctx = RoundContext::new(roster, state);
            match strategy.select_pair(&pool, &ctx, rng) {
                Some(selection) => selection,
                None => {
                    tracing::warn!(
                        "Round {}: search evaluated no candidates, taking {} players positionally",
                        round,
                        match_size
                    );
                    composed.fallbacks += 1;
                    PositionalStrategy::split(&pool, roster.players_per_team())
                }
            }
        };

        composed.evaluated += selection.evaluated;
        pool.retain(|p| !selection.team_a.contains(p) && !selection.team_b.contains(p));
        state.record_matchup(&selection.team_a, &selection.team_b);
        composed.matchups.push((selection.team_a, selection.team_b));
    }

    Ok(composed)
}
