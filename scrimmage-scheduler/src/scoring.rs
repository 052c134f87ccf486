//! Split scoring - penalty for one candidate pair of teams
//!
//! Level 3 - Steps. Lower is better; negative scores are possible because
//! of the playing-fairness bonuses.

use scrimmage_core::PlayerIdx;

use crate::config::PenaltyWeights;
use crate::state::RoundContext;

/// Score a candidate split.
///
/// `excluded` are pool members left out of this particular two-team
/// grouping.
pub fn score_split(
    team_a: &[PlayerIdx],
    team_b: &[PlayerIdx],
    excluded: &[PlayerIdx],
    ctx: &RoundContext<'_>,
    weights: &PenaltyWeights,
) -> i64 {
    partnership_cost(team_a, ctx, weights)
        + partnership_cost(team_b, ctx, weights)
        + opponent_cost(team_a, team_b, ctx, weights)
        + exclusion_cost(excluded, ctx, weights)
        - inclusion_bonus(team_a, ctx, weights)
        - inclusion_bonus(team_b, ctx, weights)
}

/// usage² × weight for every teammate pair outside a linked group
fn partnership_cost(team: &[PlayerIdx], ctx: &RoundContext<'_>, weights: &PenaltyWeights) -> i64 {
    let mut cost = 0;
    for (i, &a) in team.iter().enumerate() {
        for &b in &team[i + 1..] {
            if ctx.roster.same_group(a, b) {
                continue;
            }
            let usage = ctx.state.teammates.usage_count(a, b) as i64;
            cost += usage * usage * weights.partnership;
        }
    }
    cost
}

fn opponent_cost(
    team_a: &[PlayerIdx],
    team_b: &[PlayerIdx],
    ctx: &RoundContext<'_>,
    weights: &PenaltyWeights,
) -> i64 {
    let mut cost = 0;
    for &a in team_a {
        for &b in team_b {
            let usage = ctx.state.opponents.usage_count(a, b) as i64;
            cost += usage * usage * weights.opponent;
        }
    }
    cost
}

/// Penalise leaving out players who most need to play
fn exclusion_cost(excluded: &[PlayerIdx], ctx: &RoundContext<'_>, weights: &PenaltyWeights) -> i64 {
    let sitting = &ctx.state.sitting;
    excluded
        .iter()
        .map(|&p| {
            let mut cost = 0;
            if sitting.sat_out_last_round(p) {
                cost += weights.excluded_sat_last_round;
            }
            if sitting.cumulative_count(p) < ctx.max_sits {
                cost += weights.excluded_below_max;
            }
            let streak = sitting.streak(p) as i64;
            cost + streak * streak * weights.excluded_streak
        })
        .sum()
}

/// Largest applicable discount per included player
fn inclusion_bonus(team: &[PlayerIdx], ctx: &RoundContext<'_>, weights: &PenaltyWeights) -> i64 {
    let sitting = &ctx.state.sitting;
    team.iter()
        .map(|&p| {
            let sits = sitting.cumulative_count(p);
            if sitting.sat_out_last_round(p) {
                weights.bonus_sat_last_round
            } else if sits == ctx.max_sits && ctx.max_sits > ctx.min_sits {
                weights.bonus_at_max
            } else if sits > ctx.min_sits {
                weights.bonus_above_min
            } else {
                0
            }
        })
        .sum()
}
