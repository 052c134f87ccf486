//! Fairness report - audit a finished schedule
//!
//! Recomputes sit-out and partnership statistics from the emitted rounds
//! alone, so it can check any schedule regardless of how it was produced.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::partnership::PartnershipTracker;
use crate::roster::{ParticipantId, PlayerIdx, ScheduleConfig};
use crate::schedule::Round;

/// Per-participant totals
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantFairness {
    pub participant: ParticipantId,
    pub rounds_played: usize,
    pub sit_outs: usize,
    /// Longest run of back-to-back sit-outs
    pub longest_sit_streak: usize,
}

/// Aggregate fairness of a schedule
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FairnessReport {
    pub participants: Vec<ParticipantFairness>,
    /// Max sit-outs minus min sit-outs
    pub sit_spread: usize,
    /// (round, participant) pairs where the participant also sat the round before
    pub consecutive_sit_outs: usize,
    /// Distinct teammate pairs used more than once
    pub repeated_teammate_pairs: usize,
    pub max_teammate_usage: u32,
    /// Distinct opponent pairs faced more than once
    pub repeated_opponent_pairs: usize,
    /// Rounds where a fully-playing linked group was split up
    pub cohesion_violations: usize,
    /// Slots where a participant was missing, unknown or listed twice
    pub partition_violations: usize,
}

impl FairnessReport {
    /// Audit `rounds` against the roster in `config`
    pub fn from_rounds(config: &ScheduleConfig, rounds: &[Round]) -> Self {
        let index: FxHashMap<&ParticipantId, PlayerIdx> = config
            .participants
            .iter()
            .enumerate()
            .map(|(idx, id)| (id, idx))
            .collect();
        let n = config.participants.len();

        let mut played = vec![0usize; n];
        let mut sat = vec![0usize; n];
        let mut streak = vec![0usize; n];
        let mut longest = vec![0usize; n];
        let mut consecutive_sit_outs = 0;
        let mut partition_violations = 0;
        let mut cohesion_violations = 0;
        let mut teammates = PartnershipTracker::new();
        let mut opponents = PartnershipTracker::new();

        for round in rounds {
            let mut seen = vec![0usize; n];
            let mut team_of: Vec<Option<(usize, u8)>> = vec![None; n];

            for (m, matchup) in round.matchups.iter().enumerate() {
                let team1 = resolve_known(&index, &matchup.team1, &mut partition_violations);
                let team2 = resolve_known(&index, &matchup.team2, &mut partition_violations);
                for &p in &team1 {
                    seen[p] += 1;
                    played[p] += 1;
                    team_of[p] = Some((m, 1));
                }
                for &p in &team2 {
                    seen[p] += 1;
                    played[p] += 1;
                    team_of[p] = Some((m, 2));
                }
                teammates.record_partnerships(&team1);
                teammates.record_partnerships(&team2);
                opponents.record_opposition(&team1, &team2);
            }

            let sitters = resolve_known(&index, &round.sitting_out, &mut partition_violations);
            let mut sat_this_round = vec![false; n];
            for &p in &sitters {
                seen[p] += 1;
                sat_this_round[p] = true;
            }

            partition_violations += seen.iter().filter(|&&count| count != 1).count();

            for p in 0..n {
                if sat_this_round[p] {
                    sat[p] += 1;
                    if streak[p] > 0 {
                        consecutive_sit_outs += 1;
                    }
                    streak[p] += 1;
                    longest[p] = longest[p].max(streak[p]);
                } else {
                    streak[p] = 0;
                }
            }

            for group in &config.linked_groups {
                let members: Vec<Option<(usize, u8)>> = group
                    .members
                    .iter()
                    .filter_map(|id| index.get(id))
                    .map(|&p| team_of[p])
                    .collect();
                let all_playing = members.iter().all(Option::is_some);
                if all_playing && members.windows(2).any(|w| w[0] != w[1]) {
                    cohesion_violations += 1;
                }
            }
        }

        let participants: Vec<ParticipantFairness> = config
            .participants
            .iter()
            .enumerate()
            .map(|(p, id)| ParticipantFairness {
                participant: id.clone(),
                rounds_played: played[p],
                sit_outs: sat[p],
                longest_sit_streak: longest[p],
            })
            .collect();

        let sit_spread = match (sat.iter().max(), sat.iter().min()) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        };

        Self {
            participants,
            sit_spread,
            consecutive_sit_outs,
            repeated_teammate_pairs: teammates.repeated_pairs(),
            max_teammate_usage: teammates.max_usage(),
            repeated_opponent_pairs: opponents.repeated_pairs(),
            cohesion_violations,
            partition_violations,
        }
    }

    /// Totals for one participant
    pub fn participant(&self, id: &ParticipantId) -> Option<&ParticipantFairness> {
        self.participants.iter().find(|p| &p.participant == id)
    }

    /// Every round was a clean partition with linked groups kept together
    pub fn is_structurally_valid(&self) -> bool {
        self.partition_violations == 0 && self.cohesion_violations == 0
    }
}

/// Map ids to indices, counting unknown ids as violations
fn resolve_known(
    index: &FxHashMap<&ParticipantId, PlayerIdx>,
    ids: &[ParticipantId],
    violations: &mut usize,
) -> Vec<PlayerIdx> {
    ids.iter()
        .filter_map(|id| {
            let found = index.get(id).copied();
            if found.is_none() {
                *violations += 1;
            }
            found
        })
        .collect()
}
