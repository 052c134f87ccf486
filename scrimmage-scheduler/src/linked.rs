//! Linked group placement - seat "always together" groups before anyone else
//!
//! Level 2 - Phase run at the start of every round
//!
//! Groups are first packed onto teams by a bounded depth-first search, then
//! the open seats are filled from individual players. A group only sits out
//! when no packing can seat it alongside the groups ahead of it.

use std::cmp::Reverse;

use rand::Rng;
use scrimmage_core::{shuffle_in_place, shuffled, PlayerIdx, Roster, SittingTracker};

use crate::state::ScheduleState;

/// Search nodes allowed per packing attempt
const PACKING_BUDGET: usize = 20_000;

/// Outcome of seating linked groups for one round
#[derive(Clone, Debug, Default)]
pub struct LinkedPlacement {
    /// Complete matchups built around linked groups
    pub matchups: Vec<(Vec<PlayerIdx>, Vec<PlayerIdx>)>,
    /// Individual players still unused this round
    pub residual: Vec<PlayerIdx>,
    /// Groups that could not be seated this round
    pub skipped_groups: Vec<usize>,
    /// Members of skipped groups; they sit out
    pub stranded: Vec<PlayerIdx>,
}

/// Seat as many linked groups as possible into complete matchups.
///
/// Groups are shuffled, then groups with a member who sat out last round
/// move to the front. Each group gets its own team while the round has
/// team slots to spare; otherwise groups share a team. Group teams face
/// a team of individuals, or each other when there are not enough matches
/// to go round. If no packing exists, the lowest-priority group that
/// unblocks the rest is skipped and its members sit out.
///
/// Open seats go to individuals who played last round before those who
/// sat. Enough of those fresh players stay in the residual to cover this
/// round's remaining sit-outs. Partnerships of every placed matchup are
/// recorded in `state`.
pub fn place_linked_groups<R: Rng + ?Sized>(
    roster: &Roster,
    state: &mut ScheduleState,
    rng: &mut R,
) -> LinkedPlacement {
    let individuals: Vec<PlayerIdx> = (0..roster.len())
        .filter(|&p| roster.is_individual(p))
        .collect();

    if roster.groups().is_empty() {
        return LinkedPlacement {
            residual: individuals,
            ..Default::default()
        };
    }

    let order = order_groups(roster, &state.sitting, rng);
    let packing = pack_groups(roster, &order, individuals.len());

    let capacity = roster.players_per_team();
    let mut teams: Vec<Vec<PlayerIdx>> = packing
        .teams
        .iter()
        .map(|groups| {
            groups
                .iter()
                .flat_map(|&g| roster.group(g).iter().copied())
                .collect()
        })
        .collect();
    shuffle_in_place(&mut teams, rng);

    let grouped: usize = teams.iter().map(Vec::len).sum();
    let matches = (individuals.len() + grouped) / roster.match_size();
    let group_matchups = teams.len().min(matches);
    let paired_teams = 2 * (teams.len() - group_matchups);

    let seats_for_individuals = 2 * group_matchups * capacity - grouped;
    let residual_len = individuals.len() - seats_for_individuals;
    let residual_sitters = residual_len % roster.match_size();

    let mut fillers = order_fillers(individuals, &state.sitting, residual_sitters, rng).into_iter();
    let mut placement = LinkedPlacement::default();

    for team in &mut teams {
        let open = capacity - team.len();
        team.extend(fillers.by_ref().take(open));
    }

    let mut teams = teams.into_iter();
    for _ in 0..paired_teams / 2 {
        if let (Some(team_a), Some(team_b)) = (teams.next(), teams.next()) {
            placement.matchups.push((team_a, team_b));
        }
    }
    for team_a in teams {
        let team_b: Vec<PlayerIdx> = fillers.by_ref().take(capacity).collect();
        placement.matchups.push((team_a, team_b));
    }

    for (team_a, team_b) in &placement.matchups {
        state.record_matchup(team_a, team_b);
    }

    for &group in &packing.stranded {
        tracing::warn!(
            "Linked group {} ({} players) could not be seated this round",
            group,
            roster.group(group).len()
        );
        placement.skipped_groups.push(group);
    }
    placement.skipped_groups.sort_unstable();
    for &group in &placement.skipped_groups {
        placement.stranded.extend_from_slice(roster.group(group));
    }

    placement.residual = fillers.collect();
    placement
}

/// Individuals in the order they take open seats.
///
/// Players who did not sit out last round come first, those owed the most
/// games ahead. The `reserve` fresh players with the fewest sit-outs are
/// held back to the very end so the sitter selector still has someone
/// without a streak to bench.
fn order_fillers<R: Rng + ?Sized>(
    mut players: Vec<PlayerIdx>,
    sitting: &SittingTracker,
    reserve: usize,
    rng: &mut R,
) -> Vec<PlayerIdx> {
    shuffle_in_place(&mut players, rng);
    players.sort_by_key(|&p| (sitting.sat_out_last_round(p), Reverse(sitting.cumulative_count(p))));

    let fresh = players
        .iter()
        .take_while(|&&p| !sitting.sat_out_last_round(p))
        .count();
    let held = reserve.min(fresh);
    let held_back: Vec<PlayerIdx> = players.drain(fresh - held..fresh).collect();
    players.extend(held_back);
    players
}

/// Shuffled group order, groups holding a previous sitter first
fn order_groups<R: Rng + ?Sized>(roster: &Roster, sitting: &SittingTracker, rng: &mut R) -> Vec<usize> {
    let all: Vec<usize> = (0..roster.groups().len()).collect();
    let mut order = shuffled(&all, rng);
    order.sort_by_key(|&g| {
        !roster
            .group(g)
            .iter()
            .any(|&p| sitting.sat_out_last_round(p))
    });
    order
}

/// Groups per team for this round, plus the groups left out
#[derive(Debug)]
struct Packing {
    teams: Vec<Vec<usize>>,
    stranded: Vec<usize>,
}

/// Pack groups in priority `order`, dropping groups until the rest fit
fn pack_groups(roster: &Roster, order: &[usize], individuals: usize) -> Packing {
    let mut seated = order.to_vec();
    let mut stranded = Vec::new();

    loop {
        if let Some(teams) = pack_into_teams(roster, &seated, individuals) {
            return Packing { teams, stranded };
        }

        // Smallest group whose removal unblocks the rest, lowest priority
        // on ties; otherwise the lowest-priority group
        let mut by_size: Vec<usize> = seated.iter().rev().copied().collect();
        by_size.sort_by_key(|&g| roster.group(g).len());
        let unblocking = by_size.iter().copied().find(|&candidate| {
            let rest: Vec<usize> = seated.iter().copied().filter(|&g| g != candidate).collect();
            pack_into_teams(roster, &rest, individuals).is_some()
        });

        let Some(dropped) = unblocking.or_else(|| seated.last().copied()) else {
            return Packing {
                teams: Vec::new(),
                stranded,
            };
        };
        seated.retain(|&g| g != dropped);
        stranded.push(dropped);
    }
}

/// Assign every group in `groups` to a team, or None if they cannot all
/// play this round
fn pack_into_teams(roster: &Roster, groups: &[usize], individuals: usize) -> Option<Vec<Vec<usize>>> {
    let members: usize = groups.iter().map(|&g| roster.group(g).len()).sum();
    let max_teams = 2 * ((individuals + members) / roster.match_size());
    if members > max_teams * roster.players_per_team() {
        return None;
    }

    // Largest first; the sort is stable so priority order breaks ties
    let mut by_size = groups.to_vec();
    by_size.sort_by_key(|&g| Reverse(roster.group(g).len()));

    let mut search = TeamSearch {
        roster,
        groups: &by_size,
        max_teams,
        teams: Vec::new(),
        loads: Vec::new(),
        budget: PACKING_BUDGET,
    };
    search.place(0, members).then_some(search.teams)
}

/// Depth-first bin packing; a fresh team is tried before sharing one
struct TeamSearch<'a> {
    roster: &'a Roster,
    groups: &'a [usize],
    max_teams: usize,
    teams: Vec<Vec<usize>>,
    loads: Vec<usize>,
    budget: usize,
}

impl TeamSearch<'_> {
    fn place(&mut self, next: usize, remaining: usize) -> bool {
        let Some(&group) = self.groups.get(next) else {
            return true;
        };
        if self.budget == 0 {
            return false;
        }
        self.budget -= 1;

        let capacity = self.roster.players_per_team();
        let free = (self.max_teams - self.teams.len()) * capacity
            + self.loads.iter().map(|load| capacity - load).sum::<usize>();
        if remaining > free {
            return false;
        }

        let size = self.roster.group(group).len();
        if self.teams.len() < self.max_teams {
            self.teams.push(vec![group]);
            self.loads.push(size);
            if self.place(next + 1, remaining - size) {
                return true;
            }
            self.teams.pop();
            self.loads.pop();
        }

        for team in 0..self.teams.len() {
            if self.loads[team] + size > capacity {
                continue;
            }
            self.teams[team].push(group);
            self.loads[team] += size;
            if self.place(next + 1, remaining - size) {
                return true;
            }
            self.teams[team].pop();
            self.loads[team] -= size;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use scrimmage_core::ScheduleConfig;

    fn roster(config: ScheduleConfig) -> Roster {
        Roster::from_config(&config).unwrap()
    }

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("P{}", i)).collect()
    }

    fn team_of(placement: &LinkedPlacement, player: PlayerIdx) -> Option<&Vec<PlayerIdx>> {
        placement
            .matchups
            .iter()
            .flat_map(|(a, b)| [a, b])
            .find(|team| team.contains(&player))
    }

    #[test]
    fn test_no_groups_leaves_everyone_residual() {
        let roster = roster(ScheduleConfig::new(names(6), 1, 2));
        let mut state = ScheduleState::new(6);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let placement = place_linked_groups(&roster, &mut state, &mut rng);
        assert!(placement.matchups.is_empty());
        assert_eq!(placement.residual, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_partial_group_is_topped_up() {
        let config = ScheduleConfig::new(names(9), 1, 3).with_linked_group(["P0", "P1"]);
        let roster = roster(config);
        let mut state = ScheduleState::new(9);
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let placement = place_linked_groups(&roster, &mut state, &mut rng);
        assert_eq!(placement.matchups.len(), 1);

        let (team_a, team_b) = &placement.matchups[0];
        assert_eq!(team_a.len(), 3);
        assert_eq!(team_b.len(), 3);
        assert!(team_a.contains(&0) && team_a.contains(&1));
        assert_eq!(placement.residual.len(), 3);
        assert_eq!(state.teammates.usage_count(0, 1), 1);
    }

    #[test]
    fn test_fillers_prefer_players_who_just_played() {
        let config = ScheduleConfig::new(names(8), 1, 2).with_linked_group(["P0", "P1"]);
        let roster = roster(config);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..20 {
            let mut state = ScheduleState::new(8);
            state.sitting.record_round(&[4, 5]);

            let placement = place_linked_groups(&roster, &mut state, &mut rng);
            let (_, opponents) = &placement.matchups[0];
            assert!(!opponents.contains(&4) && !opponents.contains(&5));
            assert!(placement.residual.contains(&4) && placement.residual.contains(&5));
            assert_eq!(placement.residual.len(), 4);
        }
    }

    #[test]
    fn test_fresh_players_held_back_for_residual_sit_outs() {
        // Two of the four individuals must sit; benching the two who just
        // sat would give them a second sit-out in a row
        let config = ScheduleConfig::new(names(6), 1, 2).with_linked_group(["P0", "P1"]);
        let roster = roster(config);
        let mut state = ScheduleState::new(6);
        state.sitting.record_round(&[4, 5]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let placement = place_linked_groups(&roster, &mut state, &mut rng);
        let (_, opponents) = &placement.matchups[0];
        let mut opponents = opponents.clone();
        opponents.sort_unstable();
        assert_eq!(opponents, vec![4, 5]);

        let mut residual = placement.residual.clone();
        residual.sort_unstable();
        assert_eq!(residual, vec![2, 3]);
    }

    #[test]
    fn test_groups_only_roster_plays_group_against_group() {
        let config = ScheduleConfig::new(["A", "B", "C", "D"], 1, 2)
            .with_linked_group(["A", "B"])
            .with_linked_group(["C", "D"]);
        let roster = roster(config);
        let mut state = ScheduleState::new(4);
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let placement = place_linked_groups(&roster, &mut state, &mut rng);
        assert_eq!(placement.matchups.len(), 1);
        assert!(placement.skipped_groups.is_empty());
        assert_eq!(team_of(&placement, 0), team_of(&placement, 1));
        assert_eq!(team_of(&placement, 2), team_of(&placement, 3));
        assert_ne!(team_of(&placement, 0), team_of(&placement, 2));
    }

    #[test]
    fn test_unseatable_groups_are_stranded() {
        let config = ScheduleConfig::new(["A", "B", "C", "D", "E"], 1, 3)
            .with_linked_group(["A", "B"])
            .with_linked_group(["C", "D"]);
        let roster = roster(config);
        let mut state = ScheduleState::new(5);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let placement = place_linked_groups(&roster, &mut state, &mut rng);
        assert!(placement.matchups.is_empty());
        assert_eq!(placement.skipped_groups, vec![0, 1]);
        assert_eq!(placement.stranded, vec![0, 1, 2, 3]);
        assert_eq!(placement.residual, vec![4]);
        assert_eq!(state.teammates.distinct_pairs(), 0, "failed plans record nothing");
    }

    #[test]
    fn test_every_group_seated_when_room() {
        let config = ScheduleConfig::new(names(12), 1, 2)
            .with_linked_group(["P0", "P1"])
            .with_linked_group(["P2", "P3"])
            .with_linked_group(["P4"]);
        let roster = roster(config);
        let mut rng = ChaCha8Rng::seed_from_u64(6);

        for _ in 0..20 {
            let mut state = ScheduleState::new(12);
            let placement = place_linked_groups(&roster, &mut state, &mut rng);
            assert!(placement.skipped_groups.is_empty());
            assert_eq!(team_of(&placement, 0), team_of(&placement, 1));
            assert_eq!(team_of(&placement, 2), team_of(&placement, 3));
            assert!(team_of(&placement, 4).is_some());

            let seated: usize = placement.matchups.len() * 4;
            assert_eq!(seated + placement.residual.len(), 12);
        }
    }

    #[test]
    fn test_pairs_with_few_individuals_all_seated() {
        // AB+I vs CD+J and EF+K vs GH+L is the only shape that seats everyone
        let config = ScheduleConfig::new(
            ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L"],
            1,
            3,
        )
        .with_linked_group(["A", "B"])
        .with_linked_group(["C", "D"])
        .with_linked_group(["E", "F"])
        .with_linked_group(["G", "H"]);
        let roster = roster(config);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..20 {
            let mut state = ScheduleState::new(12);
            let placement = place_linked_groups(&roster, &mut state, &mut rng);

            assert!(placement.skipped_groups.is_empty());
            assert!(placement.stranded.is_empty());
            assert!(placement.residual.is_empty());
            assert_eq!(placement.matchups.len(), 2);
            for pair in [(0, 1), (2, 3), (4, 5), (6, 7)] {
                assert_eq!(team_of(&placement, pair.0), team_of(&placement, pair.1));
            }
            for individual in 8..12 {
                assert!(team_of(&placement, individual).is_some());
            }
        }
    }

    #[test]
    fn test_smallest_lowest_priority_group_is_skipped() {
        // Seven grouped players cannot share two teams of three; dropping
        // one pair seats the rest
        let config = ScheduleConfig::new(["A", "B", "C", "D", "E", "F", "G", "H"], 1, 3)
            .with_linked_group(["A", "B", "C"])
            .with_linked_group(["D", "E"])
            .with_linked_group(["F", "G"]);
        let roster = roster(config);
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        for _ in 0..10 {
            let mut state = ScheduleState::new(8);
            state.sitting.record_round(&[5, 6]);

            let placement = place_linked_groups(&roster, &mut state, &mut rng);
            assert_eq!(placement.skipped_groups, vec![1]);
            assert_eq!(placement.stranded, vec![3, 4]);
            assert_eq!(placement.matchups.len(), 1);
            assert!(placement.residual.is_empty());
            assert_eq!(team_of(&placement, 5), team_of(&placement, 6));
            assert_ne!(team_of(&placement, 0), team_of(&placement, 5));
        }
    }

    #[test]
    fn test_groups_get_own_teams_when_slots_allow() {
        let config = ScheduleConfig::new(names(16), 1, 4)
            .with_linked_group(["P0", "P1", "P2"])
            .with_linked_group(["P3"]);
        let roster = roster(config);
        let mut state = ScheduleState::new(16);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let placement = place_linked_groups(&roster, &mut state, &mut rng);
        assert_eq!(placement.matchups.len(), 2);
        assert_ne!(team_of(&placement, 0), team_of(&placement, 3));
        assert_eq!(state.teammates.usage_count(0, 3), 0);
    }
}
