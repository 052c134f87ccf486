//! Per-generation state threaded through every round
//!
//! Built fresh at the start of one generation and dropped after the last
//! round; nothing here is shared between generations.

use scrimmage_core::{PartnershipTracker, PlayerIdx, Roster, SittingTracker};

/// Trackers carried from round to round
#[derive(Clone, Debug)]
pub struct ScheduleState {
    pub teammates: PartnershipTracker,
    pub opponents: PartnershipTracker,
    pub sitting: SittingTracker,
}

impl ScheduleState {
    pub fn new(players: usize) -> Self {
        Self {
            teammates: PartnershipTracker::new(),
            opponents: PartnershipTracker::new(),
            sitting: SittingTracker::new(players),
        }
    }

    /// Record a formed matchup in both pair trackers
    pub fn record_matchup(&mut self, team_a: &[PlayerIdx], team_b: &[PlayerIdx]) {
        self.teammates.record_partnerships(team_a);
        self.teammates.record_partnerships(team_b);
        self.opponents.record_opposition(team_a, team_b);
    }
}

/// Read-only view used while scoring candidates within one round
#[derive(Clone, Copy, Debug)]
pub struct RoundContext<'a> {
    pub roster: &'a Roster,
    pub state: &'a ScheduleState,
    /// Lowest cumulative sit count across the roster at round start
    pub min_sits: u32,
    /// Highest cumulative sit count across the roster at round start
    pub max_sits: u32,
}

impl<'a> RoundContext<'a> {
    pub fn new(roster: &'a Roster, state: &'a ScheduleState) -> Self {
        Self {
            roster,
            state,
            min_sits: state.sitting.min_cumulative(),
            max_sits: state.sitting.max_cumulative(),
        }
    }

    pub fn players_per_team(&self) -> usize {
        self.roster.players_per_team()
    }
}
