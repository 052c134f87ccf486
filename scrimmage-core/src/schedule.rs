//! Schedule output - rounds and matchups

use serde::{Deserialize, Serialize};

use crate::roster::ParticipantId;

/// Two teams facing each other
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    pub team1: Vec<ParticipantId>,
    pub team2: Vec<ParticipantId>,
}

impl Matchup {
    pub fn new(team1: Vec<ParticipantId>, team2: Vec<ParticipantId>) -> Self {
        Self { team1, team2 }
    }

    /// Everyone on court, team1 first
    pub fn players(&self) -> impl Iterator<Item = &ParticipantId> {
        self.team1.iter().chain(self.team2.iter())
    }

    /// Check whether both players are on the same team
    pub fn are_teammates(&self, a: &ParticipantId, b: &ParticipantId) -> bool {
        let on = |team: &[ParticipantId]| team.contains(a) && team.contains(b);
        on(&self.team1) || on(&self.team2)
    }
}

/// One round of the scrimmage
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    /// 1-based
    pub round_number: usize,
    pub matchups: Vec<Matchup>,
    pub sitting_out: Vec<ParticipantId>,
}

impl Round {
    /// Everyone assigned to a team this round
    pub fn playing(&self) -> impl Iterator<Item = &ParticipantId> {
        self.matchups.iter().flat_map(Matchup::players)
    }

    pub fn is_sitting_out(&self, id: &ParticipantId) -> bool {
        self.sitting_out.contains(id)
    }

    pub fn is_playing(&self, id: &ParticipantId) -> bool {
        self.playing().any(|p| p == id)
    }

    /// The matchup a participant plays in, if any
    pub fn matchup_for(&self, id: &ParticipantId) -> Option<&Matchup> {
        self.matchups.iter().find(|m| m.players().any(|p| p == id))
    }
}
