//! Roster - participants, linked groups and schedule configuration

use std::fmt;
use std::path::Path;

use anyhow::Context;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Dense index of a participant inside a [`Roster`]
pub type PlayerIdx = usize;

/// Opaque participant identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Participants who always share a team whenever they all play
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkedGroup {
    pub members: Vec<ParticipantId>,
}

impl LinkedGroup {
    pub fn new<I, P>(members: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        Self {
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Input to schedule generation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    pub participants: Vec<ParticipantId>,
    pub total_rounds: usize,
    pub players_per_team: usize,
    #[serde(default)]
    pub linked_groups: Vec<LinkedGroup>,
}

impl ScheduleConfig {
    /// Create a config with no linked groups
    pub fn new<I, P>(participants: I, total_rounds: usize, players_per_team: usize) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        Self {
            participants: participants.into_iter().map(Into::into).collect(),
            total_rounds,
            players_per_team,
            linked_groups: Vec::new(),
        }
    }

    /// Add a linked group
    pub fn with_linked_group<I, P>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        self.linked_groups.push(LinkedGroup::new(members));
        self
    }

    /// Players on the court for one matchup
    pub fn match_size(&self) -> usize {
        self.players_per_team * 2
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schedule config: {}", path.display()))?;
        let config: ScheduleConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse schedule config: {}", path.display()))?;
        Ok(config)
    }

    /// Reject configurations that would produce corrupted schedules
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players_per_team == 0 {
            return Err(ConfigError::ZeroPlayersPerTeam);
        }
        if self.total_rounds == 0 {
            return Err(ConfigError::ZeroRounds);
        }

        let mut seen: FxHashSet<&ParticipantId> = FxHashSet::default();
        for id in &self.participants {
            if !seen.insert(id) {
                return Err(ConfigError::DuplicateParticipant(id.clone()));
            }
        }

        let mut owner: FxHashMap<&ParticipantId, usize> = FxHashMap::default();
        for (group, linked) in self.linked_groups.iter().enumerate() {
            if linked.is_empty() {
                return Err(ConfigError::EmptyLinkedGroup { group });
            }
            if linked.len() > self.players_per_team {
                return Err(ConfigError::OversizedLinkedGroup {
                    group,
                    size: linked.len(),
                    players_per_team: self.players_per_team,
                });
            }
            for member in &linked.members {
                if !seen.contains(member) {
                    return Err(ConfigError::UnknownLinkedMember {
                        group,
                        participant: member.clone(),
                    });
                }
                if let Some(first) = owner.insert(member, group) {
                    return Err(ConfigError::OverlappingLinkedGroups {
                        participant: member.clone(),
                        first,
                        second: group,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Validated, index-based view of a [`ScheduleConfig`]
#[derive(Clone, Debug)]
pub struct Roster {
    ids: Vec<ParticipantId>,
    groups: Vec<Vec<PlayerIdx>>,
    group_of: Vec<Option<usize>>,
    players_per_team: usize,
}

impl Roster {
    /// Validate the config and intern its participants
    pub fn from_config(config: &ScheduleConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let index: FxHashMap<&ParticipantId, PlayerIdx> = config
            .participants
            .iter()
            .enumerate()
            .map(|(idx, id)| (id, idx))
            .collect();

        let mut group_of = vec![None; config.participants.len()];
        let mut groups = Vec::with_capacity(config.linked_groups.len());
        for (g, linked) in config.linked_groups.iter().enumerate() {
            // validate() guarantees every member is indexed
            let members: Vec<PlayerIdx> = linked
                .members
                .iter()
                .filter_map(|id| index.get(id).copied())
                .collect();
            for &member in &members {
                group_of[member] = Some(g);
            }
            groups.push(members);
        }

        Ok(Self {
            ids: config.participants.clone(),
            groups,
            group_of,
            players_per_team: config.players_per_team,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn players_per_team(&self) -> usize {
        self.players_per_team
    }

    pub fn match_size(&self) -> usize {
        self.players_per_team * 2
    }

    pub fn id(&self, player: PlayerIdx) -> &ParticipantId {
        &self.ids[player]
    }

    pub fn ids(&self) -> &[ParticipantId] {
        &self.ids
    }

    pub fn groups(&self) -> &[Vec<PlayerIdx>] {
        &self.groups
    }

    pub fn group(&self, group: usize) -> &[PlayerIdx] {
        &self.groups[group]
    }

    pub fn group_of(&self, player: PlayerIdx) -> Option<usize> {
        self.group_of[player]
    }

    /// Not a member of any linked group
    pub fn is_individual(&self, player: PlayerIdx) -> bool {
        self.group_of[player].is_none()
    }

    /// Both players belong to the same linked group
    pub fn same_group(&self, a: PlayerIdx, b: PlayerIdx) -> bool {
        match (self.group_of[a], self.group_of[b]) {
            (Some(ga), Some(gb)) => ga == gb,
            _ => false,
        }
    }

    /// Map indices back to participant ids
    pub fn resolve(&self, players: &[PlayerIdx]) -> Vec<ParticipantId> {
        players.iter().map(|&p| self.ids[p].clone()).collect()
    }
}
