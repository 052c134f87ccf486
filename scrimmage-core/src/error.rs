//! Configuration errors

use crate::roster::ParticipantId;

/// A schedule configuration that cannot be generated from.
///
/// Raised before any round is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("players per team must be at least 1")]
    ZeroPlayersPerTeam,

    #[error("total rounds must be at least 1")]
    ZeroRounds,

    #[error("participant {0} is listed more than once")]
    DuplicateParticipant(ParticipantId),

    #[error("linked group {group} has no members")]
    EmptyLinkedGroup { group: usize },

    #[error("linked group {group} has {size} members but teams only have {players_per_team} seats")]
    OversizedLinkedGroup {
        group: usize,
        size: usize,
        players_per_team: usize,
    },

    #[error("linked group {group} names {participant}, who is not on the roster")]
    UnknownLinkedMember {
        group: usize,
        participant: ParticipantId,
    },

    #[error("participant {participant} appears in linked groups {first} and {second}")]
    OverlappingLinkedGroups {
        participant: ParticipantId,
        first: usize,
        second: usize,
    },
}
