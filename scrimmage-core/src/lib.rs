//! Scrimmage Core - Roster model and fairness bookkeeping
//!
//! This crate provides the building blocks for scrimmage scheduling:
//! - Participants, linked groups and schedule configuration
//! - Configuration validation
//! - Rounds and matchups (the generated output)
//! - Partnership and sitting-history trackers
//! - Fairness report over a finished schedule

pub mod error;
pub mod fairness;
pub mod partnership;
pub mod roster;
pub mod schedule;
pub mod shuffle;
pub mod sitting;

// Re-exports for convenient access
pub use error::ConfigError;
pub use fairness::{FairnessReport, ParticipantFairness};
pub use partnership::{PartnershipKey, PartnershipTracker};
pub use roster::{LinkedGroup, ParticipantId, PlayerIdx, Roster, ScheduleConfig};
pub use schedule::{Matchup, Round};
pub use shuffle::{shuffle_in_place, shuffled};
pub use sitting::SittingTracker;
