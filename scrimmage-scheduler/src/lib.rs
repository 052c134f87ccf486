//! Scrimmage Scheduler - Fair round-robin team generation
//!
//! This crate turns a validated roster into a sequence of rounds:
//! - Linked groups seated first, always on the same team
//! - Sit-outs spread evenly, never twice in a row when avoidable
//! - Team splits searched to minimise repeated partnerships
//! - Seed sweeps for auditing fairness across many runs
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: RoundGenerator, generate_schedule (orchestration)
//! - Level 2: place_linked_groups, select_sitters, compose_teams (phases)
//! - Level 3: score_split, pairing strategies (steps)
//! - Level 4: utilities, configuration

mod composer;
mod config;
mod error;
mod generator;
mod linked;
mod scoring;
mod sitting_selector;
mod state;
mod strategy;
mod sweep;

pub use composer::{compose_teams, ComposedTeams};
pub use config::{GeneratorOptions, PenaltyWeights};
pub use error::{ScheduleError, ScheduleResult};
pub use generator::{
    generate_schedule, generate_schedule_with, CancellationToken, GeneratedSchedule,
    GenerationStats, RoundGenerator,
};
pub use linked::{place_linked_groups, LinkedPlacement};
pub use scoring::score_split;
pub use sitting_selector::{select_sitters, sitters_needed, SitterSelection};
pub use state::{RoundContext, ScheduleState};
pub use strategy::{PairSelection, PairingStrategy, PositionalStrategy, SamplingStrategy};
pub use sweep::{sweep_seeds, sweep_seeds_with_progress, SeedOutcome, SeedSweep};
