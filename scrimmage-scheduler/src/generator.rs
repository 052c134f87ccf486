//! Round generation - run every phase once per round
//!
//! Level 1 - Orchestration

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use scrimmage_core::{Matchup, PlayerIdx, Roster, Round, ScheduleConfig};
use serde::Serialize;

use crate::composer::compose_teams;
use crate::config::GeneratorOptions;
use crate::error::{ScheduleError, ScheduleResult};
use crate::linked::place_linked_groups;
use crate::sitting_selector::select_sitters;
use crate::state::ScheduleState;
use crate::strategy::{PairingStrategy, SamplingStrategy};

/// Shared flag for stopping a generation between rounds
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Counters describing how a generation went
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStats {
    /// Seed the random source was built from
    pub seed: u64,
    pub rounds: usize,
    pub matchups: usize,
    /// Rounds emitted with no matchups at all
    pub under_resourced_rounds: usize,
    /// Linked group placements that failed (one per group per round)
    pub skipped_groups: usize,
    /// Team-pairs formed positionally because the search evaluated nothing
    pub composer_fallbacks: usize,
    /// Candidate splits scored
    pub candidates_evaluated: usize,
}

/// Rounds plus the statistics of the run that produced them
#[derive(Clone, Debug)]
pub struct GeneratedSchedule {
    pub rounds: Vec<Round>,
    pub stats: GenerationStats,
}

/// Produces a schedule one round at a time.
///
/// All fairness state is owned here and dies with the generator.
pub struct RoundGenerator<S = SamplingStrategy> {
    roster: Roster,
    total_rounds: usize,
    state: ScheduleState,
    strategy: S,
    rng: ChaCha8Rng,
    cancel: CancellationToken,
    completed: usize,
    stats: GenerationStats,
}

impl RoundGenerator<SamplingStrategy> {
    /// Validate `config` and prepare a generator with the default search
    pub fn new(config: &ScheduleConfig, options: GeneratorOptions) -> ScheduleResult<Self> {
        let seed = options.seed;
        Self::with_strategy(config, seed, SamplingStrategy::new(options))
    }
}

impl<S: PairingStrategy> RoundGenerator<S> {
    /// Validate `config` and prepare a generator with a custom pairing strategy
    pub fn with_strategy(
        config: &ScheduleConfig,
        seed: Option<u64>,
        strategy: S,
    ) -> ScheduleResult<Self> {
        let roster = Roster::from_config(config)?;
        let seed = seed.unwrap_or_else(rand::random);

        Ok(Self {
            state: ScheduleState::new(roster.len()),
            total_rounds: config.total_rounds,
            roster,
            strategy,
            rng: ChaCha8Rng::seed_from_u64(seed),
            cancel: CancellationToken::new(),
            completed: 0,
            stats: GenerationStats {
                seed,
                ..Default::default()
            },
        })
    }

    /// Check `token` before every round
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn seed(&self) -> u64 {
        self.stats.seed
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.completed >= self.total_rounds
    }

    /// Produce the next round, or None once every round has been emitted
    pub fn next_round(&mut self) -> ScheduleResult<Option<Round>> {
        if self.is_finished() {
            return Ok(None);
        }
        if self.cancel.is_cancelled() {
            return Err(ScheduleError::Cancelled {
                completed_rounds: self.completed,
            });
        }

        let round_number = self.completed + 1;
        let match_size = self.roster.match_size();

        let placement = place_linked_groups(&self.roster, &mut self.state, &mut self.rng);
        let selection = select_sitters(
            &placement.residual,
            &self.state.sitting,
            match_size,
            &mut self.rng,
        );
        let composed = compose_teams(
            selection.play_pool,
            round_number,
            &self.roster,
            &mut self.state,
            &self.strategy,
            &mut self.rng,
        )?;

        let mut sitters: Vec<PlayerIdx> = selection.sitters;
        sitters.extend_from_slice(&placement.stranded);
        sitters.sort_unstable();
        self.state.sitting.record_round(&sitters);

        let matchups: Vec<Matchup> = placement
            .matchups
            .iter()
            .chain(composed.matchups.iter())
            .map(|(team_a, team_b)| {
                Matchup::new(self.roster.resolve(team_a), self.roster.resolve(team_b))
            })
            .collect();

        if matchups.is_empty() && !self.roster.is_empty() {
            tracing::debug!(
                "Round {}: {} players available, fewer than {} needed for a match; everyone sits",
                round_number,
                sitters.len(),
                match_size
            );
            self.stats.under_resourced_rounds += 1;
        }

        self.stats.rounds += 1;
        self.stats.matchups += matchups.len();
        self.stats.skipped_groups += placement.skipped_groups.len();
        self.stats.composer_fallbacks += composed.fallbacks;
        self.stats.candidates_evaluated += composed.evaluated;
        self.completed = round_number;

        tracing::debug!(
            "Round {}: {} matchups, {} sitting out",
            round_number,
            matchups.len(),
            sitters.len()
        );

        Ok(Some(Round {
            round_number,
            matchups,
            sitting_out: self.roster.resolve(&sitters),
        }))
    }

    /// Generate every remaining round
    pub fn run(mut self) -> ScheduleResult<GeneratedSchedule> {
        let mut rounds = Vec::with_capacity(self.total_rounds - self.completed);
        while let Some(round) = self.next_round()? {
            rounds.push(round);
        }

        tracing::debug!(
            "Generated {} rounds for {} participants (seed {})",
            rounds.len(),
            self.roster.len(),
            self.stats.seed
        );
        if self.stats.composer_fallbacks > 0 {
            tracing::warn!(
                "{} team-pairs were formed without search; consider raising max_attempts",
                self.stats.composer_fallbacks
            );
        }

        Ok(GeneratedSchedule {
            rounds,
            stats: self.stats,
        })
    }
}

/// Generate a schedule with default options and a random seed
pub fn generate_schedule(config: &ScheduleConfig) -> ScheduleResult<Vec<Round>> {
    Ok(generate_schedule_with(config, GeneratorOptions::default())?.rounds)
}

/// Generate a schedule with explicit options
pub fn generate_schedule_with(
    config: &ScheduleConfig,
    options: GeneratorOptions,
) -> ScheduleResult<GeneratedSchedule> {
    let schedule = RoundGenerator::new(config, options)?.run()?;

    tracing::info!(
        "Generated {} rounds for {} participants (seed {}, {} matchups, {} under-resourced)",
        schedule.rounds.len(),
        config.participants.len(),
        schedule.stats.seed,
        schedule.stats.matchups,
        schedule.stats.under_resourced_rounds
    );
    Ok(schedule)
}
