//! Seed sweeps - generate the same configuration under many seeds in
//! parallel and summarise fairness across them

use rayon::prelude::*;
use scrimmage_core::{FairnessReport, ScheduleConfig};
use serde::Serialize;

use crate::config::GeneratorOptions;
use crate::error::ScheduleResult;
use crate::generator::RoundGenerator;

/// Fairness of a single seed
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedOutcome {
    pub seed: u64,
    pub report: FairnessReport,
}

/// Aggregate over every seed in a sweep
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSweep {
    pub outcomes: Vec<SeedOutcome>,
    /// Seeds whose generation returned an error
    pub failed: Vec<u64>,
    pub worst_sit_spread: usize,
    /// Seed that produced `worst_sit_spread`
    pub worst_seed: Option<u64>,
    pub total_consecutive_sit_outs: usize,
    pub mean_repeated_teammate_pairs: f64,
    /// Outcomes with a partition or cohesion violation
    pub structural_failures: usize,
}

impl SeedSweep {
    fn from_outcomes(mut outcomes: Vec<SeedOutcome>, failed: Vec<u64>) -> Self {
        outcomes.sort_by_key(|o| o.seed);

        // First seed wins ties so the result does not depend on thread timing
        let worst = outcomes
            .iter()
            .rev()
            .max_by_key(|o| o.report.sit_spread);
        let total_repeats: usize = outcomes.iter().map(|o| o.report.repeated_teammate_pairs).sum();

        Self {
            worst_sit_spread: worst.map_or(0, |o| o.report.sit_spread),
            worst_seed: worst.map(|o| o.seed),
            total_consecutive_sit_outs: outcomes.iter().map(|o| o.report.consecutive_sit_outs).sum(),
            mean_repeated_teammate_pairs: if outcomes.is_empty() {
                0.0
            } else {
                total_repeats as f64 / outcomes.len() as f64
            },
            structural_failures: outcomes
                .iter()
                .filter(|o| !o.report.is_structurally_valid())
                .count(),
            outcomes,
            failed,
        }
    }
}

/// Generate `config` once per seed in `start_seed..start_seed + count`
pub fn sweep_seeds(
    config: &ScheduleConfig,
    options: &GeneratorOptions,
    start_seed: u64,
    count: u64,
) -> ScheduleResult<SeedSweep> {
    sweep_seeds_with_progress(config, options, start_seed, count, |_| {})
}

/// Like [`sweep_seeds`], calling `on_done` with each seed as it finishes
pub fn sweep_seeds_with_progress<F>(
    config: &ScheduleConfig,
    options: &GeneratorOptions,
    start_seed: u64,
    count: u64,
    on_done: F,
) -> ScheduleResult<SeedSweep>
where
    F: Fn(u64) + Sync,
{
    // Bad configurations fail once instead of once per seed
    config.validate()?;

    let seeds: Vec<u64> = (0..count).map(|i| start_seed.wrapping_add(i)).collect();

    let results: Vec<(u64, Option<FairnessReport>)> = seeds
        .par_iter()
        .map(|&seed| {
            let options = options.clone().with_seed(seed);
            let report = match RoundGenerator::new(config, options).and_then(|g| g.run()) {
                Ok(schedule) => Some(FairnessReport::from_rounds(config, &schedule.rounds)),
                Err(e) => {
                    tracing::warn!("Seed {} failed: {}", seed, e);
                    None
                }
            };
            on_done(seed);
            (seed, report)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(results.len());
    let mut failed = Vec::new();
    for (seed, report) in results {
        match report {
            Some(report) => outcomes.push(SeedOutcome { seed, report }),
            None => failed.push(seed),
        }
    }

    let sweep = SeedSweep::from_outcomes(outcomes, failed);
    tracing::info!(
        "Swept {} seeds: worst sit spread {}, {} consecutive sit-outs, {} failed",
        count,
        sweep.worst_sit_spread,
        sweep.total_consecutive_sit_outs,
        sweep.failed.len()
    );
    Ok(sweep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("P{}", i)).collect()
    }

    #[test]
    fn test_sweep_covers_every_seed() {
        let config = ScheduleConfig::new(names(10), 5, 2);
        let sweep = sweep_seeds(&config, &GeneratorOptions::default(), 100, 8).unwrap();

        assert_eq!(sweep.outcomes.len(), 8);
        assert!(sweep.failed.is_empty());
        let seeds: Vec<u64> = sweep.outcomes.iter().map(|o| o.seed).collect();
        assert_eq!(seeds, (100..108).collect::<Vec<_>>());
        assert_eq!(sweep.structural_failures, 0);
        // 2 sitters per round over 5 rounds: 10 sits across 10 players
        assert_eq!(sweep.worst_sit_spread, 0);
        assert_eq!(sweep.total_consecutive_sit_outs, 0);
    }

    #[test]
    fn test_sweep_reports_progress() {
        let config = ScheduleConfig::new(names(6), 3, 1);
        let done = AtomicU64::new(0);

        sweep_seeds_with_progress(&config, &GeneratorOptions::default(), 0, 5, |_| {
            done.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        assert_eq!(done.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_sweep_rejects_invalid_config() {
        let config = ScheduleConfig::new(names(4), 3, 0);
        let result = sweep_seeds(&config, &GeneratorOptions::default(), 0, 3);
        assert!(matches!(result, Err(ScheduleError::Config(_))));
    }

    #[test]
    fn test_empty_sweep() {
        let config = ScheduleConfig::new(names(4), 1, 1);
        let sweep = sweep_seeds(&config, &GeneratorOptions::default(), 0, 0).unwrap();
        assert!(sweep.outcomes.is_empty());
        assert_eq!(sweep.worst_seed, None);
        assert_eq!(sweep.mean_repeated_teammate_pairs, 0.0);
    }
}
