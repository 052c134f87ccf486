//! Analyze command - sweep many seeds and report fairness
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_sweep(), report_sweep()
//! - Level 3: print_text_summary(), print_json_summary()

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use scrimmage_core::ScheduleConfig;
use scrimmage_scheduler::{sweep_seeds_with_progress, GeneratorOptions, SeedSweep};

use crate::generate::load_config;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Schedule config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,

    /// Number of seeds to generate
    #[arg(long, default_value = "100")]
    pub seeds: u64,

    /// First seed of the sweep (defaults to --seed, then 0)
    #[arg(long)]
    pub start_seed: Option<u64>,

    /// Candidate splits evaluated per team-pair
    #[arg(long, default_value = "100")]
    pub max_attempts: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run analyze command
///
/// 1. Load the config
/// 2. Generate once per seed in parallel
/// 3. Report aggregates
pub fn run(args: AnalyzeArgs, seed: Option<u64>) -> Result<()> {
    let config = load_config(&args.config)?;
    let start_seed = args.start_seed.or(seed).unwrap_or(0);

    tracing::info!(
        "Sweeping seeds {}..{} for {} participants",
        start_seed,
        start_seed.wrapping_add(args.seeds),
        config.participants.len()
    );

    let sweep = run_sweep(&config, &args, start_seed)?;
    report_sweep(&sweep, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn run_sweep(config: &ScheduleConfig, args: &AnalyzeArgs, start_seed: u64) -> Result<SeedSweep> {
    let options = GeneratorOptions::default().with_max_attempts(args.max_attempts);

    let progress = ProgressBar::new(args.seeds);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} seeds")
            .context("Invalid progress template")?,
    );

    let sweep = sweep_seeds_with_progress(config, &options, start_seed, args.seeds, |_| {
        progress.inc(1)
    })
    .context("Seed sweep failed")?;

    progress.finish_and_clear();
    Ok(sweep)
}

fn report_sweep(sweep: &SeedSweep, json: bool) -> Result<()> {
    if json {
        print_json_summary(sweep)
    } else {
        print_text_summary(sweep);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn print_json_summary(sweep: &SeedSweep) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(sweep)?);
    Ok(())
}

fn print_text_summary(sweep: &SeedSweep) {
    let total = sweep.outcomes.len() + sweep.failed.len();

    println!("\n=== Fairness Sweep ===");
    println!("Seeds run:                    {}", total);
    println!("Failed:                       {}", sweep.failed.len());
    println!("Structural failures:          {}", sweep.structural_failures);
    match sweep.worst_seed {
        Some(seed) => println!(
            "Worst sit-out spread:         {} (seed {})",
            sweep.worst_sit_spread, seed
        ),
        None => println!("Worst sit-out spread:         -"),
    }
    println!(
        "Consecutive sit-outs (total): {}",
        sweep.total_consecutive_sit_outs
    );
    println!(
        "Repeated teammate pairs:      {:.2} per schedule",
        sweep.mean_repeated_teammate_pairs
    );

    if !sweep.failed.is_empty() {
        println!("\nFailed seeds: {:?}", sweep.failed);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_sweep_counts_seeds() {
        let config = ScheduleConfig::new(["A", "B", "C", "D", "E", "F"], 4, 1);
        let args = AnalyzeArgs {
            config: PathBuf::from("unused.json"),
            seeds: 6,
            start_seed: None,
            max_attempts: 100,
            json: false,
        };

        let sweep = run_sweep(&config, &args, 50).unwrap();
        assert_eq!(sweep.outcomes.len(), 6);
        assert_eq!(sweep.outcomes[0].seed, 50);
        assert_eq!(sweep.structural_failures, 0);
    }
}
