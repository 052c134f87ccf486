//! Generate command - build one schedule from a config file
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_config(), generate(), render_output(), write_output()
//! - Level 3: render_text(), render_json()
//! - Level 4: formatting utilities

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use scrimmage_core::{FairnessReport, Matchup, ParticipantId, Round, ScheduleConfig};
use scrimmage_scheduler::{generate_schedule_with, GeneratedSchedule, GenerationStats, GeneratorOptions};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct GenerateArgs {
    /// Schedule config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,

    /// Output the schedule as JSON
    #[arg(long)]
    pub json: bool,

    /// Write output to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Candidate splits evaluated per team-pair
    #[arg(long, default_value = "100")]
    pub max_attempts: usize,
}

/// JSON shape of a generated schedule
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    generated_at: DateTime<Utc>,
    seed: u64,
    config: &'a ScheduleConfig,
    rounds: &'a [Round],
    stats: &'a GenerationStats,
    fairness: &'a FairnessReport,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run generate command
///
/// 1. Load and validate the config
/// 2. Generate every round
/// 3. Render as text or JSON and write it out
pub fn run(args: GenerateArgs, seed: Option<u64>) -> Result<()> {
    let config = load_config(&args.config)?;

    tracing::info!(
        "Scheduling {} participants over {} rounds ({} per team, {} linked groups)",
        config.participants.len(),
        config.total_rounds,
        config.players_per_team,
        config.linked_groups.len()
    );

    let schedule = generate(&config, seed, args.max_attempts)?;
    let report = FairnessReport::from_rounds(&config, &schedule.rounds);

    let rendered = render_output(&config, &schedule, &report, args.json)?;
    write_output(&rendered, args.output.as_deref())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load a config file and reject it early if it cannot be scheduled
pub fn load_config(path: &Path) -> Result<ScheduleConfig> {
    let config = ScheduleConfig::load(path)?;
    config
        .validate()
        .with_context(|| format!("Invalid schedule config: {}", path.display()))?;
    Ok(config)
}

fn generate(config: &ScheduleConfig, seed: Option<u64>, max_attempts: usize) -> Result<GeneratedSchedule> {
    let mut options = GeneratorOptions::default().with_max_attempts(max_attempts);
    options.seed = seed;

    generate_schedule_with(config, options).context("Schedule generation failed")
}

fn render_output(
    config: &ScheduleConfig,
    schedule: &GeneratedSchedule,
    report: &FairnessReport,
    json: bool,
) -> Result<String> {
    if json {
        render_json(config, schedule, report)
    } else {
        render_text(schedule, report)
    }
}

fn write_output(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            tracing::info!("Schedule written to {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn render_json(
    config: &ScheduleConfig,
    schedule: &GeneratedSchedule,
    report: &FairnessReport,
) -> Result<String> {
    let output = JsonOutput {
        generated_at: Utc::now(),
        seed: schedule.stats.seed,
        config,
        rounds: &schedule.rounds,
        stats: &schedule.stats,
        fairness: report,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn render_text(schedule: &GeneratedSchedule, report: &FairnessReport) -> Result<String> {
    let mut out = String::new();

    for round in &schedule.rounds {
        writeln!(out, "=== Round {} ===", round.round_number)?;
        if round.matchups.is_empty() {
            writeln!(out, "  No matches (not enough players)")?;
        }
        for (court, matchup) in round.matchups.iter().enumerate() {
            writeln!(out, "  Court {}: {}", court + 1, format_matchup(matchup))?;
        }
        if !round.sitting_out.is_empty() {
            writeln!(out, "  Sitting out: {}", join_names(&round.sitting_out, ", "))?;
        }
        writeln!(out)?;
    }

    writeln!(out, "=== Fairness ===")?;
    writeln!(out, "Seed:                    {}", schedule.stats.seed)?;
    writeln!(out, "Sit-out spread:          {}", report.sit_spread)?;
    writeln!(out, "Consecutive sit-outs:    {}", report.consecutive_sit_outs)?;
    writeln!(
        out,
        "Repeated teammate pairs: {} (max usage {})",
        report.repeated_teammate_pairs, report.max_teammate_usage
    )?;
    writeln!(out, "Repeated opponent pairs: {}", report.repeated_opponent_pairs)?;
    if schedule.stats.skipped_groups > 0 {
        writeln!(
            out,
            "Linked groups skipped:   {}",
            schedule.stats.skipped_groups
        )?;
    }

    writeln!(out, "\nPer participant (played / sat / longest streak):")?;
    for p in &report.participants {
        writeln!(
            out,
            "  {:<16} {:>3} / {:>3} / {:>3}",
            p.participant, p.rounds_played, p.sit_outs, p.longest_sit_streak
        )?;
    }

    Ok(out)
}

// ============================================================================
// LEVEL 4 - FORMATTING UTILITIES
// ============================================================================

fn format_matchup(matchup: &Matchup) -> String {
    format!(
        "{}  vs  {}",
        join_names(&matchup.team1, " & "),
        join_names(&matchup.team2, " & ")
    )
}

fn join_names(ids: &[ParticipantId], sep: &str) -> String {
    ids.iter().map(ParticipantId::as_str).collect::<Vec<_>>().join(sep)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(config: &ScheduleConfig) -> GeneratedSchedule {
        generate(config, Some(11), 100).unwrap()
    }

    #[test]
    fn test_format_matchup() {
        let matchup = Matchup::new(
            vec!["Ann".into(), "Bo".into()],
            vec!["Cy".into(), "Di".into()],
        );
        assert_eq!(format_matchup(&matchup), "Ann & Bo  vs  Cy & Di");
    }

    #[test]
    fn test_render_text_lists_every_round() {
        let config = ScheduleConfig::new(["A", "B", "C", "D", "E"], 3, 1);
        let schedule = schedule(&config);
        let report = FairnessReport::from_rounds(&config, &schedule.rounds);

        let text = render_text(&schedule, &report).unwrap();
        assert!(text.contains("=== Round 1 ==="));
        assert!(text.contains("=== Round 3 ==="));
        assert!(text.contains("Court 2:"));
        assert!(text.contains("Sitting out:"));
        assert!(text.contains("Seed:                    11"));
    }

    #[test]
    fn test_render_text_under_resourced() {
        let config = ScheduleConfig::new(["A", "B"], 1, 2);
        let schedule = schedule(&config);
        let report = FairnessReport::from_rounds(&config, &schedule.rounds);

        let text = render_text(&schedule, &report).unwrap();
        assert!(text.contains("No matches"));
        assert!(text.contains("Sitting out: A, B"));
    }

    #[test]
    fn test_render_json_shape() {
        let config = ScheduleConfig::new(["A", "B", "C", "D"], 2, 1);
        let schedule = schedule(&config);
        let report = FairnessReport::from_rounds(&config, &schedule.rounds);

        let json: serde_json::Value =
            serde_json::from_str(&render_json(&config, &schedule, &report).unwrap()).unwrap();
        assert_eq!(json["seed"], 11);
        assert_eq!(json["rounds"].as_array().unwrap().len(), 2);
        assert_eq!(json["config"]["playersPerTeam"], 1);
        assert_eq!(json["fairness"]["partitionViolations"], 0);
        assert!(json["generatedAt"].is_string());
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let path = std::env::temp_dir().join(format!("scrimmage-invalid-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"participants": ["A", "B"], "totalRounds": 0, "playersPerTeam": 1}"#,
        )
        .unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("total rounds"));
        std::fs::remove_file(&path).ok();
    }
}
