//! qf-cli — Command-line driver for the quadratic matching-pool engine.
//!
//! Loads a round description (JSON), runs scoring, pool distribution and
//! reward composition, and prints the result as a table or as JSON.

mod config;
mod round_file;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use qf_core::traits::ScoreCalculator;
use qf_match::round::{run_round, RoundReport};
use qf_match::QuadraticScorer;
use tracing::info;

use crate::config::{CliConfig, LogFormat};
use crate::round_file::{apply_overrides, load_round};

/// Quadratic funding round calculator.
#[derive(Parser)]
#[command(name = "qf-cli")]
#[command(version, about = "Split a matching pool by capital-constrained quadratic funding.")]
struct Cli {
    /// Log level (trace, debug, info, warn, error). Overrides QF_LOG_LEVEL.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format ("text" or "json"). Overrides QF_LOG_FORMAT.
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score, distribute and compose earnings for a round.
    Run(RunArgs),
    /// Only compute per-submission quadratic scores.
    Score(ScoreArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Round file (default: QF_ROUND_FILE or ~/.qf/round.json).
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Override the round's matching pool.
    #[arg(short, long)]
    pool: Option<f64>,

    /// Override the number of submissions entitled to an even split.
    #[arg(short = 'n', long)]
    submission_count: Option<u64>,

    /// Print the report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ScoreArgs {
    /// Round file (default: QF_ROUND_FILE or ~/.qf/round.json).
    #[arg(short, long)]
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CliConfig::from_env()?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format.as_deref() {
        config.log_format = LogFormat::parse(format)?;
    }

    init_logging(&config.log_level, config.log_format);

    match cli.command {
        Commands::Run(args) => round_run(args, &config),
        Commands::Score(args) => round_score(args, &config),
    }
}

/// Run the full pipeline over a round file.
fn round_run(args: RunArgs, config: &CliConfig) -> Result<()> {
    let path = args.file.unwrap_or_else(|| config.round_file.clone());
    let mut round = load_round(&path)?;
    apply_overrides(&mut round, args.pool, args.submission_count);

    info!(
        file = %path.display(),
        submissions = round.submissions.len(),
        total_pool = round.total_pool,
        "running round"
    );

    let report = run_round(&round).context("round allocation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Print quadratic scores only.
fn round_score(args: ScoreArgs, config: &CliConfig) -> Result<()> {
    let path = args.file.unwrap_or_else(|| config.round_file.clone());
    let round = load_round(&path)?;

    let eligible: BTreeMap<_, _> = round
        .submissions
        .into_iter()
        .map(|(id, s)| (id, s.eligible))
        .collect();
    let scores = QuadraticScorer::new().compute_all_scores(&eligible);

    println!("{}", serde_json::to_string_pretty(&scores)?);
    Ok(())
}

fn print_report(report: &RoundReport) {
    println!(
        "tier: {}  denominator: {:.6}  pool: {:.2}",
        report.tier, report.total_score, report.total_pool
    );
    println!(
        "{:<20} {:>8} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "submission", "backers", "score", "raised", "match", "ai", "total"
    );
    for (id, entry) in &report.entries {
        let reward = &entry.reward;
        let ai = if reward.ai_reward.pending {
            format!("{:.2}*", reward.ai_reward.amount)
        } else {
            format!("{:.2}", reward.ai_reward.amount)
        };
        println!(
            "{:<20} {:>8} {:>14.4} {:>14.2} {:>14.2} {:>14} {:>14.2}",
            id,
            format!("{}/{}", reward.eligible_backers_count, reward.backers_count),
            entry.result.score,
            entry.result.contribution,
            reward.quadratic_reward,
            ai,
            reward.total_earnings,
        );
    }
    println!(
        "matched: {:.2}  earnings: {:.2}  (* = AI reward pending)",
        report.total_matched(),
        report.total_earnings()
    );
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Logs go to stderr so that report output on stdout stays machine-readable.
fn init_logging(level_str: &str, format: LogFormat) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_str));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
