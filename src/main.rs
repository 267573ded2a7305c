use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use u_season::audit::SeasonAudit;
use u_season::config::{LeagueFile, TeamNames};
use u_season::generator::{generate_schedule_with, GenerateOptions};
use u_season::models::{DivisionAssignment, LeagueConfig, Pair, RivalryPair, Schedule};
use u_season::retry::{generate_league_with_retry, generate_schedule_with_retry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Generate a 14-week season for a 12-team, 4-division league.
#[derive(Debug, Parser)]
#[command(name = "u-season", version, about)]
struct Cli {
    /// League file (TOML) with divisions, optional rivalries and team names
    #[arg(short, long, conflicts_with = "random_divisions")]
    league: Option<PathBuf>,

    /// Draw a random division assignment
    #[arg(long)]
    random_divisions: bool,

    /// Seed for a single reproducible attempt (no retries)
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("u_season=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("u_season=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_logger(cli.verbose);

    // Rivalries listed in a league file pin the configuration of the first
    // (or only, with --seed) attempt.
    let mut fixed_config = None;
    let (assignment, names) = match &cli.league {
        Some(path) => {
            let file = LeagueFile::load(path)
                .with_context(|| format!("loading league file {}", path.display()))?;
            if file.rivalries.is_some() {
                fixed_config = Some(file.league_config()?);
            }
            (file.division_assignment(), file.team_names()?)
        }
        None if cli.random_divisions => {
            let assignment = match cli.seed {
                Some(seed) => DivisionAssignment::random(&mut SmallRng::seed_from_u64(seed)),
                None => DivisionAssignment::random(&mut rand::rng()),
            };
            (assignment, TeamNames::new())
        }
        None => (
            DivisionAssignment::from(&LeagueConfig::default()),
            TeamNames::new(),
        ),
    };

    if let Err(errors) = assignment.validate() {
        for error in &errors {
            tracing::error!("{error}");
        }
        bail!("division assignment is incomplete; every division needs three distinct teams");
    }

    let (config, schedule) = match cli.seed {
        Some(seed) => {
            let config = match fixed_config {
                Some(config) => config,
                None => assignment.to_league_config()?,
            };
            let schedule = generate_schedule_with(&config, &mut GenerateOptions::seeded(seed))
                .context("generation failed for this seed; try another seed or drop --seed")?;
            (config, schedule)
        }
        None => {
            let schedule = match &fixed_config {
                Some(config) => generate_league_with_retry(config).await,
                None => generate_schedule_with_retry(&assignment).await,
            }
            .context("could not build a season; try regenerating with different divisions")?;
            let used = league_of(&schedule, &assignment)?;
            if let Some(config) = &fixed_config {
                if rival_set(used.rivalry_pairs()) != rival_set(config.rivalry_pairs()) {
                    tracing::warn!("configured rivalries could not be scheduled; a retry drew new ones");
                }
            }
            (used, schedule)
        }
    };

    let audit = SeasonAudit::calculate(&schedule, &config);
    match cli.format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "config": config,
                "schedule": schedule,
                "audit": audit,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print_text(&schedule, &audit, &names),
    }

    if !audit.is_valid() {
        bail!("generated season failed {} audit checks", audit.violations.len());
    }
    Ok(())
}

/// Rebuilds the configuration a retried schedule was generated with.
///
/// Retries may permute team order or rivalries, so the configuration is
/// recovered from the schedule's own divisional and rivalry flags.
fn league_of(schedule: &Schedule, assignment: &DivisionAssignment) -> anyhow::Result<LeagueConfig> {
    let divisions = assignment.to_divisions()?;
    let rivals: BTreeSet<Pair> = schedule
        .match_ups()
        .filter(|m| m.is_rivalry)
        .map(|m| m.pair())
        .collect();
    let rivalries = rivals
        .into_iter()
        .map(|p| RivalryPair::new(p.lo(), p.hi()))
        .collect();
    Ok(LeagueConfig::new(divisions, rivalries)?)
}

fn rival_set(pairs: &[RivalryPair]) -> BTreeSet<Pair> {
    pairs.iter().map(RivalryPair::pair).collect()
}

fn print_text(schedule: &Schedule, audit: &SeasonAudit, names: &TeamNames) {
    for (w, week) in schedule.weeks().iter().enumerate() {
        println!("Week {}:", w + 1);
        for m in &week.match_ups {
            let mut tags = Vec::new();
            if m.is_divisional {
                tags.push("DIV");
            }
            if m.is_rivalry {
                tags.push("RIV");
            }
            let suffix = if tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", tags.join(","))
            };
            println!(
                "  {} @ {}{suffix}",
                names.name_of(m.away),
                names.name_of(m.home)
            );
        }
    }

    println!();
    if audit.is_valid() {
        println!("✅ All season checks passed");
    } else {
        for v in &audit.violations {
            println!("❌ {}", v.message);
        }
    }
}
