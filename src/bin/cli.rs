//! fixcal CLI
//!
//! Local entry point: synchronizes fixtures and regenerates calendar
//! files plus the web manifest.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fixcal::{
    config::{load_config, resolve_api_token},
    error::{AppError, Result},
    models::TeamEntry,
    pipeline,
    providers::FootballDataClient,
    storage::{LocalSnapshotStore, SnapshotStore},
};

/// fixcal - Football fixture calendar builder
#[derive(Parser, Debug)]
#[command(
    name = "fixcal",
    version,
    about = "Builds iCalendar feeds and a web manifest from football fixture data"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "fixcal.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch fixtures and regenerate calendars and the manifest
    Build {
        /// Restrict the build to these team names (default: all configured)
        teams: Vec<String>,
    },

    /// Validate the configuration file
    Validate,

    /// Show cache state
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Resolve a team-name selection against the configured roster.
fn select_teams(configured: &[TeamEntry], requested: &[String]) -> Result<Vec<TeamEntry>> {
    if requested.is_empty() {
        return Ok(configured.to_vec());
    }

    let mut selected = Vec::new();
    for name in requested {
        match configured
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name) || t.display_name().eq_ignore_ascii_case(name))
        {
            Some(team) => selected.push(team.clone()),
            None => {
                return Err(AppError::config(format!(
                    "Team '{name}' is not in the configuration"
                )));
            }
        }
    }
    Ok(selected)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Build { teams } => {
            let config = load_config(&cli.config)?;
            let selected = select_teams(&config.teams, &teams)?;

            let token = resolve_api_token(&config)?;
            let provider = FootballDataClient::new(&config.provider, token)?;
            let store = LocalSnapshotStore::new(&config.build.cache_dir);

            log::info!("Building calendars for {} team(s)...", selected.len());
            let report = pipeline::run_build(&config, &provider, &store, &selected).await?;

            if report.success_count() == 0 && !report.teams.is_empty() {
                return Err(AppError::config("No calendars were built"));
            }
        }

        Command::Validate => {
            log::info!("Validating configuration at {}...", cli.config.display());
            let config = load_config(&cli.config)?;
            log::info!(
                "✓ Config OK ({} team(s), {} competition(s))",
                config.teams.len(),
                config.provider.competitions.len()
            );
        }

        Command::Info => {
            let config = load_config(&cli.config)?;
            let store = LocalSnapshotStore::new(&config.build.cache_dir);

            log::info!("Cache directory: {}", config.build.cache_dir.display());
            let cached = store.list().await?;
            if cached.is_empty() {
                log::info!("No snapshots cached yet.");
            }
            for (league, team) in &cached {
                match store.load(league, team).await {
                    Ok(Some(snapshot)) => log::info!(
                        "{league}/{team}: {} fixtures, updated {}",
                        snapshot.fixture_count(),
                        snapshot.updated_at
                    ),
                    Ok(None) => {}
                    Err(e) => log::warn!("{league}/{team}: {e}"),
                }
            }

            let manifest_path = config.build.output_dir.join("calendars.json");
            log::info!(
                "Manifest: {}",
                if manifest_path.exists() {
                    "exists"
                } else {
                    "not generated"
                }
            );
        }
    }

    Ok(())
}
