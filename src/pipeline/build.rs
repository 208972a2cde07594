//! Build orchestration.
//!
//! Processes teams strictly sequentially: the remote API enforces a
//! minimum inter-request delay, honored by suspending the pipeline before
//! every fetch and nowhere else. One team's failure never aborts the
//! batch; the final report lists every team with an explicit status.

use std::time::Duration;

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{Config, Fixture, TeamEntry, TeamSnapshot};
use crate::output::{calendar_rel_path, ics, manifest};
use crate::pipeline::diff::diff_snapshots;
use crate::pipeline::enrich::{apply_overrides, load_overrides, OverrideMap};
use crate::providers::FixtureProvider;
use crate::storage::SnapshotStore;
use crate::utils::slugify;

/// Upper bound on pages fetched per team.
const MAX_PAGES: u32 = 50;

/// Outcome for one team in a build run.
#[derive(Debug, Clone, PartialEq)]
pub enum TeamStatus {
    Success {
        fixtures: usize,
        added: usize,
        changed: usize,
        removed: usize,
    },
    Skipped {
        reason: String,
    },
    Failed {
        reason: String,
    },
}

/// Per-team entry in the final report.
#[derive(Debug, Clone)]
pub struct TeamReport {
    pub team: String,
    pub status: TeamStatus,
}

/// Summary of a whole build run. Silent partial success is disallowed:
/// every attempted team appears here.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub teams: Vec<TeamReport>,
}

impl BuildReport {
    pub fn success_count(&self) -> usize {
        self.count(|s| matches!(s, TeamStatus::Success { .. }))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|s| matches!(s, TeamStatus::Failed { .. }))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|s| matches!(s, TeamStatus::Skipped { .. }))
    }

    fn count(&self, pred: impl Fn(&TeamStatus) -> bool) -> usize {
        self.teams.iter().filter(|t| pred(&t.status)).count()
    }

    /// Log one line per team plus totals.
    pub fn log_summary(&self) {
        for entry in &self.teams {
            match &entry.status {
                TeamStatus::Success {
                    fixtures,
                    added,
                    changed,
                    removed,
                } => log::info!(
                    "[{}] OK: {} fixtures ({} added, {} changed, {} removed)",
                    entry.team,
                    fixtures,
                    added,
                    changed,
                    removed
                ),
                TeamStatus::Skipped { reason } => {
                    log::warn!("[{}] skipped: {}", entry.team, reason)
                }
                TeamStatus::Failed { reason } => {
                    log::error!("[{}] FAILED: {}", entry.team, reason)
                }
            }
        }
        log::info!(
            "Build finished: {} ok, {} failed, {} skipped",
            self.success_count(),
            self.failed_count(),
            self.skipped_count()
        );
    }
}

/// Spaces out remote calls. The first call goes through immediately;
/// every later one waits out the configured delay first.
struct RequestPacer {
    delay: Duration,
    first: bool,
}

impl RequestPacer {
    fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            first: true,
        }
    }

    async fn pace(&mut self) {
        if self.first {
            self.first = false;
        } else if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Run the full build for the given teams, then regenerate the manifest
/// over whatever cache state resulted.
pub async fn run_build(
    config: &Config,
    provider: &dyn FixtureProvider,
    store: &dyn SnapshotStore,
    teams: &[TeamEntry],
) -> Result<BuildReport> {
    let overrides = load_overrides(&config.build.overrides_path).unwrap_or_else(|e| {
        log::warn!("Failed to load overrides: {e}. Continuing without them.");
        OverrideMap::new()
    });

    let mut pacer = RequestPacer::new(config.build.request_delay_ms);
    let mut report = BuildReport::default();

    for team in teams {
        let status = build_team(config, provider, store, &overrides, &mut pacer, team).await;
        report.teams.push(TeamReport {
            team: team.display_name().to_string(),
            status,
        });
    }

    let manifest = manifest::build_manifest(store).await?;
    manifest::write_manifest(&manifest, &config.build.output_dir.join("calendars.json")).await?;

    report.log_summary();
    Ok(report)
}

/// Fetch → merge → diff → save → export for one team. Any failure is
/// converted into a status; the previous snapshot and previously exported
/// calendars are left untouched in every failure path.
async fn build_team(
    config: &Config,
    provider: &dyn FixtureProvider,
    store: &dyn SnapshotStore,
    overrides: &OverrideMap,
    pacer: &mut RequestPacer,
    team: &TeamEntry,
) -> TeamStatus {
    let fetched = match fetch_all_pages(provider, pacer, team).await {
        Ok(fetched) => fetched,
        Err(e) => {
            log::error!("Fetch failed for {}: {e}", team.name);
            return TeamStatus::Failed {
                reason: e.to_string(),
            };
        }
    };

    if fetched.is_empty() {
        return TeamStatus::Skipped {
            reason: "no fixtures returned".to_string(),
        };
    }

    let tv_before = fetched.iter().filter(|f| f.tv.is_some()).count();
    let merged = apply_overrides(&fetched, overrides);
    let tv_after = merged.iter().filter(|f| f.tv.is_some()).count();
    if tv_after > tv_before {
        log::info!(
            "[{}] TV info added by overrides: {}",
            team.display_name(),
            tv_after - tv_before
        );
    }

    let snapshot = TeamSnapshot::from_fixtures(
        &team.league,
        team.display_name(),
        &team.team_slug(),
        merged,
        Utc::now(),
    );

    let previous = match store.load(&team.league_slug(), &team.team_slug()).await {
        Ok(previous) => previous,
        Err(e @ AppError::CorruptCache { .. }) => {
            if config.build.refetch_corrupt {
                log::warn!(
                    "[{}] corrupt cache, rebuilding from this fetch: {e}",
                    team.display_name()
                );
                None
            } else {
                log::error!("[{}] corrupt cache: {e}", team.display_name());
                return TeamStatus::Failed {
                    reason: e.to_string(),
                };
            }
        }
        Err(e) => {
            return TeamStatus::Failed {
                reason: e.to_string(),
            };
        }
    };

    if previous.is_none() {
        log::info!("[{}] no cached snapshot, bootstrapping", team.display_name());
    }

    let diff = diff_snapshots(previous.as_ref(), &snapshot);
    log::info!("[{}] changes since last build: {}", team.display_name(), diff.summary());
    for change in &diff.changed {
        for field in &change.changes {
            log::debug!(
                "[{}] {} {}: '{}' -> '{}'",
                team.display_name(),
                change.fixture.id,
                field.field.as_str(),
                field.old,
                field.new
            );
        }
    }

    if let Err(e) = store.save(&snapshot).await {
        log::error!("[{}] snapshot rejected: {e}", team.display_name());
        return TeamStatus::Failed {
            reason: e.to_string(),
        };
    }

    if let Err(e) = export_team_calendars(config, team, &snapshot).await {
        log::error!("[{}] calendar export failed: {e}", team.display_name());
        return TeamStatus::Failed {
            reason: e.to_string(),
        };
    }

    TeamStatus::Success {
        fixtures: snapshot.fixture_count(),
        added: diff.added.len(),
        changed: diff.changed.len(),
        removed: diff.removed.len(),
    }
}

/// Fetch every page for a team, pacing before each remote call.
async fn fetch_all_pages(
    provider: &dyn FixtureProvider,
    pacer: &mut RequestPacer,
    team: &TeamEntry,
) -> Result<Vec<Fixture>> {
    let mut fixtures = Vec::new();

    for page in 0..MAX_PAGES {
        pacer.pace().await;
        let batch = provider.fetch_page(team, page).await?;
        fixtures.extend(batch.fixtures);
        if !batch.has_more {
            return Ok(fixtures);
        }
    }

    log::warn!(
        "Stopped paging fixtures for {} after {MAX_PAGES} pages",
        team.name
    );
    Ok(fixtures)
}

/// Write one calendar file per non-empty competition.
async fn export_team_calendars(
    config: &Config,
    team: &TeamEntry,
    snapshot: &TeamSnapshot,
) -> Result<()> {
    for comp in &snapshot.competitions {
        if comp.fixtures.is_empty() {
            continue;
        }
        let rel = calendar_rel_path(&team.league_slug(), &team.team_slug(), &slugify(&comp.code));
        let path = config.build.output_dir.join(rel);
        ics::write_calendar(
            &path,
            team.display_name(),
            &comp.name,
            &comp.fixtures,
            snapshot.updated_at,
        )
        .await?;
    }
    Ok(())
}
