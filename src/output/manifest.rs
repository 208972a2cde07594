//! Calendar manifest generation.
//!
//! Aggregates every snapshot currently in the store into the JSON index
//! the static frontend renders. Built from store state, not from the build
//! diff, so a team that failed this build keeps its previous (still valid)
//! entry as long as its snapshot is intact.
//!
//! Policy: empty levels are omitted entirely. A competition with zero
//! fixtures gets no link, a team with no listed competitions gets no entry,
//! and a league with no listed teams is dropped.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::output::{calendar_rel_path, write_atomic};
use crate::storage::SnapshotStore;
use crate::utils::slugify;

/// Index of all generated calendars, grouped by league.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Manifest {
    pub calendars: Vec<LeagueCalendars>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeagueCalendars {
    pub league: String,
    pub slug: String,
    pub teams: Vec<TeamCalendars>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamCalendars {
    pub name: String,
    pub slug: String,
    pub competitions: Vec<CompetitionLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompetitionLink {
    pub code: String,
    pub name: String,
    /// Calendar path relative to the site root
    pub url: String,
}

impl Manifest {
    pub fn league_count(&self) -> usize {
        self.calendars.len()
    }
}

/// Build the manifest from everything currently in the snapshot store.
///
/// Leagues and teams are sorted by display name for stable, diffable
/// output; competitions keep their snapshot ordering. A snapshot that
/// fails to load is skipped with a warning rather than failing the whole
/// manifest.
pub async fn build_manifest(store: &dyn SnapshotStore) -> Result<Manifest> {
    let mut leagues: Vec<LeagueCalendars> = Vec::new();

    for (league_slug, team_slug) in store.list().await? {
        let snapshot = match store.load(&league_slug, &team_slug).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => continue,
            Err(e) => {
                log::warn!("Skipping {league_slug}/{team_slug} in manifest: {e}");
                continue;
            }
        };

        let competitions: Vec<CompetitionLink> = snapshot
            .competitions
            .iter()
            .filter(|comp| !comp.fixtures.is_empty())
            .map(|comp| CompetitionLink {
                code: comp.code.clone(),
                name: comp.name.clone(),
                url: calendar_rel_path(&league_slug, &team_slug, &slugify(&comp.code)),
            })
            .collect();

        if competitions.is_empty() {
            continue;
        }

        let team = TeamCalendars {
            name: snapshot.team.clone(),
            slug: team_slug,
            competitions,
        };

        match leagues.iter().position(|l| l.slug == league_slug) {
            Some(idx) => leagues[idx].teams.push(team),
            None => leagues.push(LeagueCalendars {
                league: snapshot.league.clone(),
                slug: league_slug,
                teams: vec![team],
            }),
        }
    }

    leagues.sort_by(|a, b| a.league.cmp(&b.league));
    for league in &mut leagues {
        league.teams.sort_by(|a, b| a.name.cmp(&b.name));
    }

    Ok(Manifest { calendars: leagues })
}

/// Serialize and atomically write the manifest.
pub async fn write_manifest(manifest: &Manifest, path: &Path) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(manifest)?;
    write_atomic(path, &bytes).await?;
    log::info!(
        "Wrote manifest with {} league(s) to {}",
        manifest.league_count(),
        path.display()
    );
    Ok(())
}
