//! Per-team fixture snapshots.
//!
//! One snapshot per team, owned by the snapshot store. A snapshot is
//! replaced wholesale on each successful fetch, never patched in place,
//! so an on-disk snapshot is either fully absent or complete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Fixture;

/// Fixtures for one competition, in fetch order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompetitionFixtures {
    /// Short competition code (e.g. "PL")
    pub code: String,

    /// Full competition name
    pub name: String,

    /// Fixtures in the order the provider returned them
    pub fixtures: Vec<Fixture>,
}

/// Complete point-in-time fixture state for one team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamSnapshot {
    /// League display name (e.g. "Premier League")
    pub league: String,

    /// Team display name
    pub team: String,

    /// Team slug used in cache/calendar paths
    pub slug: String,

    /// When this snapshot was produced
    pub updated_at: DateTime<Utc>,

    /// Competitions in fetch order
    pub competitions: Vec<CompetitionFixtures>,
}

impl TeamSnapshot {
    /// Group freshly fetched fixtures into a snapshot, preserving order.
    pub fn from_fixtures(
        league: &str,
        team: &str,
        slug: &str,
        fixtures: Vec<Fixture>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let mut competitions: Vec<CompetitionFixtures> = Vec::new();
        for fixture in fixtures {
            match competitions
                .iter()
                .position(|c| c.code == fixture.competition_code)
            {
                Some(idx) => competitions[idx].fixtures.push(fixture),
                None => competitions.push(CompetitionFixtures {
                    code: fixture.competition_code.clone(),
                    name: fixture.competition.clone(),
                    fixtures: vec![fixture],
                }),
            }
        }

        Self {
            league: league.to_string(),
            team: team.to_string(),
            slug: slug.to_string(),
            updated_at,
            competitions,
        }
    }

    /// Total fixture count across all competitions.
    pub fn fixture_count(&self) -> usize {
        self.competitions.iter().map(|c| c.fixtures.len()).sum()
    }

    /// Structural validation, applied before every store write and after
    /// every store read.
    pub fn validate(&self) -> Result<()> {
        if self.team.trim().is_empty() {
            return Err(AppError::validation("snapshot team name is empty"));
        }
        if self.slug.trim().is_empty() {
            return Err(AppError::validation("snapshot team slug is empty"));
        }
        if self.league.trim().is_empty() {
            return Err(AppError::validation("snapshot league is empty"));
        }

        for comp in &self.competitions {
            if comp.code.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "competition without code in snapshot for {}",
                    self.team
                )));
            }
            for fixture in &comp.fixtures {
                if fixture.id.trim().is_empty() {
                    return Err(AppError::validation(format!(
                        "fixture without id in {} ({})",
                        self.team, comp.code
                    )));
                }
                if fixture.home_team.trim().is_empty() || fixture.away_team.trim().is_empty() {
                    return Err(AppError::validation(format!(
                        "fixture {} is missing a team name",
                        fixture.id
                    )));
                }
                if fixture.competition_code != comp.code {
                    return Err(AppError::validation(format!(
                        "fixture {} filed under {} but carries code {}",
                        fixture.id, comp.code, fixture.competition_code
                    )));
                }
            }
        }
        Ok(())
    }
}
