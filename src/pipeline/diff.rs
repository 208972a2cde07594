//! Diff calculation between successive team snapshots.
//!
//! Compares the cached snapshot against a freshly fetched one and produces
//! the added/removed/changed sets used for build summaries. The diff is
//! purely informational: committing the new snapshot is the caller's call.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Fixture, TeamSnapshot};
use crate::utils::display_opt;

/// Fields compared between two versions of the same fixture.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangedField {
    Kickoff,
    Venue,
    Status,
    Televised,
    Tv,
    Score,
}

impl ChangedField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangedField::Kickoff => "kickoff",
            ChangedField::Venue => "venue",
            ChangedField::Status => "status",
            ChangedField::Televised => "televised",
            ChangedField::Tv => "tv",
            ChangedField::Score => "score",
        }
    }
}

/// One field difference with display values from both sides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldChange {
    pub field: ChangedField,
    pub old: String,
    pub new: String,
}

/// A fixture present in both snapshots with at least one differing field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixtureChange {
    /// The new version of the fixture
    pub fixture: Fixture,
    pub changes: Vec<FieldChange>,
}

/// Structured diff of one team across two builds.
///
/// The three sets are disjoint by construction: a fixture id appears in
/// exactly one of them, and every changed entry exists in both snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SnapshotDiff {
    /// Fixtures present in new only, in new-snapshot order
    pub added: Vec<Fixture>,
    /// Fixtures present in old only, in old-snapshot order
    pub removed: Vec<Fixture>,
    /// Fixtures present in both with differing fields, in new-snapshot order
    pub changed: Vec<FixtureChange>,
}

impl SnapshotDiff {
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.changed.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }

    /// One-line summary for build logs.
    pub fn summary(&self) -> String {
        format!(
            "{} added, {} changed, {} removed",
            self.added.len(),
            self.changed.len(),
            self.removed.len()
        )
    }
}

/// Render a kickoff for diff output; a withdrawn date reads as "TBC".
fn kickoff_display(fixture: &Fixture) -> String {
    fixture
        .utc_kickoff
        .map(|ko| ko.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| "TBC".to_string())
}

/// Compare the fixed field set of two versions of one fixture.
fn compare_fields(old: &Fixture, new: &Fixture) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    if old.utc_kickoff != new.utc_kickoff {
        changes.push(FieldChange {
            field: ChangedField::Kickoff,
            old: kickoff_display(old),
            new: kickoff_display(new),
        });
    }
    if old.venue != new.venue {
        changes.push(FieldChange {
            field: ChangedField::Venue,
            old: display_opt(old.venue.as_deref()).to_string(),
            new: display_opt(new.venue.as_deref()).to_string(),
        });
    }
    if old.status != new.status {
        changes.push(FieldChange {
            field: ChangedField::Status,
            old: old.status.to_string(),
            new: new.status.to_string(),
        });
    }
    if old.televised != new.televised {
        changes.push(FieldChange {
            field: ChangedField::Televised,
            old: old.televised.to_string(),
            new: new.televised.to_string(),
        });
    }
    if old.tv != new.tv {
        changes.push(FieldChange {
            field: ChangedField::Tv,
            old: display_opt(old.tv.as_deref()).to_string(),
            new: display_opt(new.tv.as_deref()).to_string(),
        });
    }
    if old.score != new.score {
        changes.push(FieldChange {
            field: ChangedField::Score,
            old: old.score.map(|s| s.to_string()).unwrap_or_default(),
            new: new.score.map(|s| s.to_string()).unwrap_or_default(),
        });
    }

    changes
}

/// Calculate the diff between the cached snapshot and a fresh one.
///
/// `None` for `old` is the bootstrap case: every fixture in `new` is
/// classified as added. Otherwise fixtures are matched by id within the
/// same competition code. A fixture whose kickoff was withdrawn keeps its
/// identity and shows up as a kickoff change, never as removed.
pub fn diff_snapshots(old: Option<&TeamSnapshot>, new: &TeamSnapshot) -> SnapshotDiff {
    let Some(old) = old else {
        return SnapshotDiff {
            added: new
                .competitions
                .iter()
                .flat_map(|c| c.fixtures.iter().cloned())
                .collect(),
            ..SnapshotDiff::default()
        };
    };

    let mut diff = SnapshotDiff::default();

    // Added and changed, in new-snapshot order.
    for comp in &new.competitions {
        let old_by_id: HashMap<&str, &Fixture> = old
            .competitions
            .iter()
            .filter(|c| c.code == comp.code)
            .flat_map(|c| c.fixtures.iter())
            .map(|f| (f.id.as_str(), f))
            .collect();

        for fixture in &comp.fixtures {
            match old_by_id.get(fixture.id.as_str()) {
                None => diff.added.push(fixture.clone()),
                Some(prev) => {
                    let changes = compare_fields(prev, fixture);
                    if !changes.is_empty() {
                        diff.changed.push(FixtureChange {
                            fixture: fixture.clone(),
                            changes,
                        });
                    }
                }
            }
        }
    }

    // Removed, in old-snapshot order.
    for comp in &old.competitions {
        let new_ids: Vec<&str> = new
            .competitions
            .iter()
            .filter(|c| c.code == comp.code)
            .flat_map(|c| c.fixtures.iter())
            .map(|f| f.id.as_str())
            .collect();

        for fixture in &comp.fixtures {
            if !new_ids.contains(&fixture.id.as_str()) {
                diff.removed.push(fixture.clone());
            }
        }
    }

    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FixtureStatus, Score};
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    fn make_fixture(id: &str, opponent: &str, day: u32) -> Fixture {
        Fixture {
            id: id.to_string(),
            competition: "Premier League".to_string(),
            competition_code: "PL".to_string(),
            matchday: None,
            utc_kickoff: Some(Utc.with_ymd_and_hms(2026, 3, day, 15, 0, 0).unwrap()),
            home_team: "Acme FC".to_string(),
            away_team: opponent.to_string(),
            venue: Some("Acme Park".to_string()),
            status: FixtureStatus::Scheduled,
            televised: false,
            tv: None,
            is_home: true,
            score: None,
        }
    }

    fn snapshot(fixtures: Vec<Fixture>) -> TeamSnapshot {
        TeamSnapshot::from_fixtures(
            "Premier League",
            "Acme FC",
            "acme-fc",
            fixtures,
            Utc.with_ymd_and_hms(2026, 2, 20, 8, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_bootstrap_classifies_everything_added() {
        let new = snapshot(vec![make_fixture("1", "Rival FC", 1), make_fixture("2", "Other FC", 8)]);
        let diff = diff_snapshots(None, &new);

        assert_eq!(diff.added.len(), 2);
        assert!(diff.removed.is_empty());
        assert!(diff.changed.is_empty());
    }

    #[test]
    fn test_no_changes_reports_nothing() {
        let old = snapshot(vec![make_fixture("1", "Rival FC", 1)]);
        let new = old.clone();
        let diff = diff_snapshots(Some(&old), &new);
        assert!(!diff.has_changes());
        assert_eq!(diff.change_count(), 0);
    }

    #[test]
    fn test_televised_change_and_addition() {
        let old = snapshot(vec![make_fixture("1", "Rival FC", 1)]);

        let mut updated = make_fixture("1", "Rival FC", 1);
        updated.televised = true;
        let new = snapshot(vec![updated, make_fixture("2", "Other FC", 8)]);

        let diff = diff_snapshots(Some(&old), &new);

        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.added[0].away_team, "Other FC");
        assert!(diff.removed.is_empty());
        assert_eq!(diff.changed.len(), 1);
        assert_eq!(diff.changed[0].changes.len(), 1);
        let change = &diff.changed[0].changes[0];
        assert_eq!(change.field, ChangedField::Televised);
        assert_eq!(change.old, "false");
        assert_eq!(change.new, "true");
    }

    #[test]
    fn test_removed_follows_old_order() {
        let old = snapshot(vec![make_fixture("1", "Rival FC", 1), make_fixture("2", "Other FC", 8)]);
        let new = snapshot(vec![make_fixture("2", "Other FC", 8)]);

        let diff = diff_snapshots(Some(&old), &new);
        assert_eq!(diff.removed.len(), 1);
        assert_eq!(diff.removed[0].id, "1");
        assert!(diff.added.is_empty());
        assert!(diff.changed.is_empty());
    }

    #[test]
    fn test_same_id_in_other_competition_is_not_matched() {
        let old = snapshot(vec![make_fixture("1", "Rival FC", 1)]);

        let mut moved = make_fixture("1", "Rival FC", 1);
        moved.competition_code = "FA".to_string();
        moved.competition = "FA Cup".to_string();
        let new = snapshot(vec![moved]);

        let diff = diff_snapshots(Some(&old), &new);
        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.removed.len(), 1);
        assert!(diff.changed.is_empty());
    }

    #[test]
    fn test_withdrawn_kickoff_is_a_change_not_a_removal() {
        let old = snapshot(vec![make_fixture("1", "Rival FC", 1)]);

        let mut unscheduled = make_fixture("1", "Rival FC", 1);
        unscheduled.utc_kickoff = None;
        unscheduled.status = FixtureStatus::Postponed;
        let new = snapshot(vec![unscheduled]);

        let diff = diff_snapshots(Some(&old), &new);
        assert!(diff.removed.is_empty());
        assert_eq!(diff.changed.len(), 1);

        let changes = &diff.changed[0].changes;
        let kickoff = changes.iter().find(|c| c.field == ChangedField::Kickoff).unwrap();
        assert_eq!(kickoff.old, "2026-03-01T15:00:00Z");
        assert_eq!(kickoff.new, "TBC");
        assert!(changes.iter().any(|c| c.field == ChangedField::Status));
    }

    #[test]
    fn test_score_and_multiple_fields() {
        let old = snapshot(vec![make_fixture("1", "Rival FC", 1)]);

        let mut played = make_fixture("1", "Rival FC", 1);
        played.status = FixtureStatus::Finished;
        played.score = Some(Score { home: 2, away: 1 });
        let new = snapshot(vec![played]);

        let diff = diff_snapshots(Some(&old), &new);
        let changes = &diff.changed[0].changes;
        assert_eq!(changes.len(), 2);
        let score = changes.iter().find(|c| c.field == ChangedField::Score).unwrap();
        assert_eq!(score.old, "");
        assert_eq!(score.new, "2-1");
    }

    #[test]
    fn test_sets_are_disjoint_and_cover_inputs() {
        let old = snapshot(vec![
            make_fixture("1", "Keep FC", 1),
            make_fixture("2", "Change FC", 8),
            make_fixture("3", "Gone FC", 15),
        ]);
        let mut changed = make_fixture("2", "Change FC", 8);
        changed.venue = Some("Neutral Ground".to_string());
        let new = snapshot(vec![
            make_fixture("1", "Keep FC", 1),
            changed,
            make_fixture("4", "New FC", 22),
        ]);

        let diff = diff_snapshots(Some(&old), &new);

        let added: HashSet<&str> = diff.added.iter().map(|f| f.id.as_str()).collect();
        let removed: HashSet<&str> = diff.removed.iter().map(|f| f.id.as_str()).collect();
        let changed: HashSet<&str> = diff.changed.iter().map(|c| c.fixture.id.as_str()).collect();

        assert!(added.is_disjoint(&removed));
        assert!(added.is_disjoint(&changed));
        assert!(removed.is_disjoint(&changed));

        let all_ids: HashSet<&str> = ["1", "2", "3", "4"].into_iter().collect();
        let union: HashSet<&str> = added.union(&removed).chain(changed.iter()).copied().collect();
        assert!(union.is_subset(&all_ids));
        assert_eq!(added, HashSet::from(["4"]));
        assert_eq!(removed, HashSet::from(["3"]));
        assert_eq!(changed, HashSet::from(["2"]));
    }
}
