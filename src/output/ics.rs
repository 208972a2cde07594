//! iCalendar export for a team's fixtures in one competition.
//!
//! Output is deterministic for identical input: event UIDs derive from
//! fixture identity and DTSTAMP comes from the snapshot timestamp, so
//! re-exporting an unchanged snapshot produces byte-identical files.
//!
//! Status policy: fixtures without a kickoff are omitted (a VEVENT without
//! DTSTART does not parse portably); postponed and suspended matches are
//! exported as TENTATIVE, cancelled ones as CANCELLED, the rest CONFIRMED.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use icalendar::{Calendar, Component, Event, EventLike, EventStatus, Property};

use crate::error::Result;
use crate::models::{Fixture, FixtureStatus};
use crate::output::write_atomic;

const PRODID: &str = "-//fixcal//fixture calendars//EN";
const MATCH_DURATION_HOURS: i64 = 2;

/// Serialize one competition's fixtures into an iCalendar document.
///
/// `generated_at` feeds every event's DTSTAMP; callers pass the snapshot's
/// `updated_at` so output only changes when the data does.
pub fn export_calendar(
    team_name: &str,
    competition: &str,
    fixtures: &[Fixture],
    generated_at: DateTime<Utc>,
) -> String {
    let mut calendar = Calendar::new();
    calendar.append_property(Property::new("PRODID", PRODID));
    calendar.name(&format!("{team_name} - {competition}"));

    for fixture in fixtures {
        let Some(kickoff) = fixture.utc_kickoff else {
            log::debug!("Omitting fixture {} (no kickoff time)", fixture.id);
            continue;
        };

        let mut event = Event::new();
        event
            .uid(&fixture.uid())
            .timestamp(generated_at)
            .starts(kickoff)
            .ends(kickoff + Duration::hours(MATCH_DURATION_HOURS))
            .summary(&format!("{} vs {}", fixture.home_team, fixture.away_team))
            .description(&event_description(fixture))
            .status(event_status(fixture.status));

        if let Some(venue) = &fixture.venue {
            event.location(venue);
        }

        calendar.push(event.done());
    }

    calendar.to_string()
}

/// Export and atomically write a calendar file.
pub async fn write_calendar(
    path: &Path,
    team_name: &str,
    competition: &str,
    fixtures: &[Fixture],
    generated_at: DateTime<Utc>,
) -> Result<()> {
    let ics = export_calendar(team_name, competition, fixtures, generated_at);
    write_atomic(path, ics.as_bytes()).await?;
    log::info!(
        "Wrote {} fixture(s) for {team_name} ({competition}) to {}",
        fixtures.len(),
        path.display()
    );
    Ok(())
}

fn event_status(status: FixtureStatus) -> EventStatus {
    if status == FixtureStatus::Cancelled {
        EventStatus::Cancelled
    } else if status.is_tentative() {
        EventStatus::Tentative
    } else {
        EventStatus::Confirmed
    }
}

/// Fixed description template: competition, matchday, venue, broadcast.
/// Deliberately free of paths and internal identifiers.
fn event_description(fixture: &Fixture) -> String {
    let mut parts = vec![fixture.competition.clone()];

    if let Some(matchday) = fixture.matchday {
        parts.push(format!("Matchday {matchday}"));
    }
    if let Some(venue) = &fixture.venue {
        parts.push(format!("Venue: {venue}"));
    }
    match (&fixture.tv, fixture.televised) {
        (Some(tv), _) => parts.push(format!("TV: {tv}")),
        (None, true) => parts.push("Televised".to_string()),
        (None, false) => parts.push("Not televised".to_string()),
    }

    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_fixture(id: &str) -> Fixture {
        Fixture {
            id: id.to_string(),
            competition: "Premier League".to_string(),
            competition_code: "PL".to_string(),
            matchday: Some(27),
            utc_kickoff: Some(Utc.with_ymd_and_hms(2026, 3, 1, 15, 0, 0).unwrap()),
            home_team: "Acme FC".to_string(),
            away_team: "Rival FC".to_string(),
            venue: Some("Acme Park".to_string()),
            status: FixtureStatus::Scheduled,
            televised: true,
            tv: Some("Sky Sports".to_string()),
            is_home: true,
            score: None,
        }
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 20, 8, 0, 0).unwrap()
    }

    /// Undo RFC 5545 line folding so substring assertions can span folds.
    fn unfold(ics: &str) -> String {
        ics.replace("\r\n ", "")
    }

    #[test]
    fn test_export_contains_expected_event_fields() {
        let ics = export_calendar("Acme FC", "Premier League", &[make_fixture("1")], generated_at());
        let ics = unfold(&ics);

        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert!(ics.contains("END:VCALENDAR"));
        assert!(ics.contains("BEGIN:VEVENT"));
        assert!(ics.contains("SUMMARY:Acme FC vs Rival FC"));
        assert!(ics.contains("LOCATION:Acme Park"));
        assert!(ics.contains("DTSTART:20260301T150000Z"));
        assert!(ics.contains("DTEND:20260301T170000Z"));
        assert!(ics.contains("STATUS:CONFIRMED"));
        assert!(ics.contains("TV: Sky Sports"));
    }

    #[test]
    fn test_export_is_byte_identical_for_identical_input() {
        let fixtures = vec![make_fixture("1"), make_fixture("2")];
        let first = export_calendar("Acme FC", "Premier League", &fixtures, generated_at());
        let second = export_calendar("Acme FC", "Premier League", &fixtures, generated_at());
        assert_eq!(first, second);
    }

    #[test]
    fn test_uid_is_stable_and_non_random() {
        let fixture = make_fixture("1");
        let ics = export_calendar("Acme FC", "Premier League", &[fixture.clone()], generated_at());
        assert!(ics.contains(&format!("UID:{}", fixture.uid())));
    }

    #[test]
    fn test_fixture_without_kickoff_is_omitted() {
        let mut fixture = make_fixture("1");
        fixture.utc_kickoff = None;
        let ics = export_calendar("Acme FC", "Premier League", &[fixture], generated_at());
        assert!(!ics.contains("BEGIN:VEVENT"));
    }

    #[test]
    fn test_status_policy() {
        let mut postponed = make_fixture("1");
        postponed.status = FixtureStatus::Postponed;
        let ics = export_calendar("Acme FC", "Premier League", &[postponed], generated_at());
        assert!(ics.contains("STATUS:TENTATIVE"));

        let mut cancelled = make_fixture("2");
        cancelled.status = FixtureStatus::Cancelled;
        let ics = export_calendar("Acme FC", "Premier League", &[cancelled], generated_at());
        assert!(ics.contains("STATUS:CANCELLED"));
    }

    #[test]
    fn test_description_broadcast_fallbacks() {
        let mut fixture = make_fixture("1");
        fixture.tv = None;
        fixture.televised = false;
        assert!(event_description(&fixture).ends_with("Not televised"));

        fixture.televised = true;
        assert!(event_description(&fixture).ends_with("Televised"));
    }

    #[test]
    fn test_text_fields_are_escaped() {
        let mut fixture = make_fixture("1");
        fixture.venue = Some("Acme Park, North Stand".to_string());
        let ics = export_calendar("Acme FC", "Premier League", &[fixture], generated_at());
        // RFC 5545 requires commas escaped in text values.
        assert!(unfold(&ics).contains("LOCATION:Acme Park\\, North Stand"));
    }

    #[test]
    fn test_description_does_not_leak_paths() {
        let ics = export_calendar("Acme FC", "Premier League", &[make_fixture("1")], generated_at());
        assert!(!ics.contains("data/cache"));
        assert!(!ics.contains("snapshot.json"));
    }

    #[tokio::test]
    async fn test_write_calendar_round_trips() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("acme-fc.pl.ics");

        write_calendar(&path, "Acme FC", "Premier League", &[make_fixture("1")], generated_at())
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(unfold(&written).contains("SUMMARY:Acme FC vs Rival FC"));
    }
}
