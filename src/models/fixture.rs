//! Fixture data structures.
//!
//! Fixtures are converted from the remote API's JSON at the provider
//! boundary and are immutable for the rest of a build; the next fetch
//! supersedes them wholesale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Match status vocabulary of the remote fixture API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FixtureStatus {
    Scheduled,
    Timed,
    InPlay,
    Paused,
    Finished,
    Postponed,
    Suspended,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl FixtureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixtureStatus::Scheduled => "SCHEDULED",
            FixtureStatus::Timed => "TIMED",
            FixtureStatus::InPlay => "IN_PLAY",
            FixtureStatus::Paused => "PAUSED",
            FixtureStatus::Finished => "FINISHED",
            FixtureStatus::Postponed => "POSTPONED",
            FixtureStatus::Suspended => "SUSPENDED",
            FixtureStatus::Cancelled => "CANCELLED",
            FixtureStatus::Unknown => "UNKNOWN",
        }
    }

    /// Whether the match is still expected to be played as listed.
    pub fn is_scheduled(&self) -> bool {
        matches!(
            self,
            FixtureStatus::Scheduled | FixtureStatus::Timed | FixtureStatus::InPlay
        )
    }

    /// Whether the match is off its listed slot (tentative in calendar terms).
    pub fn is_tentative(&self) -> bool {
        matches!(self, FixtureStatus::Postponed | FixtureStatus::Suspended)
    }
}

impl std::fmt::Display for FixtureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full-time score of a played match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// A single scheduled or played match for the team of interest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fixture {
    /// Provider match id; the canonical identity key for diffing
    pub id: String,

    /// Full competition name
    pub competition: String,

    /// Short competition code (e.g. "PL", "FA")
    pub competition_code: String,

    /// Matchday/round number, if the competition has one
    #[serde(default)]
    pub matchday: Option<u32>,

    /// Scheduled kick-off in UTC; None when the date has been withdrawn
    pub utc_kickoff: Option<DateTime<Utc>>,

    /// Home side name
    pub home_team: String,

    /// Away side name
    pub away_team: String,

    /// Stadium/venue, when the feed carries one
    #[serde(default)]
    pub venue: Option<String>,

    /// Current match status
    pub status: FixtureStatus,

    /// Whether the match has a confirmed TV broadcast
    #[serde(default)]
    pub televised: bool,

    /// Broadcaster name, when known
    #[serde(default)]
    pub tv: Option<String>,

    /// Whether this is a home match for the team of interest
    pub is_home: bool,

    /// Full-time score, once played
    #[serde(default)]
    pub score: Option<Score>,
}

impl Fixture {
    /// Human-editable composite identity key: `"YYYY-MM-DD:home:away"`.
    ///
    /// Uses the kickoff *date* only, so a same-day time shift still matches.
    /// The override loader accepts this exact form; both sides must build it
    /// through this function or overrides silently stop applying.
    pub fn date_key(&self) -> Option<String> {
        self.utc_kickoff.map(|ko| {
            format!(
                "{}:{}:{}",
                ko.format("%Y-%m-%d"),
                self.home_team,
                self.away_team
            )
        })
    }

    /// Stable calendar UID, derived from fixture identity rather than
    /// randomness so re-exporting an unchanged fixture is byte-identical.
    pub fn uid(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.id.as_bytes());
        hasher.update(b":");
        hasher.update(self.home_team.as_bytes());
        hasher.update(b":");
        hasher.update(self.away_team.as_bytes());
        let digest = hex::encode(hasher.finalize());
        format!("{}@fixcal", &digest[..16])
    }
}

impl std::fmt::Display for Fixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let framing = if self.is_home { "vs" } else { "@" };
        write!(
            f,
            "{} {} {} ({})",
            self.home_team, framing, self.away_team, self.competition
        )
    }
}
