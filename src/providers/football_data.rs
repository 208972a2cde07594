//! Client for the football-data.org v4 API.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::Result;
use crate::models::{Fixture, FixtureStatus, ProviderConfig, Score, TeamEntry};
use crate::providers::{FixturePage, FixtureProvider};

/// HTTP client for the remote fixture API.
pub struct FootballDataClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    page_size: u32,
    competitions: Vec<String>,
    season: Option<u32>,
}

impl FootballDataClient {
    /// Build a client from provider settings and a resolved API token.
    pub fn new(config: &ProviderConfig, token: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
            page_size: config.page_size,
            competitions: config.competitions.clone(),
            season: config.season,
        })
    }
}

#[async_trait::async_trait]
impl FixtureProvider for FootballDataClient {
    async fn fetch_page(&self, team: &TeamEntry, page: u32) -> Result<FixturePage> {
        let url = format!("{}/teams/{}/matches", self.base_url, team.id);
        let offset = page * self.page_size;

        let mut request = self
            .client
            .get(&url)
            .header("X-Auth-Token", &self.token)
            .query(&[("limit", self.page_size), ("offset", offset)]);
        if let Some(season) = self.season {
            request = request.query(&[("season", season)]);
        }

        log::debug!("Fetching fixtures for {} (page {page})", team.name);
        let response = request.send().await?.error_for_status()?;
        let body: MatchesResponse = response.json().await?;

        let fetched = body.matches.len();
        let fixtures = body
            .matches
            .into_iter()
            .filter(|m| self.competitions.iter().any(|c| c == &m.competition.code))
            .map(|m| m.into_fixture(team))
            .collect();

        Ok(FixturePage {
            fixtures,
            // Pagination is judged on the raw page, before competition
            // filtering drops entries.
            has_more: fetched as u32 == self.page_size,
        })
    }
}

/// Response shapes of the remote API; converted to domain types here and
/// never passed further.
#[derive(Debug, Deserialize)]
struct MatchesResponse {
    #[serde(default)]
    matches: Vec<ApiMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMatch {
    id: u64,
    competition: ApiCompetition,
    #[serde(default)]
    matchday: Option<u32>,
    #[serde(default)]
    utc_date: Option<DateTime<Utc>>,
    home_team: ApiTeam,
    away_team: ApiTeam,
    #[serde(default)]
    venue: Option<String>,
    status: FixtureStatus,
    #[serde(default)]
    score: ApiScore,
}

#[derive(Debug, Deserialize)]
struct ApiCompetition {
    name: String,
    code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTeam {
    #[serde(default)]
    id: Option<u64>,
    name: String,
    #[serde(default)]
    short_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiScore {
    #[serde(default)]
    full_time: ApiScoreValues,
}

#[derive(Debug, Default, Deserialize)]
struct ApiScoreValues {
    #[serde(default)]
    home: Option<u32>,
    #[serde(default)]
    away: Option<u32>,
}

impl ApiTeam {
    fn display_name(&self) -> String {
        self.short_name.clone().unwrap_or_else(|| self.name.clone())
    }
}

impl ApiMatch {
    fn into_fixture(self, team: &TeamEntry) -> Fixture {
        let is_home = self.home_team.id == Some(team.id);
        let score = match (self.score.full_time.home, self.score.full_time.away) {
            (Some(home), Some(away)) => Some(Score { home, away }),
            _ => None,
        };

        Fixture {
            id: self.id.to_string(),
            competition: self.competition.name,
            competition_code: self.competition.code,
            matchday: self.matchday,
            utc_kickoff: self.utc_date,
            home_team: self.home_team.display_name(),
            away_team: self.away_team.display_name(),
            venue: self.venue,
            status: self.status,
            // The feed carries no broadcast data; overrides fill these in.
            televised: false,
            tv: None,
            is_home,
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_team() -> TeamEntry {
        TeamEntry {
            name: "Acme FC".to_string(),
            short_name: None,
            league: "Premier League".to_string(),
            id: 57,
        }
    }

    fn sample_match_json(home_id: u64) -> String {
        format!(
            r#"{{
                "id": 537953,
                "competition": {{ "name": "Premier League", "code": "PL" }},
                "matchday": 27,
                "utcDate": "2026-03-01T15:00:00Z",
                "homeTeam": {{ "id": {home_id}, "name": "Acme Football Club", "shortName": "Acme FC" }},
                "awayTeam": {{ "id": 99, "name": "Rival FC" }},
                "venue": "Acme Park",
                "status": "SCHEDULED",
                "score": {{ "fullTime": {{ "home": null, "away": null }} }}
            }}"#
        )
    }

    #[test]
    fn test_match_converts_to_fixture() {
        let api_match: ApiMatch = serde_json::from_str(&sample_match_json(57)).unwrap();
        let fixture = api_match.into_fixture(&sample_team());

        assert_eq!(fixture.id, "537953");
        assert_eq!(fixture.competition_code, "PL");
        assert_eq!(fixture.matchday, Some(27));
        assert_eq!(fixture.home_team, "Acme FC");
        assert_eq!(fixture.away_team, "Rival FC");
        assert_eq!(fixture.venue.as_deref(), Some("Acme Park"));
        assert_eq!(fixture.status, FixtureStatus::Scheduled);
        assert!(fixture.is_home);
        assert!(fixture.score.is_none());
        assert!(!fixture.televised);
    }

    #[test]
    fn test_away_match_and_played_score() {
        let json = sample_match_json(99).replace(
            r#""fullTime": { "home": null, "away": null }"#,
            r#""fullTime": { "home": 2, "away": 1 }"#,
        );
        let api_match: ApiMatch = serde_json::from_str(&json).unwrap();
        let fixture = api_match.into_fixture(&sample_team());

        assert!(!fixture.is_home);
        assert_eq!(fixture.score, Some(Score { home: 2, away: 1 }));
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let json = r#"{
            "matches": [{
                "id": 1,
                "competition": { "name": "FA Cup", "code": "FA" },
                "homeTeam": { "name": "Acme FC" },
                "awayTeam": { "name": "Cup FC" },
                "status": "POSTPONED"
            }]
        }"#;
        let response: MatchesResponse = serde_json::from_str(json).unwrap();
        let fixture = response.matches.into_iter().next().unwrap().into_fixture(&sample_team());

        assert!(fixture.utc_kickoff.is_none());
        assert!(fixture.venue.is_none());
        assert!(fixture.score.is_none());
        assert_eq!(fixture.status, FixtureStatus::Postponed);
        assert!(!fixture.is_home);
    }
}
