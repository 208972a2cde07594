//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::slugify;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Build pipeline behavior settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Remote fixture API settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Teams to build calendars for
    #[serde(default)]
    pub teams: Vec<TeamEntry>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.provider.base_url.trim().is_empty() {
            return Err(AppError::validation("provider.base_url is empty"));
        }
        if self.provider.timeout_secs == 0 {
            return Err(AppError::validation("provider.timeout_secs must be > 0"));
        }
        if self.provider.page_size == 0 {
            return Err(AppError::validation("provider.page_size must be > 0"));
        }
        if self.provider.competitions.is_empty() {
            return Err(AppError::validation("No competitions configured"));
        }
        if self.teams.is_empty() {
            return Err(AppError::validation("No teams configured"));
        }
        for team in &self.teams {
            if team.name.trim().is_empty() {
                return Err(AppError::validation("Team entry without a name"));
            }
            if team.league.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "Team '{}' has no league",
                    team.name
                )));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            provider: ProviderConfig::default(),
            teams: Vec::new(),
        }
    }
}

/// Build pipeline behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Root directory for generated calendars and the manifest
    #[serde(default = "defaults::output_dir")]
    pub output_dir: PathBuf,

    /// Root directory for snapshot cache files
    #[serde(default = "defaults::cache_dir")]
    pub cache_dir: PathBuf,

    /// Path to the TV override document (may be absent on disk)
    #[serde(default = "defaults::overrides_path")]
    pub overrides_path: PathBuf,

    /// Delay between consecutive remote API calls in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// On corrupt cache, refetch from scratch instead of failing the team
    #[serde(default)]
    pub refetch_corrupt: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: defaults::output_dir(),
            cache_dir: defaults::cache_dir(),
            overrides_path: defaults::overrides_path(),
            request_delay_ms: defaults::request_delay(),
            refetch_corrupt: false,
        }
    }
}

/// Remote fixture API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API base URL
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Auth token; usually supplied via the FIXCAL_API_TOKEN env var instead
    #[serde(default)]
    pub api_token: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Fixtures per page when paginating
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// Competition codes to keep; everything else is filtered at the boundary
    #[serde(default = "defaults::competitions")]
    pub competitions: Vec<String>,

    /// Season year filter (e.g. 2025 for the 2025/26 season)
    #[serde(default)]
    pub season: Option<u32>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            api_token: String::new(),
            timeout_secs: defaults::timeout(),
            page_size: defaults::page_size(),
            competitions: defaults::competitions(),
            season: None,
        }
    }
}

/// A team to synchronize and export calendars for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamEntry {
    /// Full team name as the remote API knows it
    pub name: String,

    /// Display name used for slugs and calendar titles
    #[serde(default)]
    pub short_name: Option<String>,

    /// League the team belongs to
    pub league: String,

    /// Provider team id
    pub id: u64,
}

impl TeamEntry {
    /// Name used in output paths and event titles.
    pub fn display_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.name)
    }

    pub fn team_slug(&self) -> String {
        slugify(self.display_name())
    }

    pub fn league_slug(&self) -> String {
        slugify(&self.league)
    }
}

mod defaults {
    use std::path::PathBuf;

    // Build defaults
    pub fn output_dir() -> PathBuf {
        PathBuf::from("public")
    }
    pub fn cache_dir() -> PathBuf {
        PathBuf::from("data/cache/snapshots")
    }
    pub fn overrides_path() -> PathBuf {
        PathBuf::from("data/overrides/tv_overrides.toml")
    }
    pub fn request_delay() -> u64 {
        6000
    }

    // Provider defaults
    pub fn base_url() -> String {
        "https://api.football-data.org/v4/".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn page_size() -> u32 {
        100
    }
    pub fn competitions() -> Vec<String> {
        vec![
            "PL".into(),
            "FA".into(),
            "EC".into(),
            "CL".into(),
            "EL".into(),
            "UEL".into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_team() -> Config {
        Config {
            teams: vec![TeamEntry {
                name: "Acme FC".to_string(),
                short_name: None,
                league: "Premier League".to_string(),
                id: 57,
            }],
            ..Config::default()
        }
    }

    #[test]
    fn validate_accepts_configured_team() {
        assert!(config_with_team().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_teams() {
        assert!(Config::default().validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_page_size() {
        let mut config = config_with_team();
        config.provider.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_team_without_league() {
        let mut config = config_with_team();
        config.teams[0].league = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn team_slugs_derive_from_short_name() {
        let mut team = config_with_team().teams.remove(0);
        assert_eq!(team.team_slug(), "acme-fc");
        team.short_name = Some("Acme".to_string());
        assert_eq!(team.team_slug(), "acme");
        assert_eq!(team.league_slug(), "premier-league");
    }

    #[test]
    fn parses_minimal_toml() {
        let toml = r#"
            [[teams]]
            name = "Acme FC"
            league = "Premier League"
            id = 57
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.teams.len(), 1);
        assert_eq!(config.build.request_delay_ms, 6000);
        assert!(config.validate().is_ok());
    }
}
