// src/config.rs

//! Configuration loading utilities.

use std::env;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Environment variable consulted for the API token when the config file
/// leaves `provider.api_token` empty.
pub const API_TOKEN_ENV: &str = "FIXCAL_API_TOKEN";

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load(path)?;
    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid configuration: {e}")))?;
    Ok(config)
}

/// Resolve the API token from config or environment.
///
/// The config file value wins when set; otherwise falls back to
/// [`API_TOKEN_ENV`]. An empty result is an error because the remote API
/// rejects unauthenticated requests.
pub fn resolve_api_token(config: &Config) -> Result<String> {
    let token = if config.provider.api_token.trim().is_empty() {
        env::var(API_TOKEN_ENV).unwrap_or_default()
    } else {
        config.provider.api_token.clone()
    };

    if token.trim().is_empty() {
        return Err(AppError::config(format!(
            "No API token: set provider.api_token or the {API_TOKEN_ENV} environment variable"
        )));
    }
    Ok(token)
}
