// src/error.rs

//! Unified error handling for the fixture pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
///
/// A missing snapshot is deliberately NOT an error: `SnapshotStore::load`
/// returns `Ok(None)` so callers can tell a first-ever fetch apart from
/// cache damage, which surfaces as [`AppError::CorruptCache`].
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Cache file exists but is unreadable or structurally invalid
    #[error("Corrupt snapshot cache for {team}: {message}")]
    CorruptCache { team: String, message: String },

    /// Data validation error (rejected write, previous state preserved)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote fixture API failure for one team
    #[error("Remote fetch failed for {team}: {message}")]
    RemoteFetch { team: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Create a corrupt-cache error for a team.
    pub fn corrupt_cache(team: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::CorruptCache {
            team: team.into(),
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a remote-fetch error with team context.
    pub fn remote_fetch(team: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::RemoteFetch {
            team: team.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
