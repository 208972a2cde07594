//! Remote fixture sources.
//!
//! The pipeline only depends on the [`FixtureProvider`] trait; tests feed
//! it scripted providers, production wires up [`FootballDataClient`].

pub mod football_data;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Fixture, TeamEntry};

// Re-export for convenience
pub use football_data::FootballDataClient;

/// One page of fixtures for a team.
#[derive(Debug, Clone, Default)]
pub struct FixturePage {
    pub fixtures: Vec<Fixture>,
    /// Whether another page should be requested
    pub has_more: bool,
}

/// Trait for fixture data sources.
///
/// Implementations convert the remote representation into [`Fixture`]
/// values at this boundary; nothing loosely typed crosses into the
/// pipeline. Callers are responsible for the inter-request delay.
#[async_trait]
pub trait FixtureProvider: Send + Sync {
    /// Fetch one page (0-based) of fixtures for a team.
    async fn fetch_page(&self, team: &TeamEntry, page: u32) -> Result<FixturePage>;
}
