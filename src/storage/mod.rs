//! Storage abstractions for team snapshot persistence.
//!
//! ## Directory layout
//!
//! ```text
//! {root}/
//! └── {league-slug}/
//!     └── {team-slug}/
//!         └── snapshot.json
//! ```
//!
//! A snapshot file is either fully absent or a complete, validated
//! document; writes go through a temp-then-rename commit so an interrupted
//! build never leaves a half-written snapshot behind.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::TeamSnapshot;

// Re-export for convenience
pub use local::LocalSnapshotStore;

/// Trait for snapshot storage backends.
///
/// `load` distinguishes the two non-success outcomes the orchestrator must
/// treat differently: a missing snapshot is `Ok(None)` (first-ever fetch),
/// while an existing-but-invalid file is `Err(AppError::CorruptCache)`.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the snapshot for a team, or `None` when none has been saved.
    async fn load(&self, league_slug: &str, team_slug: &str) -> Result<Option<TeamSnapshot>>;

    /// Validate and atomically persist a snapshot, replacing any previous one.
    async fn save(&self, snapshot: &TeamSnapshot) -> Result<()>;

    /// Whether a snapshot exists for the team.
    async fn exists(&self, league_slug: &str, team_slug: &str) -> bool;

    /// Sorted `(league_slug, team_slug)` pairs of all stored snapshots.
    async fn list(&self) -> Result<Vec<(String, String)>>;
}
