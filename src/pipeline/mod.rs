//! Pipeline entry points for fixture synchronization.
//!
//! - `diff`: snapshot comparison across builds
//! - `enrich`: TV override loading and merging
//! - `build`: the per-team fetch → merge → diff → save → export orchestrator

pub mod build;
pub mod diff;
pub mod enrich;

pub use build::{run_build, BuildReport, TeamReport, TeamStatus};
pub use diff::{diff_snapshots, ChangedField, FieldChange, FixtureChange, SnapshotDiff};
pub use enrich::{apply_overrides, load_overrides, OverrideFields, OverrideMap};
