//! Generated artifacts: iCalendar files and the web manifest.

pub mod ics;
pub mod manifest;

use std::path::Path;

use tokio::io::AsyncWriteExt;

use crate::error::Result;

/// Relative path of a competition calendar below the output root.
///
/// Also the `url` the manifest hands to the web frontend, which treats it
/// as relative to its own origin.
pub fn calendar_rel_path(league_slug: &str, team_slug: &str, comp_code_slug: &str) -> String {
    format!("calendars/{league_slug}/{team_slug}/{team_slug}.{comp_code_slug}.ics")
}

/// Write an output artifact atomically (write to temp, then rename).
///
/// Calendars and the manifest get the same crash discipline as snapshots: a
/// reader never observes a half-written file.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = path.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, &path).await?;
    Ok(())
}
