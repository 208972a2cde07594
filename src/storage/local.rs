//! Local filesystem snapshot store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::TeamSnapshot;
use crate::storage::SnapshotStore;
use crate::utils::slugify;

const SNAPSHOT_FILE: &str = "snapshot.json";

/// Filesystem-backed snapshot store rooted at a cache directory.
///
/// Tests point the root at a temporary directory; production uses the
/// configured cache dir. All writes are temp-then-rename.
#[derive(Debug, Clone)]
pub struct LocalSnapshotStore {
    root_dir: PathBuf,
}

impl LocalSnapshotStore {
    /// Create a store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    fn snapshot_path(&self, league_slug: &str, team_slug: &str) -> PathBuf {
        self.root_dir
            .join(league_slug)
            .join(team_slug)
            .join(SNAPSHOT_FILE)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("json.tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// List the subdirectories of a directory, sorted by name.
    async fn subdirs(&self, path: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = match tokio::fs::read_dir(path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(AppError::Io(e)),
        };

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                if let Ok(name) = entry.file_name().into_string() {
                    names.push(name);
                }
            }
        }

        names.sort();
        Ok(names)
    }
}

#[async_trait]
impl SnapshotStore for LocalSnapshotStore {
    async fn load(&self, league_slug: &str, team_slug: &str) -> Result<Option<TeamSnapshot>> {
        let path = self.snapshot_path(league_slug, team_slug);
        let Some(bytes) = self.read_bytes(&path).await? else {
            return Ok(None);
        };

        let snapshot: TeamSnapshot = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::corrupt_cache(team_slug, format!("unparseable snapshot: {e}")))?;

        snapshot
            .validate()
            .map_err(|e| AppError::corrupt_cache(team_slug, e))?;

        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &TeamSnapshot) -> Result<()> {
        snapshot.validate()?;

        // Serialize fully in memory before touching any persisted state.
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let path = self.snapshot_path(&slugify(&snapshot.league), &snapshot.slug);
        self.write_bytes(&path, &bytes).await?;

        log::info!(
            "Saved snapshot for {} ({} fixtures)",
            snapshot.team,
            snapshot.fixture_count()
        );
        Ok(())
    }

    async fn exists(&self, league_slug: &str, team_slug: &str) -> bool {
        self.snapshot_path(league_slug, team_slug).exists()
    }

    async fn list(&self) -> Result<Vec<(String, String)>> {
        let mut teams = Vec::new();
        for league in self.subdirs(&self.root_dir).await? {
            let league_dir = self.root_dir.join(&league);
            for team in self.subdirs(&league_dir).await? {
                if league_dir.join(&team).join(SNAPSHOT_FILE).exists() {
                    teams.push((league.clone(), team));
                }
            }
        }
        Ok(teams)
    }
}
