//! Local filesystem cache implementation.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── submissions.json      # JSON array of submissions, descending by id
//! └── skip.json             # {"skip": [...]}
//! ```
//!
//! Writes go to a temp file that is renamed over the target, so an
//! interrupted run leaves the previous cache readable.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{BestMap, SkipConfig, Submission};
use crate::storage::{CacheState, SubmissionCache};

const SUBMISSIONS_KEY: &str = "submissions.json";
const SKIP_KEY: &str = "skip.json";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SubmissionCache for LocalStorage {
    async fn load(&self) -> Result<CacheState> {
        let submissions: Vec<Submission> = match self.read_json(SUBMISSIONS_KEY).await? {
            Some(submissions) => submissions,
            None => {
                log::info!("No submission cache at {}", self.path(SUBMISSIONS_KEY).display());
                Vec::new()
            }
        };

        let skip: SkipConfig = self.read_json(SKIP_KEY).await?.unwrap_or_default();

        log::debug!(
            "Loaded {} cached submissions, {} skipped ids",
            submissions.len(),
            skip.skip.len()
        );

        Ok(CacheState {
            submissions,
            skip: skip.skip.into_iter().collect(),
        })
    }

    async fn save(&self, best: &BestMap) -> Result<()> {
        let submissions = best.to_submissions();
        self.write_json(SUBMISSIONS_KEY, &submissions).await?;
        log::info!(
            "Cache: {} submissions written to {}",
            submissions.len(),
            self.path(SUBMISSIONS_KEY).display()
        );
        Ok(())
    }

    async fn reset(&self) -> Result<()> {
        match tokio::fs::remove_file(self.path(SUBMISSIONS_KEY)).await {
            Ok(()) => {
                log::info!("Submission cache cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}
