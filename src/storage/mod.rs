//! Persistence for the incremental submission cache.
//!
//! ## Directory Structure
//!
//! ```text
//! .leetcode-dump/
//! ├── submissions.json      # Best submissions of the last clean run, newest first
//! └── skip.json             # {"skip": [ids]} maintained by hand, never written
//! ```

pub mod local;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{BestMap, Submission};

// Re-export for convenience
pub use local::LocalStorage;

/// What a previous run left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheState {
    /// Submissions whose code is already in the archive
    pub submissions: Vec<Submission>,
    /// Submission IDs to leave out of the archive
    pub skip: HashSet<u64>,
}

impl CacheState {
    /// Highest cached submission ID, or 0 when nothing is cached.
    pub fn high_water_mark(&self) -> u64 {
        self.submissions.iter().map(|s| s.id).max().unwrap_or(0)
    }
}

/// Trait for submission cache backends.
#[async_trait]
pub trait SubmissionCache: Send + Sync {
    /// Load cached submissions and the skip list. Missing files are an
    /// empty cache, not an error.
    async fn load(&self) -> Result<CacheState>;

    /// Replace the cached submissions with the contents of `best`.
    async fn save(&self, best: &BestMap) -> Result<()>;

    /// Forget all cached submissions. The skip list is kept.
    async fn reset(&self) -> Result<()>;
}
