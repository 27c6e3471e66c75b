//! Service layer for talking to the judge.
//!
//! - `RemoteClient`: what the pipeline needs from the judge
//! - `LeetCodeClient`: the HTTP implementation (REST listing + GraphQL)

mod leetcode;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Problem, Submission, SubmissionDetail, User};

pub use leetcode::LeetCodeClient;

/// Remote judge operations used by the dump pipeline.
///
/// Implementations are expected to be rate limited and may fail
/// transiently; callers wrap them in a `RetryPolicy`.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// One page of the user's submission history, newest first.
    async fn list_submissions(&self, offset: u64, limit: u64) -> Result<Vec<Submission>>;

    /// Code and statistics of a single submission.
    async fn submission_detail(&self, id: u64) -> Result<SubmissionDetail>;

    /// Problem metadata and statement.
    async fn problem(&self, title_slug: &str) -> Result<Problem>;

    /// The account the session belongs to.
    async fn whoami(&self) -> Result<User>;
}
