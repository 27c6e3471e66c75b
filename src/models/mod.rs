// src/models/mod.rs

//! Domain models for the dumper.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod best;
mod config;
mod problem;
mod submission;

// Re-export all public types
pub use best::BestMap;
pub use config::{
    ArchiveConfig, ClientConfig, Config, PathsConfig, ResolverConfig, RetryConfig, SiteConfig,
};
pub use problem::{Problem, ProblemStats, SimilarQuestion, TopicTag, User};
pub(crate) use problem::embedded_json;
pub use submission::{
    ACCEPTED, CachedSubmission, Distribution, DistributionValue, Submission, SubmissionDetail,
};

/// Operator-maintained list of submissions to leave out of the archive.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SkipConfig {
    #[serde(default)]
    pub skip: Vec<u64>,
}
