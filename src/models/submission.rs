// src/models/submission.rs

//! Submission records as listed by the remote judge and as persisted in the cache.

use serde::{Deserialize, Serialize};

/// Status text the judge uses for a passing submission.
pub const ACCEPTED: &str = "Accepted";

/// A single submission from the user's history.
///
/// Submission IDs are assigned by the judge in increasing order, so a larger
/// `id` always means a later submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: u64,
    pub title_slug: String,
    pub lang: String,
    pub status_display: String,
    /// Runtime in milliseconds
    pub runtime: u64,
    /// Unix seconds
    pub timestamp: i64,
}

impl Submission {
    /// Whether the judge accepted this submission.
    pub fn is_accepted(&self) -> bool {
        self.status_display == ACCEPTED
    }

    /// Whether this submission should replace `other` as the best one for
    /// the same problem and language: faster wins, and among equally fast
    /// ones the most recent wins.
    pub fn beats(&self, other: &Submission) -> bool {
        self.runtime < other.runtime
            || (self.runtime == other.runtime && self.timestamp > other.timestamp)
    }
}

/// A submission plus whether its detail (code) was already downloaded on a
/// previous run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSubmission {
    pub submission: Submission,
    pub cached: bool,
}

impl CachedSubmission {
    /// Wrap a submission restored from the on-disk cache.
    pub fn from_cache(submission: Submission) -> Self {
        Self {
            submission,
            cached: true,
        }
    }

    /// Wrap a submission freshly listed by the remote judge.
    pub fn fresh(submission: Submission) -> Self {
        Self {
            submission,
            cached: false,
        }
    }
}

/// Downloaded detail of one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionDetail {
    /// Runtime in milliseconds
    pub runtime: u64,
    /// Memory in bytes
    pub memory: u64,
    pub code: String,
    /// Share of accepted submissions (percent) that were at least as slow
    pub runtime_percentile: f64,
    /// Share of accepted submissions (percent) that used at least as much memory
    pub memory_percentile: f64,
}

/// Histogram of `(usage, percent)` buckets published by the judge.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Distribution {
    pub distribution: Vec<(DistributionValue, f64)>,
}

/// A bucket key; the judge sends these as strings but numbers are accepted too.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionValue(pub f64);

impl<'de> Deserialize<'de> for DistributionValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self(n)),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map(Self)
                .map_err(|_| serde::de::Error::custom(format!("invalid bucket value {s:?}"))),
        }
    }
}

impl Distribution {
    /// Sum of the buckets whose usage is at or above `value`.
    pub fn percentile_at(&self, value: f64) -> f64 {
        self.distribution
            .iter()
            .filter(|(usage, _)| usage.0 >= value)
            .map(|(_, percent)| percent)
            .sum()
    }
}
