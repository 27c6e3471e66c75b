// src/pipeline/resolve.rs

//! Incremental best-submission resolution.
//!
//! Merges the cached submissions of the previous run with the pages of the
//! remote history that are newer than the cache, keeping the best accepted
//! submission per problem and language.
//!
//! The scan relies on the judge listing submissions newest first with
//! increasing IDs. Pages are fetched strictly in offset order and the scan
//! stops as soon as it reaches history the cache already covers.

use std::collections::HashSet;
use std::future::Future;

use crate::error::Result;
use crate::models::{BestMap, CachedSubmission, ResolverConfig, Submission};

/// Computes a [`BestMap`] from the cache and the remote history.
#[derive(Debug, Clone)]
pub struct BestSubmissionResolver {
    page_size: u64,
    max_pages: u64,
}

impl BestSubmissionResolver {
    pub fn new(page_size: u64, max_pages: u64) -> Self {
        Self {
            page_size: page_size.max(1),
            max_pages,
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(config.page_size, config.max_pages)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Resolve the best submissions.
    ///
    /// `fetch_page` is called with increasing offsets and must return the
    /// page of history starting there; its errors abort the resolution.
    pub async fn resolve<F, Fut>(
        &self,
        mut cache: Vec<Submission>,
        skip: &HashSet<u64>,
        mut fetch_page: F,
    ) -> Result<BestMap>
    where
        F: FnMut(u64) -> Fut,
        Fut: Future<Output = Result<Vec<Submission>>>,
    {
        cache.sort_by(|a, b| b.id.cmp(&a.id));
        let prev_last = cache.first().map_or(0, |s| s.id);

        let mut seen: HashSet<u64> = HashSet::with_capacity(cache.len());
        let mut best = BestMap::new();
        for submission in cache {
            seen.insert(submission.id);
            if skip.contains(&submission.id) {
                log::debug!("Skipping cached submission {}", submission.id);
                continue;
            }
            best.offer(CachedSubmission::from_cache(submission));
        }

        log::debug!(
            "Seeded {} problems from cache, high-water mark {}",
            best.len(),
            prev_last
        );

        let mut fresh = 0usize;
        let mut exhausted = false;
        for page_index in 0..self.max_pages {
            let offset = page_index * self.page_size;
            let page = fetch_page(offset).await?;

            if page.iter().all(|s| seen.contains(&s.id)) {
                log::debug!("Page at offset {} holds nothing new, stopping", offset);
                exhausted = true;
                break;
            }

            for submission in &page {
                if seen.contains(&submission.id)
                    || skip.contains(&submission.id)
                    || submission.id <= prev_last
                {
                    continue;
                }
                seen.insert(submission.id);
                fresh += 1;

                if submission.is_accepted() {
                    best.offer(CachedSubmission::fresh(submission.clone()));
                }
            }

            let short_page = (page.len() as u64) < self.page_size;
            let reached_cache = page.last().is_some_and(|s| s.id <= prev_last);
            if short_page || reached_cache {
                exhausted = true;
                break;
            }
        }

        if !exhausted {
            log::warn!(
                "Stopped after {} pages; older submissions may be missing (raise resolver.max_pages)",
                self.max_pages
            );
        }

        log::info!(
            "Resolved {} problems ({} submissions, {} new since last run)",
            best.len(),
            best.submission_count(),
            fresh
        );

        Ok(best)
    }
}

impl Default for BestSubmissionResolver {
    fn default() -> Self {
        Self::from_config(&ResolverConfig::default())
    }
}
