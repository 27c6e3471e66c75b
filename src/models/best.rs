// src/models/best.rs

//! Best accepted submission per problem and language.

use std::collections::BTreeMap;

use crate::models::{CachedSubmission, Submission};

/// `title_slug → lang → best submission`.
///
/// Both levels are ordered maps so that every pass over the archive visits
/// problems and languages in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BestMap {
    problems: BTreeMap<String, BTreeMap<String, CachedSubmission>>,
}

impl BestMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate for its (problem, language) slot.
    ///
    /// The candidate takes the slot when it is empty or when it beats the
    /// current holder. Returns whether the slot changed.
    pub fn offer(&mut self, candidate: CachedSubmission) -> bool {
        let slot = self
            .problems
            .entry(candidate.submission.title_slug.clone())
            .or_default();

        match slot.get(&candidate.submission.lang) {
            Some(current) if !candidate.submission.beats(&current.submission) => false,
            _ => {
                slot.insert(candidate.submission.lang.clone(), candidate);
                true
            }
        }
    }

    /// Best submission for a problem in a language.
    pub fn get(&self, title_slug: &str, lang: &str) -> Option<&CachedSubmission> {
        self.problems.get(title_slug)?.get(lang)
    }

    /// Iterate problems with their per-language bests.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, CachedSubmission>)> {
        self.problems.iter().map(|(slug, langs)| (slug.as_str(), langs))
    }

    /// Number of problems.
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Number of (problem, language) entries.
    pub fn submission_count(&self) -> usize {
        self.problems.values().map(BTreeMap::len).sum()
    }

    /// Entries whose detail still has to be downloaded.
    pub fn pending_count(&self) -> usize {
        self.problems
            .values()
            .flat_map(BTreeMap::values)
            .filter(|s| !s.cached)
            .count()
    }

    /// Flatten back into plain submissions, newest first.
    pub fn to_submissions(&self) -> Vec<Submission> {
        let mut all: Vec<Submission> = self
            .problems
            .values()
            .flat_map(BTreeMap::values)
            .map(|s| s.submission.clone())
            .collect();
        all.sort_by(|a, b| b.id.cmp(&a.id));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ACCEPTED;

    fn sub(id: u64, slug: &str, lang: &str, runtime: u64, timestamp: i64) -> Submission {
        Submission {
            id,
            title_slug: slug.into(),
            lang: lang.into(),
            status_display: ACCEPTED.into(),
            runtime,
            timestamp,
        }
    }

    #[test]
    fn keeps_most_recent_among_equally_fast() {
        let mut best = BestMap::new();
        assert!(best.offer(CachedSubmission::fresh(sub(1, "two-sum", "rust", 50, 100))));
        assert!(best.offer(CachedSubmission::fresh(sub(2, "two-sum", "rust", 50, 200))));
        assert_eq!(best.get("two-sum", "rust").unwrap().submission.id, 2);
    }

    #[test]
    fn keeps_fastest_over_recent() {
        let mut best = BestMap::new();
        best.offer(CachedSubmission::fresh(sub(1, "two-sum", "rust", 40, 50)));
        assert!(!best.offer(CachedSubmission::fresh(sub(2, "two-sum", "rust", 50, 900))));
        assert_eq!(best.get("two-sum", "rust").unwrap().submission.id, 1);
    }

    #[test]
    fn languages_are_tracked_separately() {
        let mut best = BestMap::new();
        best.offer(CachedSubmission::fresh(sub(1, "two-sum", "rust", 40, 50)));
        best.offer(CachedSubmission::fresh(sub(2, "two-sum", "cpp", 90, 60)));
        best.offer(CachedSubmission::from_cache(sub(3, "3sum", "cpp", 10, 70)));

        assert_eq!(best.len(), 2);
        assert_eq!(best.submission_count(), 3);
        assert_eq!(best.pending_count(), 2);
        let ids: Vec<u64> = best.to_submissions().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
