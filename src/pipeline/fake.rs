// src/pipeline/fake.rs

//! In-memory judge for pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{ACCEPTED, Problem, Submission, SubmissionDetail, TopicTag, User};
use crate::services::RemoteClient;

pub(crate) fn accepted(id: u64, slug: &str, lang: &str, runtime: u64) -> Submission {
    Submission {
        id,
        title_slug: slug.to_string(),
        lang: lang.to_string(),
        status_display: ACCEPTED.to_string(),
        runtime,
        timestamp: 1_700_000_000 + id as i64,
    }
}

pub(crate) fn problem(frontend_id: &str, title: &str, slug: &str) -> Problem {
    Problem {
        question_frontend_id: frontend_id.to_string(),
        title: title.to_string(),
        title_slug: slug.to_string(),
        content: Some(format!("<p>Solve <code>{slug}</code>.</p>")),
        difficulty: "Easy".to_string(),
        category_title: Some("Algorithms".to_string()),
        topic_tags: vec![TopicTag {
            name: "Array".to_string(),
            slug: "array".to_string(),
        }],
        note: Some(format!("note for {slug}")),
        stats: None,
        similar_questions: None,
    }
}

pub(crate) struct FakeJudge {
    history: Vec<Submission>,
    problems: HashMap<String, Problem>,
    user: User,
    /// Listing calls that fail before the feed starts answering
    listing_failures: AtomicU32,
    pub(crate) detail_calls: Mutex<Vec<u64>>,
    pub(crate) list_offsets: Mutex<Vec<u64>>,
}

impl FakeJudge {
    /// `history` must be newest first.
    pub(crate) fn new(history: Vec<Submission>) -> Self {
        Self {
            history,
            problems: HashMap::new(),
            user: User {
                username: "alice".to_string(),
                is_signed_in: true,
            },
            listing_failures: AtomicU32::new(0),
            detail_calls: Mutex::new(Vec::new()),
            list_offsets: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_problem(mut self, problem: Problem) -> Self {
        self.problems.insert(problem.title_slug.clone(), problem);
        self
    }

    pub(crate) fn signed_out(mut self) -> Self {
        self.user.is_signed_in = false;
        self
    }

    pub(crate) fn failing_listings(self, count: u32) -> Self {
        self.listing_failures.store(count, Ordering::SeqCst);
        self
    }

    pub(crate) fn detail_calls(&self) -> Vec<u64> {
        self.detail_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteClient for FakeJudge {
    async fn list_submissions(&self, offset: u64, limit: u64) -> Result<Vec<Submission>> {
        self.list_offsets.lock().unwrap().push(offset);
        if self.listing_failures.load(Ordering::SeqCst) > 0 {
            self.listing_failures.fetch_sub(1, Ordering::SeqCst);
            return Err(AppError::api("submissions", "503 Service Unavailable"));
        }
        Ok(self
            .history
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn submission_detail(&self, id: u64) -> Result<SubmissionDetail> {
        self.detail_calls.lock().unwrap().push(id);
        Ok(SubmissionDetail {
            runtime: 4,
            memory: 42_100_000,
            code: format!("solve({id})"),
            runtime_percentile: 90.5,
            memory_percentile: 12.25,
        })
    }

    async fn problem(&self, title_slug: &str) -> Result<Problem> {
        self.problems
            .get(title_slug)
            .cloned()
            .ok_or_else(|| AppError::api("question", format!("no question {title_slug}")))
    }

    async fn whoami(&self) -> Result<User> {
        Ok(self.user.clone())
    }
}
