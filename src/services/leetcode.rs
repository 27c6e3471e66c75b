// src/services/leetcode.rs

//! LeetCode HTTP client.
//!
//! Submission history comes from the REST listing endpoint; problems,
//! submission details and the signed-in user come from GraphQL. Every
//! response is decoded into typed structs and anything unexpected is
//! reported as `AppError::Parse`.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{
    ClientConfig, Distribution, Problem, Submission, SubmissionDetail, User, embedded_json,
};
use crate::services::RemoteClient;
use crate::utils::http::{create_async_client, fetch_csrf_token, session_headers};
use crate::utils::rate_limit::RateLimiter;

const QUESTION_QUERY: &str = r#"
query questionData($titleSlug: String!) {
    question(titleSlug: $titleSlug) {
        questionFrontendId title titleSlug content difficulty categoryTitle
        stats similarQuestions note
        topicTags { name slug }
    }
}"#;

const SUBMISSION_DETAILS_QUERY: &str = r#"
query submissionDetails($submissionId: Int!) {
    submissionDetails(submissionId: $submissionId) {
        runtime memory code runtimeDistribution memoryDistribution
    }
}"#;

const USER_STATUS_QUERY: &str = r#"
query globalData {
    userStatus { username isSignedIn }
}"#;

/// Authenticated, rate-limited LeetCode client.
pub struct LeetCodeClient {
    client: reqwest::Client,
    base_url: Url,
    limiter: RateLimiter,
}

impl LeetCodeClient {
    /// Bootstrap a CSRF token and build a client that carries the session.
    pub async fn connect(config: &ClientConfig, session: &str) -> Result<Self> {
        if session.trim().is_empty() {
            return Err(AppError::auth(
                "no session given (use --session or LEETCODE_SESSION)",
            ));
        }

        let base_url = Url::parse(&config.base_url)?;
        let limiter = RateLimiter::new(config.rate_limit()?);

        let bootstrap = create_async_client(config, HeaderMap::new())?;
        limiter.acquire().await;
        let csrf_token = fetch_csrf_token(&bootstrap, &config.base_url).await?;
        log::debug!("Obtained csrf token");

        let headers = session_headers(&config.base_url, session.trim(), &csrf_token)?;
        let client = create_async_client(config, headers)?;

        Ok(Self {
            client,
            base_url,
            limiter,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn graphql<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        self.limiter.acquire().await;
        log::debug!("GraphQL {} {}", operation, variables);

        let response = self
            .client
            .post(self.endpoint("/graphql/")?)
            .json(&json!({
                "operationName": operation,
                "query": query,
                "variables": variables,
            }))
            .send()
            .await?;

        let body = checked_body(operation, response).await?;
        decode_graphql(operation, &body)
    }
}

#[async_trait]
impl RemoteClient for LeetCodeClient {
    async fn list_submissions(&self, offset: u64, limit: u64) -> Result<Vec<Submission>> {
        self.limiter.acquire().await;
        log::debug!("Listing submissions offset={} limit={}", offset, limit);

        let mut url = self.endpoint("/api/submissions/")?;
        url.query_pairs_mut()
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &limit.to_string());

        let response = self.client.get(url).send().await?;
        let body = checked_body("submissions", response).await?;
        decode_submission_page(&body)
    }

    async fn submission_detail(&self, id: u64) -> Result<SubmissionDetail> {
        let data: SubmissionDetailsData = self
            .graphql(
                "submissionDetails",
                SUBMISSION_DETAILS_QUERY,
                json!({ "submissionId": id }),
            )
            .await?;

        data.submission_details
            .map(RawDetail::into_detail)
            .ok_or_else(|| AppError::parse("submissionDetails", format!("no detail for {id}")))
    }

    async fn problem(&self, title_slug: &str) -> Result<Problem> {
        let data: QuestionData = self
            .graphql(
                "questionData",
                QUESTION_QUERY,
                json!({ "titleSlug": title_slug }),
            )
            .await?;

        let mut problem = data
            .question
            .ok_or_else(|| AppError::api("questionData", format!("no problem {title_slug:?}")))?;
        if problem.title_slug.is_empty() {
            problem.title_slug = title_slug.to_string();
        }
        Ok(problem)
    }

    async fn whoami(&self) -> Result<User> {
        let data: UserStatusData = self
            .graphql("globalData", USER_STATUS_QUERY, json!({}))
            .await?;
        Ok(data.user_status)
    }
}

/// Read the body, mapping rejected sessions to `Auth` and other failures to `Api`.
async fn checked_body(context: &str, response: Response) -> Result<String> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(AppError::auth(format!("{context} answered {status}")));
    }
    let body = response.text().await?;
    if !status.is_success() {
        let snippet: String = body.chars().take(200).collect();
        return Err(AppError::api(context, format!("{status}: {snippet}")));
    }
    Ok(body)
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

fn decode_graphql<T: DeserializeOwned>(operation: &str, body: &str) -> Result<T> {
    let envelope: GraphQlResponse<T> =
        serde_json::from_str(body).map_err(|e| AppError::parse(operation, e))?;

    if !envelope.errors.is_empty() {
        let messages: Vec<&str> = envelope.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(AppError::api(operation, messages.join("; ")));
    }

    envelope
        .data
        .ok_or_else(|| AppError::parse(operation, "response has no data"))
}

#[derive(Debug, Deserialize)]
struct QuestionData {
    question: Option<Problem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserStatusData {
    user_status: User,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionDetailsData {
    submission_details: Option<RawDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetail {
    runtime: u64,
    memory: u64,
    code: String,
    #[serde(default, deserialize_with = "embedded_json")]
    runtime_distribution: Option<Distribution>,
    #[serde(default, deserialize_with = "embedded_json")]
    memory_distribution: Option<Distribution>,
}

impl RawDetail {
    /// Percentiles come from the published histograms; memory buckets are
    /// in thousands of the reported unit.
    fn into_detail(self) -> SubmissionDetail {
        let runtime_percentile = self
            .runtime_distribution
            .as_ref()
            .map_or(0.0, |d| d.percentile_at(self.runtime as f64));
        let memory_percentile = self
            .memory_distribution
            .as_ref()
            .map_or(0.0, |d| d.percentile_at(self.memory as f64 / 1000.0));

        SubmissionDetail {
            runtime: self.runtime,
            memory: self.memory,
            code: self.code,
            runtime_percentile,
            memory_percentile,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SubmissionPage {
    submissions_dump: Vec<RawSubmission>,
}

#[derive(Debug, Deserialize)]
struct RawSubmission {
    id: u64,
    title_slug: String,
    lang: String,
    status_display: String,
    runtime: String,
    timestamp: i64,
}

impl TryFrom<RawSubmission> for Submission {
    type Error = AppError;

    fn try_from(raw: RawSubmission) -> Result<Self> {
        let runtime = match parse_runtime(&raw.runtime) {
            Some(ms) => ms,
            None if raw.status_display == crate::models::ACCEPTED => {
                return Err(AppError::parse(
                    "submissions",
                    format!("accepted submission {} has runtime {:?}", raw.id, raw.runtime),
                ));
            }
            // Rejected submissions are never ranked.
            None => u64::MAX,
        };

        Ok(Submission {
            id: raw.id,
            title_slug: raw.title_slug,
            lang: raw.lang,
            status_display: raw.status_display,
            runtime,
            timestamp: raw.timestamp,
        })
    }
}

fn decode_submission_page(body: &str) -> Result<Vec<Submission>> {
    let page: SubmissionPage =
        serde_json::from_str(body).map_err(|e| AppError::parse("submissions", e))?;
    page.submissions_dump
        .into_iter()
        .map(Submission::try_from)
        .collect()
}

/// `"52 ms"` → 52.
fn parse_runtime(text: &str) -> Option<u64> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
