// src/models/problem.rs

//! Problem metadata and the signed-in user.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

/// A problem as returned by the `question` GraphQL query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub question_frontend_id: String,
    pub title: String,
    #[serde(default)]
    pub title_slug: String,
    /// Statement as HTML; paid-only problems come back without one
    #[serde(default)]
    pub content: Option<String>,
    pub difficulty: String,
    #[serde(default)]
    pub category_title: Option<String>,
    #[serde(default)]
    pub topic_tags: Vec<TopicTag>,
    /// The user's personal note
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "embedded_json")]
    pub stats: Option<ProblemStats>,
    #[serde(default, deserialize_with = "embedded_json")]
    pub similar_questions: Option<Vec<SimilarQuestion>>,
}

impl Problem {
    /// Frontend ID as a number, for ordering the summary table.
    pub fn number(&self) -> u64 {
        self.question_frontend_id.parse().unwrap_or(u64::MAX)
    }

    /// `1. Two Sum`
    pub fn display_title(&self) -> String {
        format!("{}. {}", self.question_frontend_id, self.title)
    }

    /// Tags rendered as inline code, comma separated.
    pub fn tag_line(&self) -> String {
        self.topic_tags
            .iter()
            .map(|t| format!("`{}`", t.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicTag {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStats {
    pub total_accepted: String,
    pub total_submission: String,
    #[serde(default)]
    pub total_accepted_raw: u64,
    #[serde(default)]
    pub total_submission_raw: u64,
    pub ac_rate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SimilarQuestion {
    pub title: String,
    pub title_slug: String,
    pub difficulty: String,
}

/// The account the session belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub username: String,
    pub is_signed_in: bool,
}

/// Decode a field the API ships as a JSON document inside a string.
pub(crate) fn embedded_json<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
