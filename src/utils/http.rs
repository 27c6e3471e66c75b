// src/utils/http.rs

//! HTTP client utilities.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::error::{AppError, Result};
use crate::models::ClientConfig;

static CSRF_COOKIE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|;\s*)csrftoken=([^;]+)").expect("csrftoken pattern is valid")
});

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &ClientConfig, headers: HeaderMap) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .default_headers(headers)
        .build()?;
    Ok(client)
}

/// Headers that authenticate every request as the session owner.
pub fn session_headers(base_url: &str, session: &str, csrf_token: &str) -> Result<HeaderMap> {
    let cookie = format!("LEETCODE_SESSION={session}; csrftoken={csrf_token}");

    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, header_value("cookie", &cookie)?);
    headers.insert(header::REFERER, header_value("referer", base_url)?);
    headers.insert("x-csrftoken", header_value("x-csrftoken", csrf_token)?);
    Ok(headers)
}

/// The value is left out of the error, it may carry the session.
fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| AppError::config(format!("{name} header contains invalid characters")))
}

/// Ask the site for a fresh `csrftoken` cookie.
pub async fn fetch_csrf_token(client: &reqwest::Client, base_url: &str) -> Result<String> {
    let url = format!("{}/graphql/", base_url.trim_end_matches('/'));
    let response = client.get(&url).send().await?;

    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(extract_csrf_token)
        .ok_or_else(|| AppError::parse("csrf bootstrap", "no csrftoken cookie in response"))
}

/// Pull the token out of a `Set-Cookie` header value.
pub fn extract_csrf_token(set_cookie: &str) -> Option<String> {
    CSRF_COOKIE
        .captures(set_cookie)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|token| !token.is_empty())
}
