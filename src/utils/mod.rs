//! Utility functions and helpers.

pub mod http;
pub mod lang;
pub mod log;
pub mod markdown;
pub mod rate_limit;
pub mod retry;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped in relative markdown links: what `encodeURI` escapes,
/// plus parentheses so titles like `Pow(x, n)` do not end the link early.
const URI: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'(')
    .add(b')')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encode a relative path for use inside a markdown link.
pub fn encode_uri(path: &str) -> String {
    utf8_percent_encode(path, URI).to_string()
}

/// Format a byte count with decimal units, e.g. `42.10 MB`.
pub fn readable_memory(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value > 1e3 && unit < UNITS.len() - 1 {
        value /= 1e3;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Directory name for a problem: `1. Two Sum`, with characters that are not
/// valid in file names removed.
pub fn folder_name(frontend_id: &str, title: &str) -> String {
    let raw = format!("{}. {}", frontend_id, title);
    raw.chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Site slug for a problem directory: `1. Two Sum` → `1-two-sum`.
pub fn site_slug(folder: &str) -> String {
    let dotless = match folder.split_once(". ") {
        Some((id, rest)) if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) => {
            format!("{id} {rest}")
        }
        _ => folder.to_string(),
    };
    dotless
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .replace('\'', "")
        .to_lowercase()
}
