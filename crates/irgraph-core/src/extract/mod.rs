//! Recovery of a JSON value from free-form model output.
//!
//! Models wrap JSON in prose, markdown fences, or leave trailing commas
//! behind. [`extract_json`] locates the intended value and parses it:
//!
//! 1. a fenced block tagged `json`
//! 2. any fenced block
//! 3. the first balanced `{...}` / `[...]` span in the raw text
//! 4. the whole trimmed text
//!
//! A candidate that fails to parse gets one repair pass (trailing commas
//! removed) before the response is declared malformed.

mod scan;

use regex::{Match, Regex};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

use crate::config::DEFAULT_ERROR_CONTEXT_LENGTH;

pub use scan::{balanced_span, strip_trailing_commas};

/// Matches a markdown fence.
///
/// A multi-line fence only closes on a line starting with backticks, so
/// fences quoted inside JSON strings do not end it. Groups 1 and 2 hold its
/// info line and body; group 3 holds the inside of a single-line fence.
static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```([^\n`]*)\n(.*?)\n[ \t]*```|```([^\n`]*?)```")
        .expect("fence pattern is valid")
});

/// Errors raised while turning model output into structured data.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No parseable JSON could be recovered from the text.
    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String, raw: String },

    /// JSON was recovered but does not have the expected shape.
    #[error("Response does not match the expected structure: {message}")]
    Schema { message: String, raw: String },
}

impl ExtractError {
    /// The original model output, for diagnostics.
    pub fn raw(&self) -> &str {
        match self {
            ExtractError::MalformedResponse { raw, .. } => raw,
            ExtractError::Schema { raw, .. } => raw,
        }
    }

    /// A bounded excerpt of the original output, safe to log.
    pub fn excerpt(&self) -> &str {
        let raw = self.raw();
        let mut end = raw.len().min(DEFAULT_ERROR_CONTEXT_LENGTH);
        while !raw.is_char_boundary(end) {
            end -= 1;
        }
        &raw[..end]
    }
}

/// Where a candidate was found. Reported in debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    JsonFence,
    Fence,
    BalancedSpan,
    WholeText,
}

/// Selects the text most likely to hold the intended JSON value.
pub fn find_candidate(text: &str) -> (CandidateSource, &str) {
    let mut first_fence: Option<&str> = None;

    for caps in FENCE.captures_iter(text) {
        let (tag, body) = match (caps.get(1), caps.get(2), caps.get(3)) {
            (Some(info), Some(body), _) => split_fence(text, info, body),
            (_, _, Some(inner)) => split_single_line(inner.as_str()),
            _ => continue,
        };
        if tag.eq_ignore_ascii_case("json") {
            return (CandidateSource::JsonFence, body.trim());
        }
        if first_fence.is_none() {
            first_fence = Some(body.trim());
        }
    }

    if let Some(body) = first_fence {
        return (CandidateSource::Fence, body);
    }

    if let Some((start, end)) = scan::first_json_span(text) {
        return (CandidateSource::BalancedSpan, &text[start..end]);
    }

    (CandidateSource::WholeText, text.trim())
}

/// Extracts a single JSON value from model output.
pub fn extract_json(text: &str) -> Result<Value, ExtractError> {
    if text.trim().is_empty() {
        return Err(ExtractError::MalformedResponse {
            reason: "empty response".to_string(),
            raw: text.to_string(),
        });
    }

    let (source, candidate) = find_candidate(text);
    tracing::debug!(?source, len = candidate.len(), "json candidate selected");

    match serde_json::from_str::<Value>(candidate) {
        Ok(value) => Ok(value),
        Err(first) => {
            let repaired = strip_trailing_commas(candidate);
            serde_json::from_str::<Value>(&repaired).map_err(|_| {
                ExtractError::MalformedResponse {
                    reason: format!("{:?} candidate is not valid JSON: {}", source, first),
                    raw: text.to_string(),
                }
            })
        }
    }
}

/// Extracts JSON from model output and decodes it into `T`.
pub fn extract_as<T: DeserializeOwned>(text: &str) -> Result<T, ExtractError> {
    let value = extract_json(text)?;
    serde_json::from_value(value).map_err(|e| ExtractError::Schema {
        message: e.to_string(),
        raw: text.to_string(),
    })
}

/// Splits a multi-line fence into its tag and JSON text.
///
/// The info line is the tag, unless it already holds JSON or is `json`
/// followed by JSON, in which case that part joins the body.
fn split_fence<'t>(text: &'t str, info: Match<'t>, body: Match<'t>) -> (&'t str, &'t str) {
    let line = info.as_str().trim_start();
    if line.starts_with(['{', '[', '"']) {
        return ("", &text[info.start()..body.end()]);
    }
    match strip_json_tag(line) {
        Some(rest) if rest.trim().is_empty() => ("json", body.as_str()),
        Some(rest) => ("json", &text[info.end() - rest.len()..body.end()]),
        None => (line.trim_end(), body.as_str()),
    }
}

/// A single-line fence may carry a `json` prefix.
fn split_single_line(inner: &str) -> (&str, &str) {
    match strip_json_tag(inner.trim_start()) {
        Some(rest) => ("json", rest),
        None => ("", inner),
    }
}

/// Returns what follows a leading `json` word, if there is one.
fn strip_json_tag(line: &str) -> Option<&str> {
    let tag = line.get(..4)?;
    if !tag.eq_ignore_ascii_case("json") {
        return None;
    }
    let rest = &line[4..];
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() || matches!(c, '{' | '[' | '"') => Some(rest),
        Some(_) => None,
    }
}
