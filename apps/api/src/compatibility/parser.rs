//! Response parsing: pulls the compatibility JSON out of free-form model text
//! and validates it against `CompatibilityResult`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::llm_client::strip_json_fences;
use crate::models::compatibility::CompatibilityResult;

#[derive(Debug, Error)]
pub enum ResponseParseError {
    #[error("Response is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Response does not match the result schema: {0}")]
    Schema(#[source] serde_json::Error),

    #[error("{field} must be between 0 and 100, got {value}")]
    ScoreOutOfRange { field: &'static str, value: f64 },
}

/// First brace-delimited span, shortest match.
static JSON_OBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[\s\S]*?\}").unwrap());

/// Locates the JSON candidate in the model's text.
///
/// The first brace-delimited substring wins. Without one, the whole text is
/// used, minus any Markdown code fences.
pub fn extract_json_candidate(text: &str) -> &str {
    match JSON_OBJECT.find(text) {
        Some(m) => m.as_str(),
        None => strip_json_fences(text),
    }
}

/// Parses and validates the model's answer.
pub fn parse_compatibility(text: &str) -> Result<CompatibilityResult, ResponseParseError> {
    let candidate = extract_json_candidate(text);
    let value: Value = serde_json::from_str(candidate).map_err(ResponseParseError::InvalidJson)?;
    let result: CompatibilityResult =
        serde_json::from_value(value).map_err(ResponseParseError::Schema)?;

    check_score("matchScore", result.match_score)?;
    check_score("referralScore", result.referral_score)?;

    Ok(result)
}

fn check_score(field: &'static str, value: f64) -> Result<(), ResponseParseError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ResponseParseError::ScoreOutOfRange { field, value })
    }
}
