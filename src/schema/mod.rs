//! Structured output schema for the agent's final answer.
//!
//! The model is told the exact JSON shape it must produce through
//! [`format_instructions`], and its answer is validated with [`parse`].
//! Validation is strict: a missing required field, a wrongly typed value or
//! an unknown field rejects the whole answer.

mod summary;

pub use summary::{ClauseAnalysis, ContractSummary};

use crate::error::{KlausulError, Result};

const INSTRUCTIONS_PREAMBLE: &str = "The output must be a single JSON object that conforms to the JSON schema below. \
Fields marked as required must be present, no other fields are allowed, and nullable fields may be null.";

/// Formatting instructions for the model, derived from [`ContractSummary`].
///
/// Deterministic: the same build always produces the same string.
pub fn format_instructions() -> String {
    let schema = schemars::schema_for!(ContractSummary);
    // A derived schema always serializes; fall back to the empty object rather than panic.
    let schema_json = serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string());

    format!(
        "{}\n\nHere is the output schema:\n```json\n{}\n```",
        INSTRUCTIONS_PREAMBLE, schema_json
    )
}

/// Validate raw model output against the [`ContractSummary`] shape.
///
/// A surrounding Markdown code fence (optionally tagged `json`) is removed
/// first. On failure the error carries the original text untouched.
pub fn parse(raw: &str) -> Result<ContractSummary> {
    let body = strip_code_fence(raw);

    serde_json::from_str(body).map_err(|e| KlausulError::Parse {
        message: e.to_string(),
        raw: raw.to_string(),
    })
}

/// Remove a leading ```` ``` ```` / ```` ```json ```` marker and a trailing
/// ```` ``` ```` marker, if present.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);

    rest.trim()
}
