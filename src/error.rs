//! Error types for Klausul.

use thiserror::Error;

/// Library-level error type for Klausul operations.
#[derive(Error, Debug)]
pub enum KlausulError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("EDGAR error: {0}")]
    Edgar(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No document found: {0}")]
    NoDocument(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model selected an undeclared tool: {0}")]
    ToolSelection(String),

    #[error("Tool failed: {0}")]
    ToolFailed(String),

    #[error("Failed to parse model output: {message}")]
    Parse { message: String, raw: String },

    #[error("Agent exceeded maximum turns ({limit})")]
    TurnLimitExceeded { limit: usize },

    #[error("Agent error: {0}")]
    Agent(String),
}

impl KlausulError {
    /// Raw model output attached to a parse failure, if any.
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            KlausulError::Parse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Result type alias for Klausul operations.
pub type Result<T> = std::result::Result<T, KlausulError>;
