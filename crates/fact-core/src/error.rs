//! Error types for fact-core

use thiserror::Error;

/// Main error type for fact-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("LLM API error: {0}")]
    LlmApi(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Calendar error: {0}")]
    Calendar(#[from] fact_calendar::CalendarError),

    #[error("Competition not found: {0}")]
    CompetitionNotFound(String),

    #[error("Team request not found: {0}")]
    RequestNotFound(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for fact-core
pub type Result<T> = std::result::Result<T, Error>;
