//! Error types for fact-calendar

use thiserror::Error;

/// fact-calendar error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    #[error("Invalid year: {0}")]
    InvalidYear(i32),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CalendarError>;
