//! Structured error handling for record cleansing.
//!
//! Validation outcomes (an invalid email, an unparseable phone number) are not
//! errors; they are reported as flags on a successful result. Only payloads the
//! service cannot interpret at all end up here.

use thiserror::Error;

/// Cleansing error type.
///
/// Messages never contain field values from the payload, so they are safe to log.
#[derive(Debug, Error)]
pub enum CleanseError {
    #[error("Malformed payload: {category} error at line {line}, column {column}")]
    MalformedPayload {
        category: &'static str,
        line: usize,
        column: usize,
    },
}

impl CleanseError {
    /// Classify a JSON decode error without keeping its message, which may echo input.
    #[must_use]
    pub fn from_json(error: &serde_json::Error) -> Self {
        let category = match error.classify() {
            serde_json::error::Category::Io => "io",
            serde_json::error::Category::Syntax => "syntax",
            serde_json::error::Category::Data => "data",
            serde_json::error::Category::Eof => "eof",
        };
        Self::MalformedPayload {
            category,
            line: error.line(),
            column: error.column(),
        }
    }
}

/// Result type alias for cleansing operations.
pub type CleanseResult<T> = Result<T, CleanseError>;
