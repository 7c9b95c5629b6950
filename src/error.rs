//! Error types
//!
//! Tracker operations never fail; errors only come from the edges of the
//! crate (loading options or traces, binding to an async runtime).

use thiserror::Error;

/// Errors that can occur outside the tracking loop itself
#[derive(Error, Debug)]
pub enum IntentError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("No async runtime: {0}")]
    NoRuntime(String),

    #[error("Invalid trace: {0}")]
    InvalidTrace(String),
}

/// Result type for fallible crate operations
pub type IntentResult<T> = Result<T, IntentError>;
