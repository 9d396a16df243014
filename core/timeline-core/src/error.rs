//! Error types for timeline-core operations.
//!
//! Almost every failure in the pipeline is recoverable: callers downgrade
//! these errors to empty or default values at the documented boundaries.

use std::time::Duration;

/// All errors that can occur in timeline-core operations.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    // ─────────────────────────────────────────────────────────────────────
    // External Command Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Command execution failed: {command}: {details}")]
    CommandFailed { command: String, details: String },

    #[error("Command timed out after {timeout:?}: {command}")]
    CommandTimedOut { command: String, timeout: Duration },
}

/// Convenience type alias for Results using TimelineError.
pub type Result<T> = std::result::Result<T, TimelineError>;
