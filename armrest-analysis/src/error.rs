//! Error types for host-side analysis

use std::io;

use armrest_core::TelemetryParseError;
use thiserror::Error;

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Analysis errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Reading a trial file or stream failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A telemetry line could not be decoded
    #[error("Line {line}: {error}")]
    Record {
        /// 1-based line number
        line: usize,
        /// Decoding failure
        error: TelemetryParseError,
    },

    /// File name is not `{subject}_{task}_rep{n}.csv`
    #[error("Invalid trial file name: {0}")]
    InvalidFileName(String),

    /// Task name outside the protocol
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    /// Feature export failed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
