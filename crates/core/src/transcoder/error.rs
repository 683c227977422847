//! Error types for the transcoder module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while acquiring input or running a conversion.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// No file, base64 field or URL was provided.
    #[error("no input provided: expected a file upload, base64 field or url")]
    NoInput,

    /// The resolved payload was empty.
    #[error("input payload is empty")]
    EmptyPayload,

    /// A base64 input field could not be decoded.
    #[error("invalid base64 input: {0}")]
    InvalidBase64(String),

    /// Fetching a remote input failed.
    #[error("remote fetch failed: {reason}")]
    FetchFailed { reason: String },

    /// The transcoder binary was not found.
    #[error("ffmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// The external process exited with a non-zero status.
    #[error("conversion failed: {reason}")]
    ProcessFailed {
        reason: String,
        /// Diagnostic-stream text, attached verbatim.
        diagnostics: String,
    },

    /// The process exited successfully but produced no output bytes.
    #[error("conversion produced empty output")]
    EmptyOutput {
        /// Diagnostic-stream text, attached verbatim.
        diagnostics: String,
    },

    /// The process did not finish within the configured deadline.
    #[error("conversion timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// No parsable duration marker was found in the diagnostic stream.
    #[error("duration not found in diagnostics: {reason}")]
    DurationNotFound { reason: String },

    /// I/O failure while staging or reading temporary artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscodeError {
    /// Creates a process failure carrying the diagnostic text verbatim.
    pub fn process_failed(reason: impl Into<String>, diagnostics: impl Into<String>) -> Self {
        Self::ProcessFailed {
            reason: reason.into(),
            diagnostics: diagnostics.into(),
        }
    }

    /// Creates a duration-not-found error.
    pub fn duration_not_found(reason: impl Into<String>) -> Self {
        Self::DurationNotFound {
            reason: reason.into(),
        }
    }

    /// The pipeline stage that failed, for response classification and
    /// metric labels.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::NoInput | Self::EmptyPayload | Self::InvalidBase64(_) | Self::FetchFailed { .. } => {
                "acquisition"
            }
            Self::FfmpegNotFound { .. }
            | Self::ProcessFailed { .. }
            | Self::EmptyOutput { .. }
            | Self::Timeout { .. } => "process",
            Self::DurationNotFound { .. } => "duration_parse",
            Self::Io(_) => "filesystem",
        }
    }

    /// The diagnostic-stream text, when this error carries one.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::ProcessFailed { diagnostics, .. } | Self::EmptyOutput { diagnostics } => {
                Some(diagnostics)
            }
            _ => None,
        }
    }
}
