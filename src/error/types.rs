//! Core error types

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StudyError>;

/// Errors produced by the study assistant core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StudyError {
    /// No MIME type was supplied and none could be inferred from the file name.
    #[error("Unable to determine MIME type for '{0}'. Please provide one.")]
    MimeUnresolved(String),

    /// The remote file store rejected the upload or could not be reached.
    #[error("Upload failed: {message}")]
    UploadError {
        message: String,
        /// HTTP status returned by the file store, when one was received.
        status: Option<u16>,
    },

    /// A single-shot model call failed (network, auth, quota, service errors).
    #[error("Model invocation failed: {message}")]
    ModelInvocationError {
        message: String,
        /// HTTP status returned by the model endpoint, when one was received.
        status: Option<u16>,
    },

    /// A streamed response failed part way through.
    #[error("Stream failed after {} chars: {message}", .partial.chars().count())]
    StreamError {
        message: String,
        /// Cumulative text delivered before the failure.
        partial: String,
    },

    /// No JSON payload could be recovered from free-text model output.
    #[error("Failed to extract JSON: {message}")]
    ExtractionError {
        message: String,
        /// Offending model output, truncated for diagnostics.
        raw: String,
    },

    /// Model output that was expected to be JSON did not parse.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// No API key was configured when the client was built.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Caller-supplied input was rejected before any remote call.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A local file could not be read.
    #[error("IO error: {0}")]
    IoError(String),
}

impl StudyError {
    /// Build an `UploadError` from a message and optional HTTP status.
    pub fn upload(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::UploadError {
            message: message.into(),
            status,
        }
    }

    /// Build a `ModelInvocationError` from a message and optional HTTP status.
    pub fn invocation(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::ModelInvocationError {
            message: message.into(),
            status,
        }
    }

    /// Build a `StreamError` carrying the text received so far.
    pub fn stream(message: impl Into<String>, partial: impl Into<String>) -> Self {
        Self::StreamError {
            message: message.into(),
            partial: partial.into(),
        }
    }

    /// Build an `ExtractionError`; `raw` is truncated to a bounded length.
    pub fn extraction(message: impl Into<String>, raw: &str) -> Self {
        Self::ExtractionError {
            message: message.into(),
            raw: super::helpers::truncate_for_diagnostics(raw, super::helpers::MAX_RAW_TEXT_CHARS),
        }
    }
}
