//! Error helper utilities for user-facing error handling.
//!
//! Coarse categories let an HTTP layer choose a status code without matching
//! every variant, and `user_message` gives a short text that is safe to put
//! in a response body.

use super::types::StudyError;

/// Upper bound on the raw model text kept inside an `ExtractionError`.
pub const MAX_RAW_TEXT_CHARS: usize = 500;

/// Error category for presentation (coarse-grained)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Client construction problems (missing key).
    Configuration,
    /// Rejected before any remote call.
    Input,
    /// Network or streaming failures.
    Transport,
    /// The remote service answered with an error.
    Remote,
    /// Model output could not be turned into the expected structure.
    Parsing,
}

impl StudyError {
    /// Get the coarse category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            StudyError::MissingCredential(_) => ErrorCategory::Configuration,
            StudyError::MimeUnresolved(_)
            | StudyError::InvalidInput(_)
            | StudyError::IoError(_) => ErrorCategory::Input,
            StudyError::StreamError { .. } => ErrorCategory::Transport,
            StudyError::UploadError { status, .. }
            | StudyError::ModelInvocationError { status, .. } => {
                if status.is_some() {
                    ErrorCategory::Remote
                } else {
                    ErrorCategory::Transport
                }
            }
            StudyError::ExtractionError { .. } | StudyError::ParseError(_) => {
                ErrorCategory::Parsing
            }
        }
    }

    /// HTTP status returned by the remote service, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            StudyError::UploadError { status, .. }
            | StudyError::ModelInvocationError { status, .. } => *status,
            _ => None,
        }
    }

    /// Text delivered before a stream failed.
    pub fn partial_text(&self) -> Option<&str> {
        match self {
            StudyError::StreamError { partial, .. } => Some(partial.as_str()),
            _ => None,
        }
    }

    /// Model output attached to an extraction failure.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            StudyError::ExtractionError { raw, .. } => Some(raw.as_str()),
            _ => None,
        }
    }

    /// Whether a caller-side retry has a reasonable chance of succeeding.
    ///
    /// This is advisory only; the crate itself never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            StudyError::StreamError { .. } => true,
            StudyError::UploadError { status, .. }
            | StudyError::ModelInvocationError { status, .. } => match status {
                None => true,
                Some(code) => *code == 429 || *code >= 500,
            },
            _ => false,
        }
    }

    /// Short message suitable for end users.
    pub fn user_message(&self) -> String {
        match self {
            StudyError::MimeUnresolved(_) => {
                "The file type could not be determined. Please specify it.".to_string()
            }
            StudyError::UploadError { .. } => "The file could not be uploaded.".to_string(),
            StudyError::ModelInvocationError { status: Some(429), .. } => {
                "The assistant is busy right now. Please try again shortly.".to_string()
            }
            StudyError::ModelInvocationError { .. } => {
                "The assistant could not produce a response.".to_string()
            }
            StudyError::StreamError { .. } => "The response was interrupted.".to_string(),
            StudyError::ExtractionError { .. } | StudyError::ParseError(_) => {
                "The assistant returned an unexpected format.".to_string()
            }
            StudyError::MissingCredential(_) => "The assistant is not configured.".to_string(),
            StudyError::InvalidInput(msg) => msg.clone(),
            StudyError::IoError(_) => "The file could not be read.".to_string(),
        }
    }
}

/// Truncate `text` to at most `max` characters, marking the cut.
pub fn truncate_for_diagnostics(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((idx, _)) => format!("{}...[truncated]", &text[..idx]),
    }
}
