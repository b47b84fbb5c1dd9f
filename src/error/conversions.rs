//! Conversions from common error types

use super::types::StudyError;

impl From<serde_json::Error> for StudyError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(format!("JSON error: {err}"))
    }
}

impl From<std::io::Error> for StudyError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}
