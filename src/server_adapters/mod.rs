//! Server adapters: expose the study workflows over HTTP
//!
//! Framework-agnostic pieces live here: request/response bodies, error to
//! status mapping and the conversion of a cumulative stream back into a
//! plain-text body stream. The Axum router is in [`axum`] (requires the
//! `server-adapters` feature).
//!
//! ## Routes
//!
//! | Route | Body | Response |
//! |---|---|---|
//! | `POST /llm_upload_file` | `{files: [{uri, mimeType?}]}` | `{uploadedFiles: [{uri, mimeType, error?}]}` |
//! | `POST /llm_response` | `{conversation: [{role, text}], files}` | `{response}` |
//! | `POST /llm_response_stream` | same as above | chunked `text/plain` |
//! | `POST /llm_get_quiz` | `{files, numQuestions?}` | `{response: [QuizItem]}` |
//! | `POST /llm_eval_quiz` | `{QandA: [AnswerRecord]}` | `{response: [Evaluation]}` |

use std::path::{Path, PathBuf};
use std::pin::Pin;

use futures::Stream;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCategory, StudyError};
use crate::streaming::CumulativeStream;
use crate::types::{AnswerRecord, ChatMessage, FileHandle};

#[cfg(feature = "server-adapters")]
pub mod axum;

/// Convert a cumulative stream into a stream of increments for a chunked
/// text body. Empty increments are dropped; the first error is passed
/// through and ends the stream.
pub fn text_stream(
    mut stream: CumulativeStream,
) -> Pin<Box<dyn Stream<Item = Result<String, StudyError>> + Send>> {
    let s = async_stream::try_stream! {
        while let Some(item) = stream.next().await {
            let update = item?;
            if !update.delta.is_empty() {
                yield update.delta;
            }
        }
    };
    Box::pin(s)
}

/// HTTP status for an error: input problems are the caller's fault, the
/// rest is reported as a server error.
pub fn status_for(error: &StudyError) -> u16 {
    match error.category() {
        ErrorCategory::Input => 400,
        _ => 500,
    }
}

/// `{error}` body returned on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&StudyError> for ErrorBody {
    fn from(error: &StudyError) -> Self {
        Self {
            error: error.user_message(),
        }
    }
}

/// `{response}` body returned on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody<T> {
    pub response: T,
}

/// A file previously stored in the local upload directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalFileRef {
    /// Local path or name; only its base name is used
    pub uri: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadFilesBody {
    pub files: Option<Vec<LocalFileRef>>,
}

/// Outcome for one requested upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub uri: Option<String>,
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadedFile {
    pub fn ok(handle: FileHandle) -> Self {
        Self {
            uri: Some(handle.uri),
            mime_type: Some(handle.mime_type),
            error: None,
        }
    }

    pub fn failed(mime_type: Option<String>, error: &StudyError) -> Self {
        Self {
            uri: None,
            mime_type,
            error: Some(error.user_message()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFilesResponse {
    pub uploaded_files: Vec<UploadedFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatBody {
    pub conversation: Option<Vec<ChatMessage>>,
    #[serde(default)]
    pub files: Vec<FileHandle>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizBody {
    #[serde(default)]
    pub files: Vec<FileHandle>,
    pub num_questions: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EvalQuizBody {
    #[serde(rename = "QandA", default)]
    pub qanda: Vec<AnswerRecord>,
}

/// Resolve a client-supplied name to a file inside `upload_dir`.
///
/// Only the final path component is kept, so `../../etc/passwd` resolves to
/// `{upload_dir}/passwd`.
pub fn resolve_upload_path(upload_dir: &Path, uri: &str) -> Result<PathBuf, StudyError> {
    let name = Path::new(uri.trim())
        .file_name()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| StudyError::InvalidInput(format!("No file name in '{uri}'")))?;
    Ok(upload_dir.join(name))
}
