//! Data model shared by uploads, conversations and the quiz protocol

pub mod conversation;
pub mod file;
pub mod quiz;

pub use conversation::{ChatMessage, Conversation, ConversationTurn, Part, Role};
pub use file::{FileHandle, FileSource, UploadRequest};
pub use quiz::{AnswerEvaluation, AnswerRecord, Evaluation, QuizItem};

/// Options for a single model call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvokeOptions {
    /// Ask the service to produce output of this MIME type
    /// (e.g. `application/json`).
    pub response_mime_type: Option<String>,
}

impl InvokeOptions {
    /// Request JSON-formatted output.
    pub fn json() -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
        }
    }
}
