//! # studyai - Gemini integration layer for a study assistant
//!
//! Upload course material to Google Gemini, chat about it with full
//! multi-turn context, stream replies, and run the quiz workflow:
//! summarise files, generate questions with model answers, and grade
//! student answers.
//!
#![deny(unsafe_code)]

//! ## Features
//!
//! - **Capability Separation**: `FileUploader` and `ModelInvoker` traits keep
//!   the workflows independent of the provider.
//! - **Immutable Conversations**: appending a turn returns a new conversation.
//! - **Cumulative Streaming**: callers see the whole reply so far after every
//!   increment; failures carry the partial text.
//! - **Typed Errors**: one `StudyError` enum, no retries behind your back.
//! - **HTTP Surface**: optional Axum router (`server-adapters` feature).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use studyai::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let assistant = StudyAssistant::gemini(GeminiClient::from_env()?);
//!
//!     let notes = assistant.upload(UploadRequest::from_path("lecture.pdf")).await?;
//!     let quiz = assistant.generate_quiz(&[notes], 3).await?;
//!
//!     let records: Vec<_> = quiz
//!         .iter()
//!         .map(|item| AnswerRecord::from_item(item, "my answer"))
//!         .collect();
//!     for evaluation in assistant.evaluate_all_answers(&records).await? {
//!         println!("{}: {}", evaluation.score, evaluation.explanation);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod extract;
pub mod providers;
pub mod quiz;
pub mod server_adapters;
pub mod streaming;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod utils;

pub use error::{Result, StudyError};
pub use providers::gemini::{GeminiBuilder, GeminiClient, GeminiConfig};
pub use quiz::StudyAssistant;

/// Commonly used items
pub mod prelude {
    pub use crate::error::{ErrorCategory, StudyError};
    pub use crate::extract::{BracketScanExtractor, StructuredExtractor};
    pub use crate::providers::gemini::{GeminiBuilder, GeminiClient, GeminiConfig};
    pub use crate::quiz::{DEFAULT_QUIZ_QUESTIONS, DEFAULT_SUMMARY_WORDS, StudyAssistant};
    pub use crate::streaming::{
        CancelHandle, CumulativeStream, StreamUpdate, TextDeltaStream, cumulative, drive,
        make_cancellable,
    };
    pub use crate::traits::{FileUploader, ModelInvoker};
    pub use crate::types::{
        AnswerEvaluation, AnswerRecord, ChatMessage, Conversation, ConversationTurn,
        Evaluation, FileHandle, FileSource, InvokeOptions, Part, QuizItem, Role, UploadRequest,
    };
}
