//! Axum-specific server adapters
//!
//! [`router`] builds the HTTP surface over a [`StudyAssistant`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use studyai::prelude::*;
//! use studyai::server_adapters::axum::{AppState, router};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let assistant = StudyAssistant::gemini(GeminiClient::from_env()?);
//!     let app = router(AppState::new(assistant, "./uploads"));
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

use crate::error::StudyError;
use crate::quiz::StudyAssistant;
use crate::types::{Conversation, UploadRequest};

use super::{
    ChatBody, ErrorBody, EvalQuizBody, QuizBody, ResponseBody, UploadFilesBody,
    UploadFilesResponse, UploadedFile, resolve_upload_path, status_for, text_stream,
};

/// Quiz size used by `/llm_get_quiz` when the body does not name one.
pub const DEFAULT_HTTP_QUIZ_QUESTIONS: usize = 3;

/// Shared handler state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub assistant: StudyAssistant,
    /// Directory local files are resolved against
    pub upload_dir: PathBuf,
    pub default_quiz_questions: usize,
}

impl AppState {
    pub fn new(assistant: StudyAssistant, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            assistant,
            upload_dir: upload_dir.into(),
            default_quiz_questions: DEFAULT_HTTP_QUIZ_QUESTIONS,
        }
    }

    pub fn with_default_quiz_questions(mut self, n: usize) -> Self {
        self.default_quiz_questions = n;
        self
    }
}

/// `StudyError` rendered as `{error}` with a 400 or 500 status.
#[derive(Debug)]
pub struct ApiError(pub StudyError);

impl From<StudyError> for ApiError {
    fn from(error: StudyError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(status_for(&self.0)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::warn!(error = %self.0, "request rejected");
        }
        (status, Json(ErrorBody::from(&self.0))).into_response()
    }
}

/// Build the router with all study routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/llm_upload_file", post(upload_files))
        .route("/llm_response", post(chat_response))
        .route("/llm_response_stream", post(chat_response_stream))
        .route("/llm_get_quiz", post(get_quiz))
        .route("/llm_eval_quiz", post(eval_quiz))
        .with_state(state)
}

async fn upload_files(
    State(state): State<AppState>,
    Json(body): Json<UploadFilesBody>,
) -> Result<Json<UploadFilesResponse>, ApiError> {
    let files = body.files.ok_or_else(|| {
        StudyError::InvalidInput("Invalid or missing 'files' array in request body".to_string())
    })?;

    // Path problems are reported per file, like upload failures.
    let mut results: Vec<Option<UploadedFile>> = vec![None; files.len()];
    let mut requests = Vec::new();
    let mut slots = Vec::new();
    for (i, file) in files.iter().enumerate() {
        match resolve_upload_path(&state.upload_dir, &file.uri) {
            Ok(path) => {
                let mut request = UploadRequest::from_path(path);
                if let Some(mime) = &file.mime_type {
                    request = request.with_mime_type(mime.clone());
                }
                requests.push(request);
                slots.push(i);
            }
            Err(e) => results[i] = Some(UploadedFile::failed(file.mime_type.clone(), &e)),
        }
    }

    let outcomes = state.assistant.upload_all(requests).await;
    for (slot, outcome) in slots.into_iter().zip(outcomes) {
        results[slot] = Some(match outcome {
            Ok(handle) => UploadedFile::ok(handle),
            Err(e) => {
                tracing::warn!(error = %e, file = %files[slot].uri, "upload failed");
                UploadedFile::failed(files[slot].mime_type.clone(), &e)
            }
        });
    }

    Ok(Json(UploadFilesResponse {
        uploaded_files: results.into_iter().flatten().collect(),
    }))
}

fn conversation_from(body: ChatBody) -> Result<Conversation, StudyError> {
    match body.conversation {
        Some(messages) if !messages.is_empty() => {
            Ok(Conversation::from_messages(&messages, &body.files))
        }
        _ => Err(StudyError::InvalidInput("User input is required".to_string())),
    }
}

async fn chat_response(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ResponseBody<String>>, ApiError> {
    let conversation = conversation_from(body)?;
    let response = state.assistant.chat(&conversation).await?;
    Ok(Json(ResponseBody { response }))
}

/// Chunked `text/plain` body of increments. Opening failures still get a
/// JSON error; a failure mid-body aborts the response.
async fn chat_response_stream(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<Response, ApiError> {
    let conversation = conversation_from(body)?;
    let stream = state.assistant.chat_stream(&conversation).await?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(text_stream(stream)),
    )
        .into_response())
}

async fn get_quiz(
    State(state): State<AppState>,
    Json(body): Json<QuizBody>,
) -> Result<impl IntoResponse, ApiError> {
    let num_questions = body.num_questions.unwrap_or(state.default_quiz_questions);
    let response = state
        .assistant
        .generate_quiz(&body.files, num_questions)
        .await?;
    Ok(Json(ResponseBody { response }))
}

async fn eval_quiz(
    State(state): State<AppState>,
    Json(body): Json<EvalQuizBody>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.assistant.evaluate_all_answers(&body.qanda).await?;
    Ok(Json(ResponseBody { response }))
}
