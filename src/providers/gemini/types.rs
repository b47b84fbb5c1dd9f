//! Gemini API wire types
//!
//! Only the subset of the generateContent / Files API surface this crate
//! speaks. Field names follow the REST JSON (camelCase).

use serde::{Deserialize, Serialize};

/// Content of a conversation turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// `user` or `model`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A datatype containing media that is part of a multi-part Content message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_data: Option<FileData>,
    /// Whether this is a thought summary (thinking models)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn file_data(file_uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            file_data: Some(FileData {
                file_uri: file_uri.into(),
                mime_type: mime_type.into(),
            }),
            ..Default::default()
        }
    }
}

/// URI based data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub file_uri: String,
    pub mime_type: String,
}

/// Generation options sent with a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

/// Request body for generateContent / streamGenerateContent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// Response body (also the payload of each SSE frame when streaming).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
    pub model_version: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, thought summaries excluded.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|p| p.thought != Some(true))
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Finish reason of the first candidate when it means the reply was
    /// stopped for its content rather than completed.
    pub fn content_stop_reason(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .filter(|reason| CONTENT_STOP_REASONS.contains(reason))
    }

    /// Reason the prompt was blocked, if the service reported one.
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}

/// Finish reasons that cut a reply short because of its content.
pub const CONTENT_STOP_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "LANGUAGE",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
];

/// A response candidate generated from the model.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
    pub total_token_count: Option<u32>,
}

/// Metadata sent alongside uploaded bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateFileRequest {
    pub file: FileMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub display_name: String,
}

/// Response of the upload endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateFileResponse {
    pub file: Option<GeminiFile>,
}

/// A file hosted by the Files API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiFile {
    /// Resource name, e.g. `files/abc-123`
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub mime_type: Option<String>,
    pub size_bytes: Option<String>,
    pub uri: Option<String>,
    /// `PROCESSING`, `ACTIVE` or `FAILED`
    pub state: Option<String>,
}

/// Error envelope returned by Google APIs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeminiErrorEnvelope {
    pub error: GeminiStatus,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeminiStatus {
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    pub status: Option<String>,
}

/// Human-readable message for a non-success response body.
pub fn error_message_from_body(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<GeminiErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(code) => format!("Gemini API error {status} ({code}): {}", envelope.error.message),
            None => format!("Gemini API error {status}: {}", envelope.error.message),
        },
        Err(_) if body.trim().is_empty() => format!("Gemini API error {status}"),
        Err(_) => format!("Gemini API error {status}: {}", body.trim()),
    }
}
