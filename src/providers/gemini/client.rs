//! Gemini Client Implementation
//!
//! Main client structure that aggregates the Gemini capabilities.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;

use crate::error::StudyError;
use crate::streaming::TextDeltaStream;
use crate::traits::{FileUploader, ModelInvoker};
use crate::types::{Conversation, FileHandle, InvokeOptions, UploadRequest};

use super::builder::GeminiBuilder;
use super::chat::GeminiChatCapability;
use super::config::GeminiConfig;
use super::files::GeminiFiles;
use super::streaming::GeminiStreaming;

/// Gemini client implementing [`FileUploader`] and [`ModelInvoker`].
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    chat_capability: GeminiChatCapability,
    streaming_capability: GeminiStreaming,
    files_capability: GeminiFiles,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("config", &self.config)
            .finish()
    }
}

impl GeminiClient {
    /// Create a new Gemini client with the given configuration
    pub fn new(config: GeminiConfig) -> Result<Self, StudyError> {
        let http_client = build_http_client(&config)?;
        Self::with_http_client(config, http_client)
    }

    /// Create a client that reuses an existing `reqwest::Client`
    pub fn with_http_client(
        config: GeminiConfig,
        http_client: HttpClient,
    ) -> Result<Self, StudyError> {
        if !config.has_api_key() {
            return Err(StudyError::MissingCredential(
                "Gemini API key is not configured".to_string(),
            ));
        }

        Ok(Self {
            chat_capability: GeminiChatCapability::new(config.clone(), http_client.clone()),
            streaming_capability: GeminiStreaming::new(config.clone(), http_client.clone()),
            files_capability: GeminiFiles::new(config.clone(), http_client),
            config,
        })
    }

    /// Start a [`GeminiBuilder`]
    pub fn builder() -> GeminiBuilder {
        GeminiBuilder::new()
    }

    /// Build a client from `GEMINI_API_KEY` (plus optional `GEMINI_MODEL`
    /// and `GEMINI_BASE_URL`).
    pub fn from_env() -> Result<Self, StudyError> {
        GeminiBuilder::from_env().build()
    }

    /// Get the configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Model used for every call
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

/// No overall timeout is set on the client so streamed replies are not cut
/// off; single-shot calls and uploads carry their own per-request timeout.
pub(crate) fn build_http_client(config: &GeminiConfig) -> Result<HttpClient, StudyError> {
    let mut builder = HttpClient::builder().read_timeout(config.request_timeout());
    if let Some(connect) = config.http_config.connect_timeout {
        builder = builder.connect_timeout(Duration::from_secs(connect));
    }
    if let Some(user_agent) = &config.http_config.user_agent {
        builder = builder.user_agent(user_agent);
    }
    builder
        .build()
        .map_err(|e| StudyError::InvalidInput(format!("Failed to create HTTP client: {e}")))
}

#[async_trait]
impl FileUploader for GeminiClient {
    async fn upload(&self, request: UploadRequest) -> Result<FileHandle, StudyError> {
        self.files_capability.upload(request).await
    }
}

#[async_trait]
impl ModelInvoker for GeminiClient {
    #[tracing::instrument(skip_all, fields(model = %self.config.model, turns = conversation.len()))]
    async fn converse(
        &self,
        conversation: &Conversation,
        options: &InvokeOptions,
    ) -> Result<String, StudyError> {
        let text = self.chat_capability.generate(conversation, options).await?;
        tracing::debug!(chars = text.chars().count(), "response received");
        Ok(text)
    }

    #[tracing::instrument(skip_all, fields(model = %self.config.model, turns = conversation.len()))]
    async fn converse_stream(
        &self,
        conversation: &Conversation,
        options: &InvokeOptions,
    ) -> Result<TextDeltaStream, StudyError> {
        self.streaming_capability.stream(conversation, options).await
    }
}
