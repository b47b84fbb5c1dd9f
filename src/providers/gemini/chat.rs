//! Gemini Chat Capability Implementation
//!
//! Single-shot `generateContent` calls for a whole [`Conversation`].

use reqwest::Client as HttpClient;
use secrecy::ExposeSecret;

use crate::error::StudyError;
use crate::types::{Conversation, InvokeOptions};
use crate::utils::join_url;

use super::config::GeminiConfig;
use super::convert::build_request_body;
use super::headers::build_gemini_headers;
use super::types::{GenerateContentResponse, error_message_from_body};

/// Gemini chat capability implementation
#[derive(Clone)]
pub struct GeminiChatCapability {
    config: GeminiConfig,
    http_client: HttpClient,
}

impl GeminiChatCapability {
    /// Create a new Gemini chat capability
    pub fn new(config: GeminiConfig, http_client: HttpClient) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// `{base}/models/{model}:generateContent`
    pub fn endpoint(&self) -> String {
        join_url(
            &self.config.base_url,
            &format!("models/{}:generateContent", self.config.model),
        )
    }

    fn request(
        &self,
        conversation: &Conversation,
        options: &InvokeOptions,
    ) -> Result<reqwest::RequestBuilder, StudyError> {
        let headers = build_gemini_headers(
            self.config.api_key.expose_secret(),
            &self.config.http_config.headers,
        )?;
        Ok(self
            .http_client
            .post(self.endpoint())
            .headers(headers)
            .timeout(self.config.request_timeout())
            .json(&build_request_body(conversation, options)))
    }

    /// Send every turn of `conversation` and return the complete reply text.
    pub async fn generate(
        &self,
        conversation: &Conversation,
        options: &InvokeOptions,
    ) -> Result<String, StudyError> {
        if conversation.is_empty() {
            return Err(StudyError::InvalidInput(
                "Conversation must contain at least one turn".to_string(),
            ));
        }

        let response = self
            .request(conversation, options)?
            .send()
            .await
            .map_err(|e| StudyError::invocation(format!("Request failed: {e}"), None))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            StudyError::invocation(
                format!("Failed to read response body: {e}"),
                Some(status.as_u16()),
            )
        })?;
        if !status.is_success() {
            let message = error_message_from_body(status, &text);
            tracing::warn!(status = status.as_u16(), %message, "generateContent failed");
            return Err(StudyError::invocation(message, Some(status.as_u16())));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text).map_err(|e| {
            StudyError::invocation(
                format!("Failed to parse generateContent response: {e}"),
                Some(status.as_u16()),
            )
        })?;
        log_usage(&parsed);
        reply_text(&parsed)
    }
}

fn log_usage(response: &GenerateContentResponse) {
    let usage = response.usage_metadata.clone().unwrap_or_default();
    tracing::debug!(
        model_version = response.model_version.as_deref().unwrap_or("unknown"),
        prompt_tokens = usage.prompt_token_count,
        reply_tokens = usage.candidates_token_count,
        total_tokens = usage.total_token_count,
        "generateContent usage"
    );
}

/// Reply text, or an invocation error when the service returned no candidate
/// or stopped the reply for its content.
pub(crate) fn reply_text(response: &GenerateContentResponse) -> Result<String, StudyError> {
    if response.candidates.is_empty() {
        let message = match response.block_reason() {
            Some(reason) => format!("No candidates returned (prompt blocked: {reason})"),
            None => "No candidates returned".to_string(),
        };
        return Err(StudyError::invocation(message, None));
    }
    if let Some(reason) = response.content_stop_reason() {
        return Err(StudyError::invocation(
            format!("Response stopped by the service (finish reason: {reason})"),
            None,
        ));
    }
    Ok(response.text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_includes_model() {
        let cap = GeminiChatCapability::new(
            GeminiConfig::new("k")
                .with_base_url("http://localhost:1234/v1beta/")
                .with_model("gemini-1.5-flash"),
            HttpClient::new(),
        );
        assert_eq!(
            cap.endpoint(),
            "http://localhost:1234/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn single_shot_requests_carry_the_configured_timeout() {
        let cap = GeminiChatCapability::new(GeminiConfig::new("k").with_timeout(7), HttpClient::new());
        let request = cap
            .request(&Conversation::prompt("hi", &[]), &InvokeOptions::default())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.timeout(), Some(&std::time::Duration::from_secs(7)));
    }

    #[test]
    fn blocked_prompt_names_the_reason() {
        let resp: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        let err = reply_text(&resp).unwrap_err();
        assert!(matches!(err, StudyError::ModelInvocationError { .. }));
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn content_stop_reason_is_an_error_even_with_text() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "partial"}]},
                "finishReason": "RECITATION"
            }]
        }))
        .unwrap();
        let err = reply_text(&resp).unwrap_err();
        assert!(matches!(err, StudyError::ModelInvocationError { .. }));
        assert!(err.to_string().contains("RECITATION"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn usage_is_logged() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 3, "totalTokenCount": 13},
            "modelVersion": "gemini-1.5-pro-002"
        }))
        .unwrap();
        log_usage(&resp);
        assert!(logs_contain("total_tokens=13"));
        assert!(logs_contain("gemini-1.5-pro-002"));
    }

    #[test]
    fn normal_finish_reasons_return_text() {
        for reason in ["STOP", "MAX_TOKENS"] {
            let resp: GenerateContentResponse = serde_json::from_value(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "done"}]},
                    "finishReason": reason
                }]
            }))
            .unwrap();
            assert_eq!(reply_text(&resp).unwrap(), "done");
        }
    }

    #[tokio::test]
    async fn empty_conversation_is_rejected_before_sending() {
        let cap = GeminiChatCapability::new(
            GeminiConfig::new("k").with_base_url("http://127.0.0.1:9"),
            HttpClient::new(),
        );
        let err = cap
            .generate(&Conversation::new(), &InvokeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StudyError::InvalidInput(_)));
    }
}
