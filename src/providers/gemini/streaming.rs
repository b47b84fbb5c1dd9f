//! Gemini streaming implementation using eventsource-stream
//!
//! `streamGenerateContent?alt=sse` answers with one `GenerateContentResponse`
//! JSON object per SSE `data:` frame. Each frame's text is one increment.

use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::Client as HttpClient;
use secrecy::ExposeSecret;

use crate::error::StudyError;
use crate::streaming::TextDeltaStream;
use crate::types::{Conversation, InvokeOptions};
use crate::utils::join_url;

use super::config::GeminiConfig;
use super::convert::build_request_body;
use super::headers::build_gemini_headers;
use super::types::{GenerateContentResponse, error_message_from_body};

/// Gemini streaming client
#[derive(Clone)]
pub struct GeminiStreaming {
    config: GeminiConfig,
    http_client: HttpClient,
}

impl GeminiStreaming {
    pub fn new(config: GeminiConfig, http_client: HttpClient) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// `{base}/models/{model}:streamGenerateContent?alt=sse`
    pub fn endpoint(&self) -> String {
        join_url(
            &self.config.base_url,
            &format!("models/{}:streamGenerateContent?alt=sse", self.config.model),
        )
    }

    /// No per-request timeout: a reply may stream for longer than a
    /// single-shot call is allowed to take.
    fn request(
        &self,
        conversation: &Conversation,
        options: &InvokeOptions,
    ) -> Result<reqwest::RequestBuilder, StudyError> {
        let mut headers = build_gemini_headers(
            self.config.api_key.expose_secret(),
            &self.config.http_config.headers,
        )?;
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("text/event-stream"),
        );
        Ok(self
            .http_client
            .post(self.endpoint())
            .headers(headers)
            .json(&build_request_body(conversation, options)))
    }

    /// Open the stream. Failures before the first frame are returned as
    /// `ModelInvocationError`; failures afterwards arrive as stream items.
    pub async fn stream(
        &self,
        conversation: &Conversation,
        options: &InvokeOptions,
    ) -> Result<TextDeltaStream, StudyError> {
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
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = error_message_from_body(status, &text);
            tracing::warn!(status = status.as_u16(), %message, "streamGenerateContent failed");
            return Err(StudyError::invocation(message, Some(status.as_u16())));
        }

        tracing::debug!("stream opened");
        Ok(deltas_from_sse(response.bytes_stream()))
    }
}

/// Map an SSE byte stream to text increments, skipping empty ones.
pub(crate) fn deltas_from_sse<S, B, E>(bytes: S) -> TextDeltaStream
where
    S: futures::Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let events = bytes.eventsource();
    let s = events.filter_map(|event| async move {
        match event {
            Ok(event) => parse_frame(&event.data).transpose(),
            Err(e) => Some(Err(StudyError::stream(
                format!("SSE transport error: {e}"),
                String::new(),
            ))),
        }
    });
    Box::pin(s)
}

/// Text increment carried by one `data:` frame; `None` for frames without text.
fn parse_frame(data: &str) -> Result<Option<String>, StudyError> {
    let data = data.trim();
    if data.is_empty() || data == "[DONE]" {
        return Ok(None);
    }
    let response: GenerateContentResponse = serde_json::from_str(data).map_err(|e| {
        StudyError::stream(format!("Malformed stream frame: {e}"), String::new())
    })?;
    if let Some(reason) = response.block_reason() {
        return Err(StudyError::stream(
            format!("Response blocked: {reason}"),
            String::new(),
        ));
    }
    if let Some(reason) = response.content_stop_reason() {
        return Err(StudyError::stream(
            format!("Response stopped by the service (finish reason: {reason})"),
            String::new(),
        ));
    }
    let text = response.text();
    Ok((!text.is_empty()).then_some(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn frame(text: &str) -> String {
        format!(
            "data: {{\"candidates\":[{{\"content\":{{\"role\":\"model\",\"parts\":[{{\"text\":{}}}]}}}}]}}\n\n",
            serde_json::to_string(text).unwrap()
        )
    }

    #[tokio::test]
    async fn frames_become_deltas() {
        let body = format!("{}{}", frame("Hel"), frame("lo"));
        let chunks: Vec<Result<Vec<u8>, std::io::Error>> = vec![Ok(body.into_bytes())];
        let deltas: Vec<_> = deltas_from_sse(stream::iter(chunks)).collect().await;
        let deltas: Vec<String> = deltas.into_iter().map(|d| d.unwrap()).collect();
        assert_eq!(deltas, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn empty_text_frames_are_skipped() {
        let body = format!("{}{}{}", frame("a"), frame(""), frame("b"));
        let chunks: Vec<Result<Vec<u8>, std::io::Error>> = vec![Ok(body.into_bytes())];
        let deltas: Vec<_> = deltas_from_sse(stream::iter(chunks)).collect().await;
        assert_eq!(deltas.len(), 2);
    }

    #[tokio::test]
    async fn frames_split_across_chunks() {
        let body = frame("split");
        let (a, b) = body.split_at(10);
        let chunks: Vec<Result<Vec<u8>, std::io::Error>> =
            vec![Ok(a.as_bytes().to_vec()), Ok(b.as_bytes().to_vec())];
        let deltas: Vec<_> = deltas_from_sse(stream::iter(chunks)).collect().await;
        assert_eq!(deltas.into_iter().next().unwrap().unwrap(), "split");
    }

    #[test]
    fn stream_requests_have_no_overall_timeout() {
        let streaming = GeminiStreaming::new(GeminiConfig::new("k").with_timeout(7), HttpClient::new());
        let request = streaming
            .request(&Conversation::prompt("hi", &[]), &InvokeOptions::default())
            .unwrap()
            .build()
            .unwrap();
        assert!(request.timeout().is_none());
        assert_eq!(request.headers()["accept"], "text/event-stream");
    }

    #[test]
    fn safety_stop_frame_is_a_stream_error() {
        let err = parse_frame(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap_err();
        assert!(matches!(err, StudyError::StreamError { .. }));
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn stop_frame_without_text_is_skipped() {
        assert_eq!(
            parse_frame(r#"{"candidates":[{"finishReason":"STOP"}]}"#).unwrap(),
            None
        );
    }

    #[test]
    fn malformed_frame_is_a_stream_error() {
        let err = parse_frame("{not json").unwrap_err();
        assert!(matches!(err, StudyError::StreamError { .. }));
    }
}
