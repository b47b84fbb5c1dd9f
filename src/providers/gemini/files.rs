//! Gemini Files API upload
//!
//! Pushes bytes to the Files API and returns a [`FileHandle`] whose URI can be
//! referenced from later conversation turns.
//!
//! # API Reference
//! <https://ai.google.dev/api/files>

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use secrecy::ExposeSecret;

use crate::error::StudyError;
use crate::traits::FileUploader;
use crate::types::{FileHandle, FileSource, UploadRequest};
use crate::utils::{join_url, resolve_mime};

use super::config::GeminiConfig;
use super::headers::build_gemini_headers;
use super::types::{CreateFileRequest, CreateFileResponse, FileMetadata, error_message_from_body};

/// Upload limit of the Files API.
const MAX_FILE_SIZE: u64 = 2 * 1024 * 1024 * 1024;

fn check_size(size: u64) -> Result<(), StudyError> {
    if size > MAX_FILE_SIZE {
        return Err(StudyError::InvalidInput(format!(
            "File size {size} bytes exceeds maximum allowed size of {MAX_FILE_SIZE} bytes"
        )));
    }
    Ok(())
}

/// Gemini file upload implementation.
#[derive(Clone)]
pub struct GeminiFiles {
    config: GeminiConfig,
    http_client: HttpClient,
}

impl GeminiFiles {
    pub fn new(config: GeminiConfig, http_client: HttpClient) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Resolve the name and MIME type of an upload without doing any I/O.
    fn prepare(request: &UploadRequest) -> Result<(String, String), StudyError> {
        let file_name = request.source.file_name();
        if file_name.trim().is_empty() {
            return Err(StudyError::InvalidInput(
                "Filename cannot be empty".to_string(),
            ));
        }

        let mime_type = resolve_mime(request.mime_type.as_deref(), &file_name).ok_or_else(|| {
            let shown = match &request.source {
                FileSource::Path(path) => path.display().to_string(),
                FileSource::Bytes { file_name, .. } => file_name.clone(),
            };
            StudyError::MimeUnresolved(shown)
        })?;

        Ok((file_name, mime_type))
    }

    async fn read_content(source: FileSource) -> Result<Vec<u8>, StudyError> {
        let bytes = match source {
            FileSource::Path(path) => {
                let io_error =
                    |e: std::io::Error| StudyError::IoError(format!("Failed to read {}: {e}", path.display()));
                let size = tokio::fs::metadata(&path).await.map_err(io_error)?.len();
                check_size(size)?;
                tokio::fs::read(&path).await.map_err(io_error)?
            }
            FileSource::Bytes { bytes, .. } => bytes,
        };

        if bytes.is_empty() {
            return Err(StudyError::InvalidInput(
                "File content cannot be empty".to_string(),
            ));
        }
        check_size(bytes.len() as u64)?;
        Ok(bytes)
    }

    fn build_form(
        file_name: &str,
        display_name: &str,
        mime_type: &str,
        content: Vec<u8>,
    ) -> Result<reqwest::multipart::Form, StudyError> {
        let metadata = serde_json::to_string(&CreateFileRequest {
            file: FileMetadata {
                display_name: display_name.to_string(),
            },
        })?;
        let metadata = reqwest::multipart::Part::text(metadata)
            .mime_str("application/json")
            .map_err(|e| StudyError::upload(format!("Invalid metadata part: {e}"), None))?;
        let file = reqwest::multipart::Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|e| StudyError::InvalidInput(format!("Invalid MIME type '{mime_type}': {e}")))?;

        Ok(reqwest::multipart::Form::new()
            .part("metadata", metadata)
            .part("file", file))
    }
}

impl std::fmt::Debug for GeminiFiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiFiles")
            .field("upload_base_url", &self.config.upload_base_url)
            .finish()
    }
}

#[async_trait]
impl FileUploader for GeminiFiles {
    #[tracing::instrument(skip_all, fields(file = %request.source.file_name()))]
    async fn upload(&self, request: UploadRequest) -> Result<FileHandle, StudyError> {
        let (file_name, mime_type) = Self::prepare(&request)?;
        let display_name = request
            .display_name
            .clone()
            .unwrap_or_else(|| file_name.clone());
        let content = Self::read_content(request.source).await?;
        let size = content.len();
        let form = Self::build_form(&file_name, &display_name, &mime_type, content)?;

        let headers = build_gemini_headers(
            self.config.api_key.expose_secret(),
            &self.config.http_config.headers,
        )?;
        let url = join_url(&self.config.upload_base_url, "files");
        tracing::debug!(%mime_type, size, "uploading file to Gemini");

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .timeout(self.config.request_timeout())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "file upload request failed");
                StudyError::upload(format!("Request failed: {e}"), None)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StudyError::upload(format!("Failed to read upload response: {e}"), Some(status.as_u16())))?;
        if !status.is_success() {
            let message = error_message_from_body(status, &body);
            tracing::error!(status = status.as_u16(), %message, "file upload rejected");
            return Err(StudyError::upload(message, Some(status.as_u16())));
        }

        let created: CreateFileResponse = serde_json::from_str(&body).map_err(|e| {
            StudyError::upload(format!("Failed to parse upload response: {e}"), Some(status.as_u16()))
        })?;
        let file = created.file.unwrap_or_default();
        let uri = file
            .uri
            .ok_or_else(|| StudyError::upload("No file uri in upload response", Some(status.as_u16())))?;

        tracing::info!(
            %uri,
            %mime_type,
            name = file.name.as_deref().unwrap_or_default(),
            display_name = file.display_name.as_deref().unwrap_or_default(),
            size_bytes = file.size_bytes.as_deref().unwrap_or_default(),
            service_mime_type = file.mime_type.as_deref().unwrap_or_default(),
            state = file.state.as_deref().unwrap_or_default(),
            "file uploaded"
        );
        Ok(FileHandle::new(uri, mime_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_uses_hint_before_extension() {
        let req = UploadRequest::from_bytes("notes.bin", b"x".to_vec()).with_mime_type("text/plain");
        let (name, mime) = GeminiFiles::prepare(&req).unwrap();
        assert_eq!(name, "notes.bin");
        assert_eq!(mime, "text/plain");
    }

    #[test]
    fn prepare_rejects_unknown_extension() {
        let req = UploadRequest::from_path("/tmp/data.unknownext");
        assert_eq!(
            GeminiFiles::prepare(&req).unwrap_err(),
            StudyError::MimeUnresolved("/tmp/data.unknownext".to_string())
        );
    }

    #[test]
    fn prepare_rejects_empty_name() {
        let req = UploadRequest::from_bytes("", b"x".to_vec()).with_mime_type("text/plain");
        assert!(matches!(
            GeminiFiles::prepare(&req),
            Err(StudyError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn empty_content_is_rejected() {
        let err = GeminiFiles::read_content(FileSource::Bytes {
            file_name: "a.txt".into(),
            bytes: Vec::new(),
        })
        .await
        .unwrap_err();
        assert!(matches!(err, StudyError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.pdf");
        // sparse file: only the length is set
        std::fs::File::create(&path)
            .unwrap()
            .set_len(MAX_FILE_SIZE + 1)
            .unwrap();

        let err = GeminiFiles::read_content(FileSource::Path(path)).await.unwrap_err();
        match err {
            StudyError::InvalidInput(message) => assert!(message.contains("exceeds maximum")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn upload_logs_file_metadata() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "file": {
                    "name": "files/resource-7",
                    "uri": "https://files/abc-123",
                    "sizeBytes": "5",
                    "state": "ACTIVE"
                }
            })))
            .mount(&server)
            .await;

        let files = GeminiFiles::new(
            GeminiConfig::new("k").with_upload_base_url(server.uri()),
            HttpClient::new(),
        );
        let handle = files
            .upload(UploadRequest::from_bytes("a.txt", b"hello".to_vec()))
            .await
            .unwrap();

        assert_eq!(handle.uri, "https://files/abc-123");
        assert!(logs_contain("files/resource-7"));
        assert!(logs_contain("ACTIVE"));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let err = GeminiFiles::read_content(FileSource::Path("/definitely/not/here.pdf".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, StudyError::IoError(_)));
    }
}
