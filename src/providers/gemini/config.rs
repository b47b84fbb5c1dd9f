//! Gemini client configuration

use std::collections::HashMap;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

/// Default REST endpoint for content generation.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default endpoint for media uploads.
pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://generativelanguage.googleapis.com/upload/v1beta";
/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// HTTP configuration (custom headers, user agent, connect timeout)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpConfig {
    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Connect timeout in seconds
    pub connect_timeout: Option<u64>,
}

/// Gemini configuration parameters.
///
/// Immutable once a client is built from it; the API key is read once at
/// construction and never changes afterwards.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key for authentication (securely stored)
    pub api_key: SecretString,
    /// Base URL for the Gemini API
    pub base_url: String,
    /// Base URL for the Files upload endpoint
    pub upload_base_url: String,
    /// Model used for every call
    pub model: String,
    /// Timeout in seconds. Bounds a whole single-shot call or upload; for a
    /// stream it bounds the gap between reads, not the stream's length.
    pub timeout: Option<u64>,
    /// HTTP configuration
    pub http_config: HttpConfig,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key_present", &self.has_api_key())
            .field("base_url", &self.base_url)
            .field("upload_base_url", &self.upload_base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("http_config", &self.http_config)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: SecretString::from(String::new()),
            base_url: DEFAULT_BASE_URL.to_string(),
            upload_base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Some(DEFAULT_TIMEOUT_SECS),
            http_config: HttpConfig::default(),
        }
    }
}

impl GeminiConfig {
    /// Create a new Gemini configuration with the given API key
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            ..Default::default()
        }
    }

    /// Set the model to use
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = model.into();
        self
    }

    /// Set the base URL
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the upload base URL
    pub fn with_upload_base_url<S: Into<String>>(mut self, upload_base_url: S) -> Self {
        self.upload_base_url = upload_base_url.into();
        self
    }

    /// Set HTTP timeout
    pub const fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// [`timeout`](Self::timeout) as a `Duration`, defaulted
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Set HTTP config (headers/user-agent)
    pub fn with_http_config(mut self, http: HttpConfig) -> Self {
        self.http_config = http;
        self
    }

    /// Whether a non-blank API key is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }
}
