//! Gemini client builder

use std::collections::HashMap;

use reqwest::Client as HttpClient;

use crate::error::StudyError;

use super::client::{GeminiClient, build_http_client};
use super::config::{GeminiConfig, HttpConfig};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable overriding the model.
pub const MODEL_ENV: &str = "GEMINI_MODEL";
/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";

/// Gemini-specific builder for configuring Gemini clients.
///
/// # Example
/// ```rust,no_run
/// use studyai::providers::gemini::GeminiBuilder;
///
/// # fn main() -> Result<(), studyai::StudyError> {
/// let client = GeminiBuilder::new()
///     .api_key("your-api-key")
///     .model("gemini-1.5-flash")
///     .timeout(30)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeminiBuilder {
    /// Gemini API key
    api_key: Option<String>,
    /// Base URL for Gemini API
    base_url: Option<String>,
    /// Base URL for uploads
    upload_base_url: Option<String>,
    /// Model to use
    model: Option<String>,
    /// Request timeout in seconds
    timeout: Option<u64>,
    /// Connect timeout in seconds
    connect_timeout: Option<u64>,
    /// Extra headers
    headers: HashMap<String, String>,
    /// Custom User-Agent
    user_agent: Option<String>,
    /// Pre-built HTTP client
    http_client: Option<HttpClient>,
}

impl GeminiBuilder {
    /// Create a new Gemini builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder seeded from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builder seeded from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            api_key: non_blank(API_KEY_ENV),
            model: non_blank(MODEL_ENV),
            base_url: non_blank(BASE_URL_ENV),
            ..Self::default()
        }
    }

    /// Set the API key
    pub fn api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL
    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the upload base URL
    pub fn upload_base_url<S: Into<String>>(mut self, upload_base_url: S) -> Self {
        self.upload_base_url = Some(upload_base_url.into());
        self
    }

    /// Set the model
    pub fn model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the request timeout in seconds
    pub const fn timeout(mut self, secs: u64) -> Self {
        self.timeout = Some(secs);
        self
    }

    /// Set the connect timeout in seconds
    pub const fn connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout = Some(secs);
        self
    }

    /// Add a header sent with every request
    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set a custom User-Agent
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a pre-configured HTTP client; connect timeout and user agent
    /// settings are then left to that client.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Resolve the configuration without creating a client.
    pub fn into_config(self) -> Result<(GeminiConfig, Option<HttpClient>), StudyError> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                StudyError::MissingCredential(format!(
                    "API key is required for Gemini (set {API_KEY_ENV})"
                ))
            })?;

        let mut config = GeminiConfig::new(api_key);
        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }
        if let Some(upload_base_url) = self.upload_base_url {
            config = config.with_upload_base_url(upload_base_url);
        }
        if let Some(model) = self.model {
            config = config.with_model(model);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        config = config.with_http_config(HttpConfig {
            headers: self.headers,
            user_agent: self.user_agent,
            connect_timeout: self.connect_timeout,
        });

        Ok((config, self.http_client))
    }

    /// Build the Gemini client
    pub fn build(self) -> Result<GeminiClient, StudyError> {
        let (config, http_client) = self.into_config()?;
        let http_client = match http_client {
            Some(client) => client,
            None => build_http_client(&config)?,
        };
        tracing::debug!(model = %config.model, base_url = %config.base_url, "building Gemini client");
        GeminiClient::with_http_client(config, http_client)
    }
}
