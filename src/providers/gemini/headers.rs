//! Gemini HTTP header helpers.
//!
//! Behavior:
//! - If `custom_headers` already contains `Authorization` (case-insensitive), do not inject `x-goog-api-key`
//! - Otherwise, if `api_key` is non-empty, inject `x-goog-api-key`
//! - Always merge `custom_headers` (custom headers win when names collide)
//!
//! Content type is left to the request body (`json` or `multipart`).

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::StudyError;

pub fn build_gemini_headers(
    api_key: &str,
    custom_headers: &HashMap<String, String>,
) -> Result<HeaderMap, StudyError> {
    let has_authorization = custom_headers
        .keys()
        .any(|k| k.eq_ignore_ascii_case("authorization"));

    let mut headers = HeaderMap::new();
    if !has_authorization && !api_key.is_empty() {
        let mut value = HeaderValue::from_str(api_key)
            .map_err(|e| StudyError::InvalidInput(format!("Invalid API key header value: {e}")))?;
        value.set_sensitive(true);
        headers.insert(HeaderName::from_static("x-goog-api-key"), value);
    }

    for (name, value) in custom_headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| StudyError::InvalidInput(format!("Invalid header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| StudyError::InvalidInput(format!("Invalid header value: {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}
