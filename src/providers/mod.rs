//! Provider implementations
//!
//! Only Google Gemini is supported.

pub mod gemini;

pub use gemini::{GeminiBuilder, GeminiClient, GeminiConfig};
