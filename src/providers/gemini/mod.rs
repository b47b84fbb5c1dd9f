//! Google Gemini Provider
//!
//! Integration with Google's Gemini models over the public REST API.
//!
//! # Architecture
//! - `client.rs` - Main Gemini client that aggregates all capabilities
//! - `builder.rs` - Builder and environment loading
//! - `config.rs` - Immutable client configuration
//! - `types.rs` - Wire types for generateContent and the Files API
//! - `convert.rs` - Conversation to request body conversion
//! - `chat.rs` - Single-shot generation
//! - `streaming.rs` - SSE streaming generation
//! - `files.rs` - File uploads
//!
//! # Example Usage
//! ```rust,no_run
//! use studyai::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiClient::builder()
//!         .api_key("your-api-key")
//!         .model("gemini-1.5-flash")
//!         .build()?;
//!
//!     let reply = client
//!         .converse(&Conversation::prompt("Hello, world!", &[]), &InvokeOptions::default())
//!         .await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod chat;
pub mod client;
pub mod config;
pub mod convert;
pub mod files;
pub mod headers;
pub mod streaming;
pub mod types;

pub use builder::GeminiBuilder;
pub use client::GeminiClient;
pub use config::{GeminiConfig, HttpConfig};
pub use files::GeminiFiles;
