//! Utility modules
//!
//! Small helpers shared by the provider implementations.

pub mod mime;
pub mod url;

pub use mime::{guess_mime_from_path, resolve_mime};
pub use url::join_url;
