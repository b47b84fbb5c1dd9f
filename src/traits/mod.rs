//! Capability traits
//!
//! The quiz protocol and the `StudyAssistant` facade depend only on these
//! seams, so the Gemini client can be replaced by a stub in tests or by
//! another provider later.

mod files;
mod invoker;

pub use files::FileUploader;
pub use invoker::ModelInvoker;
