//! Error Handling Module
//!
//! This module provides the typed error taxonomy for the study assistant core:
//! - Core error type (`StudyError`) and the crate-wide `Result` alias
//! - Coarse categories and user-facing helpers
//! - Type conversions from common error types
//!
//! Every failure surfaced by this crate is one of the `StudyError` variants.
//! Nothing is retried internally; retry policy belongs to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use studyai::error::{ErrorCategory, StudyError};
//!
//! let error = StudyError::MimeUnresolved("notes.xyz".into());
//! assert_eq!(error.category(), ErrorCategory::Input);
//! ```

mod conversions;
pub mod helpers;
pub mod types;

pub use helpers::*;
pub use types::*;
