//! MIME type detection utilities

use std::path::Path;

/// Guess MIME by file path or name (extension-based).
///
/// Returns `None` when the extension is missing or unknown; callers must not
/// fall back to a generic type because the remote service needs a real one.
pub fn guess_mime_from_path(path: impl AsRef<Path>) -> Option<String> {
    mime_guess::from_path(path)
        .first_raw()
        .map(|s| s.to_string())
}

/// Use the explicit hint when present (and non-blank), else infer from `name`.
pub fn resolve_mime(hint: Option<&str>, name: &str) -> Option<String> {
    match hint.map(str::trim) {
        Some(h) if !h.is_empty() => Some(h.to_string()),
        _ => guess_mime_from_path(name),
    }
}
