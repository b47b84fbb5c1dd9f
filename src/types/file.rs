//! File handles and upload requests

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Stable reference to a file hosted by the remote model service.
///
/// Handles are produced by a [`FileUploader`](crate::traits::FileUploader)
/// and threaded by the caller into later conversation turns. The remote
/// retention policy is the service's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHandle {
    /// Remote URI (not a local path)
    pub uri: String,
    /// MIME type the file was uploaded with
    pub mime_type: String,
}

impl FileHandle {
    pub fn new(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Where the bytes of an upload come from.
#[derive(Debug, Clone, PartialEq)]
pub enum FileSource {
    /// A file on the local filesystem, read when the upload runs.
    Path(PathBuf),
    /// In-memory content with the name it should be uploaded under.
    Bytes { file_name: String, bytes: Vec<u8> },
}

impl FileSource {
    /// Name used for MIME inference and as the default display name.
    pub fn file_name(&self) -> String {
        match self {
            FileSource::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            FileSource::Bytes { file_name, .. } => file_name.clone(),
        }
    }
}

/// Request to upload one file.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub source: FileSource,
    /// Explicit MIME type; inferred from the file name when absent.
    pub mime_type: Option<String>,
    /// Display name stored remotely; defaults to the file name.
    pub display_name: Option<String>,
}

impl UploadRequest {
    /// Upload a local file.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            source: FileSource::Path(path.as_ref().to_path_buf()),
            mime_type: None,
            display_name: None,
        }
    }

    /// Upload in-memory bytes under `file_name`.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            source: FileSource::Bytes {
                file_name: file_name.into(),
                bytes,
            },
            mime_type: None,
            display_name: None,
        }
    }

    /// Set an explicit MIME type hint.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Set the remote display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}
