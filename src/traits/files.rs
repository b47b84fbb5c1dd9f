//! File upload capability trait

use crate::error::StudyError;
use crate::types::{FileHandle, UploadRequest};
use async_trait::async_trait;

#[async_trait]
pub trait FileUploader: Send + Sync {
    /// Push one file to the remote store and return its handle.
    ///
    /// Implementations must resolve the MIME type before any I/O and fail
    /// with [`StudyError::MimeUnresolved`] without touching the network when
    /// it cannot be determined. Uploads are not idempotent.
    async fn upload(&self, request: UploadRequest) -> Result<FileHandle, StudyError>;

    /// Upload several files concurrently, one result per request in input order.
    async fn upload_all(
        &self,
        requests: Vec<UploadRequest>,
    ) -> Vec<Result<FileHandle, StudyError>> {
        futures::future::join_all(requests.into_iter().map(|req| self.upload(req))).await
    }
}
