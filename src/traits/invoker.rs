//! Model invocation capability trait

use crate::error::StudyError;
use crate::streaming::TextDeltaStream;
use crate::types::{Conversation, InvokeOptions};
use async_trait::async_trait;

#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Submit the whole conversation and return the complete response text.
    async fn converse(
        &self,
        conversation: &Conversation,
        options: &InvokeOptions,
    ) -> Result<String, StudyError>;

    /// Submit the whole conversation and return the raw increments as they arrive.
    ///
    /// Opening failures are reported as [`StudyError::ModelInvocationError`].
    /// Items of the returned stream are text increments (not cumulative);
    /// see [`crate::streaming::cumulative`] for the cumulative view.
    async fn converse_stream(
        &self,
        conversation: &Conversation,
        options: &InvokeOptions,
    ) -> Result<TextDeltaStream, StudyError>;
}
