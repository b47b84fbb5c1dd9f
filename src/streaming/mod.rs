//! Streaming delivery
//!
//! Providers hand back a [`TextDeltaStream`] of raw increments. This module
//! turns it into the cumulative view callers consume:
//!
//! - [`cumulative`]: push sequence of [`StreamUpdate`]s whose `text` is the
//!   whole response so far, in arrival order, one increment at a time
//! - [`drive`]: callback form that invokes `on_chunk(cumulative_text)` for
//!   every update and returns the final text
//! - [`make_cancellable`]: attach a [`CancelHandle`] to a cumulative stream
//!
//! A failure after the first increment is always reported as
//! [`StudyError::StreamError`] carrying the partial text; a stream never ends
//! early without an error.

mod cancel;

pub use cancel::{CancelHandle, make_cancellable, new_cancel_handle};

use std::pin::Pin;

use futures::{Stream, StreamExt};

use crate::error::StudyError;

/// Raw text increments as received from the provider.
pub type TextDeltaStream = Pin<Box<dyn Stream<Item = Result<String, StudyError>> + Send>>;

/// Cumulative updates, see [`cumulative`].
pub type CumulativeStream = Pin<Box<dyn Stream<Item = Result<StreamUpdate, StudyError>> + Send>>;

/// One increment together with the cumulative text it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamUpdate {
    /// Text received in this increment
    pub delta: String,
    /// All text received so far, `delta` included
    pub text: String,
}

/// Convert raw increments into cumulative updates.
///
/// The first error ends the stream; it is re-expressed as a `StreamError`
/// whose `partial` is the cumulative text delivered before it.
pub fn cumulative(deltas: TextDeltaStream) -> CumulativeStream {
    let mut inner = deltas;
    let s = async_stream::stream! {
        let mut text = String::new();
        while let Some(item) = inner.next().await {
            match item {
                Ok(delta) => {
                    text.push_str(&delta);
                    yield Ok(StreamUpdate { delta, text: text.clone() });
                }
                Err(err) => {
                    tracing::warn!(error = %err, received = text.len(), "stream terminated with error");
                    yield Err(with_partial(err, &text));
                    break;
                }
            }
        }
    };
    Box::pin(s)
}

/// Drive a cumulative stream to completion, calling `on_chunk` with the
/// cumulative text after every increment.
///
/// `on_chunk` runs synchronously in arrival order. An error returned by the
/// callback stops the stream and is propagated unchanged.
pub async fn drive<F>(mut stream: CumulativeStream, mut on_chunk: F) -> Result<String, StudyError>
where
    F: FnMut(&str) -> Result<(), StudyError>,
{
    let mut last = String::new();
    while let Some(update) = stream.next().await {
        let update = update?;
        on_chunk(&update.text)?;
        last = update.text;
    }
    Ok(last)
}

/// Collect a cumulative stream into its final text.
pub async fn collect_text(stream: CumulativeStream) -> Result<String, StudyError> {
    drive(stream, |_| Ok(())).await
}

fn with_partial(err: StudyError, partial: &str) -> StudyError {
    let message = match err {
        StudyError::StreamError { message, .. } => message,
        StudyError::ModelInvocationError { message, .. } => message,
        other => other.to_string(),
    };
    StudyError::stream(message, partial)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deltas(items: Vec<Result<&'static str, StudyError>>) -> TextDeltaStream {
        Box::pin(futures::stream::iter(
            items.into_iter().map(|r| r.map(str::to_string)),
        ))
    }

    #[tokio::test]
    async fn updates_are_cumulative_and_ordered() {
        let updates: Vec<_> = cumulative(deltas(vec![Ok("Hel"), Ok("lo")]))
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .map(Result::unwrap)
            .collect();

        assert_eq!(
            updates,
            vec![
                StreamUpdate { delta: "Hel".into(), text: "Hel".into() },
                StreamUpdate { delta: "lo".into(), text: "Hello".into() },
            ]
        );
    }

    #[tokio::test]
    async fn drive_reports_cumulative_chunks() {
        let mut seen = Vec::new();
        let text = drive(cumulative(deltas(vec![Ok("Hel"), Ok("lo")])), |chunk| {
            seen.push(chunk.to_string());
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(seen, vec!["Hel", "Hello"]);
        assert_eq!(text, "Hello");
    }

    #[tokio::test]
    async fn mid_stream_failure_carries_partial_text() {
        let stream = cumulative(deltas(vec![
            Ok("Hel"),
            Err(StudyError::invocation("connection reset", None)),
            Ok("never"),
        ]));
        let err = collect_text(stream).await.unwrap_err();

        assert_eq!(err, StudyError::stream("connection reset", "Hel"));
    }

    #[tokio::test]
    async fn callback_error_propagates_unchanged() {
        let err = drive(cumulative(deltas(vec![Ok("a"), Ok("b")])), |_| {
            Err(StudyError::InvalidInput("client went away".into()))
        })
        .await
        .unwrap_err();

        assert_eq!(err, StudyError::InvalidInput("client went away".into()));
    }

    #[tokio::test]
    async fn empty_stream_yields_empty_text() {
        assert_eq!(collect_text(cumulative(deltas(vec![]))).await.unwrap(), "");
    }
}
