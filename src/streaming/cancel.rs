//! Cancellation utilities
//!
//! Provides first-class cancellation handles for cumulative streams.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::Notify;

use super::CumulativeStream;
use crate::error::StudyError;

#[derive(Debug, Default)]
struct CancelState {
    flag: AtomicBool,
    notify: Notify,
}

/// A handle that can be used to request cancellation.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    state: Arc<CancelState>,
}

impl CancelHandle {
    /// Request cancellation. A stream observing this handle stops waiting for
    /// the provider and ends with a `StreamError` carrying the text delivered
    /// so far. Dropping the stream closes the HTTP connection.
    pub fn cancel(&self) {
        self.state.flag.store(true, Ordering::SeqCst);
        self.state.notify.notify_waiters();
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.state.flag.load(Ordering::SeqCst)
    }
}

/// Create a standalone cancel handle that can be shared across tasks.
pub fn new_cancel_handle() -> CancelHandle {
    CancelHandle {
        state: Arc::new(CancelState::default()),
    }
}

/// Make a cumulative stream cancellable and return its cancel handle.
pub fn make_cancellable(stream: CumulativeStream) -> (CumulativeStream, CancelHandle) {
    let handle = new_cancel_handle();
    let watcher = handle.clone();
    let mut inner = stream;
    let s = async_stream::stream! {
        use futures::StreamExt;
        let mut delivered = String::new();
        loop {
            let notified = watcher.state.notify.notified();
            if watcher.is_cancelled() {
                yield Err(StudyError::stream("stream cancelled", delivered.clone()));
                break;
            }
            let next = tokio::select! {
                biased;
                _ = notified => continue,
                item = inner.next() => item,
            };
            match next {
                Some(Ok(update)) => {
                    delivered = update.text.clone();
                    yield Ok(update);
                }
                Some(Err(err)) => {
                    yield Err(err);
                    break;
                }
                None => break,
            }
        }
    };
    (Box::pin(s), handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::{StreamUpdate, TextDeltaStream, collect_text, cumulative};
    use futures::StreamExt;

    #[tokio::test]
    async fn cancel_before_next_item_reports_partial() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Result<String, StudyError>>();
        let deltas: TextDeltaStream = Box::pin(futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        }));
        let (mut stream, handle) = make_cancellable(cumulative(deltas));

        tx.send(Ok("Hel".to_string())).unwrap();
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first, StreamUpdate { delta: "Hel".into(), text: "Hel".into() });

        // Provider is now silent; cancellation must not wait for it.
        let waiter = tokio::spawn(async move { stream.next().await });
        tokio::task::yield_now().await;
        handle.cancel();
        let err = waiter.await.unwrap().unwrap().unwrap_err();

        assert_eq!(err, StudyError::stream("stream cancelled", "Hel"));
        drop(tx);
    }

    #[tokio::test]
    async fn uncancelled_stream_passes_through() {
        let deltas: TextDeltaStream = Box::pin(futures::stream::iter(vec![
            Ok("a".to_string()),
            Ok("b".to_string()),
        ]));
        let (stream, handle) = make_cancellable(cumulative(deltas));
        assert!(!handle.is_cancelled());
        assert_eq!(collect_text(stream).await.unwrap(), "ab");
    }
}
