// Subscription types for consuming connectivity changes.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use super::ConnectivityState;

/// A subscription to the monitor's connectivity state.
///
/// Provides point-in-time access and change notification via `changed()`
/// or by converting into a `Stream`. Unlike [`on_change`] callbacks, a slow
/// stream consumer only sees the latest state, not every notification.
///
/// [`on_change`]: super::ConnectivityMonitor::on_change
pub struct ConnectivityStream {
    current: ConnectivityState,
    receiver: watch::Receiver<ConnectivityState>,
}

impl ConnectivityStream {
    pub(crate) fn new(receiver: watch::Receiver<ConnectivityState>) -> Self {
        let current = *receiver.borrow();
        Self { current, receiver }
    }

    /// The state captured at creation time or at the last `changed()`.
    pub fn current(&self) -> ConnectivityState {
        self.current
    }

    /// The latest state (may have changed since creation).
    pub fn latest(&self) -> ConnectivityState {
        *self.receiver.borrow()
    }

    /// Wait for the next notification, returning the new state.
    /// Returns `None` once the monitor has been dropped.
    pub async fn changed(&mut self) -> Option<ConnectivityState> {
        self.receiver.changed().await.ok()?;
        let state = *self.receiver.borrow_and_update();
        self.current = state;
        Some(state)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    ///
    /// The stream yields the current state first.
    pub fn into_stream(self) -> ConnectivityWatchStream {
        ConnectivityWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct ConnectivityWatchStream {
    inner: WatchStream<ConnectivityState>,
}

impl Stream for ConnectivityWatchStream {
    type Item = ConnectivityState;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
