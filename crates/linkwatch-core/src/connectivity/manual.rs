// Hand-driven connectivity source.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;

use super::{ConnectivitySignal, ConnectivitySource, SIGNAL_CHANNEL_SIZE};

/// A connectivity source whose flag and notifications are set by hand.
///
/// The flag and the notification channel are independent, like a
/// browser's `navigator.onLine` and its `online`/`offline` events: a test
/// can stub one without the other.
#[derive(Debug)]
pub struct ManualSource {
    online: AtomicBool,
    tx: broadcast::Sender<ConnectivitySignal>,
}

impl ManualSource {
    pub fn new(online: bool) -> Self {
        let (tx, _) = broadcast::channel(SIGNAL_CHANNEL_SIZE);
        Self {
            online: AtomicBool::new(online),
            tx,
        }
    }

    /// Set the flag and emit the matching notification.
    pub fn set_online(&self, online: bool) {
        self.set_flag(online);
        self.emit(ConnectivitySignal::from(online));
    }

    /// Change the live flag without notifying anyone.
    pub fn set_flag(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Emit a notification without touching the flag.
    pub fn emit(&self, signal: ConnectivitySignal) {
        // No receivers is fine: nobody is listening yet.
        let _ = self.tx.send(signal);
    }
}

impl ConnectivitySource for ManualSource {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn signals(&self) -> broadcast::Receiver<ConnectivitySignal> {
        self.tx.subscribe()
    }
}
