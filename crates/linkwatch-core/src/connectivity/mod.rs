// ── Connectivity monitor ──
//
// Mirrors the environment's connectivity flag into the status banner.
// The environment is any `ConnectivitySource`; the banner is one
// observer among possibly several.

mod manual;
mod probe;
mod stream;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use strum::Display;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::surface::StatusBanner;

pub use manual::ManualSource;
pub use probe::ProbeSource;
pub use stream::{ConnectivityStream, ConnectivityWatchStream};

const SIGNAL_CHANNEL_SIZE: usize = 64;

// ── Signals and state ────────────────────────────────────────────

/// An environment notification: "became online" or "became offline".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ConnectivitySignal {
    Online,
    Offline,
}

impl ConnectivitySignal {
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

impl From<bool> for ConnectivitySignal {
    fn from(online: bool) -> Self {
        if online { Self::Online } else { Self::Offline }
    }
}

/// The monitor's current belief about the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityState {
    pub is_online: bool,
}

impl ConnectivityState {
    /// The banner is shown exactly when the network is believed down.
    pub fn banner_visible(self) -> bool {
        !self.is_online
    }
}

/// The environment's connectivity API: a live flag plus a notification
/// channel. Consumed by [`ConnectivityMonitor`], never implemented by it.
pub trait ConnectivitySource: Send + Sync {
    /// The live flag. Always available, never fails.
    fn is_online(&self) -> bool;

    /// A fresh receiver for "became online"/"became offline" notifications.
    fn signals(&self) -> broadcast::Receiver<ConnectivitySignal>;
}

// ── Observers ────────────────────────────────────────────────────

/// Identifies one registration made through
/// [`ConnectivityMonitor::on_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(u64);

type Observer = Arc<dyn Fn(bool) + Send + Sync>;

// ── ConnectivityMonitor ──────────────────────────────────────────

/// Reflects a [`ConnectivitySource`] into observers, starting with the
/// status banner.
///
/// Cheaply cloneable. Every notification is applied verbatim: an
/// "offline" signal means offline regardless of the cached value, and a
/// redundant signal still produces one update.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    source: Arc<dyn ConnectivitySource>,
    state: watch::Sender<ConnectivityState>,
    signals: Mutex<Option<broadcast::Receiver<ConnectivitySignal>>>,
    observers: Mutex<Vec<(ObserverHandle, Observer)>>,
    next_observer: AtomicU64,
}

impl ConnectivityMonitor {
    /// Create a monitor and render the banner for the current flag before
    /// returning.
    ///
    /// Subscribes to the source's notifications first, so a transition
    /// racing with construction is delivered once [`run`](Self::run) starts.
    pub fn new(source: Arc<dyn ConnectivitySource>, banner: Arc<dyn StatusBanner>) -> Self {
        let signals = source.signals();
        let initial = ConnectivityState {
            is_online: source.is_online(),
        };
        let (state, _) = watch::channel(initial);

        let monitor = Self {
            inner: Arc::new(MonitorInner {
                source,
                state,
                signals: Mutex::new(Some(signals)),
                observers: Mutex::new(Vec::new()),
                next_observer: AtomicU64::new(0),
            }),
        };

        monitor.on_change(move |online| banner.set_visible(!online));
        monitor.notify(initial.is_online);
        debug!(online = initial.is_online, "connectivity monitor initialized");
        monitor
    }

    /// Read the environment's live flag.
    pub fn current_status(&self) -> bool {
        self.inner.source.is_online()
    }

    /// The state as of the last applied notification.
    pub fn state(&self) -> ConnectivityState {
        *self.inner.state.borrow()
    }

    /// Register `callback` to run on every applied notification.
    ///
    /// The callback is not invoked for the current state; read
    /// [`state`](Self::state) for that.
    pub fn on_change<F>(&self, callback: F) -> ObserverHandle
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let handle = ObserverHandle(self.inner.next_observer.fetch_add(1, Ordering::Relaxed));
        self.observers().push((handle, Arc::new(callback)));
        handle
    }

    /// Drop a registration. Returns `false` if the handle was unknown.
    pub fn remove_observer(&self, handle: ObserverHandle) -> bool {
        let mut observers = self.observers();
        let before = observers.len();
        observers.retain(|(h, _)| *h != handle);
        observers.len() != before
    }

    /// Subscribe to state changes as a stream.
    pub fn subscribe(&self) -> ConnectivityStream {
        ConnectivityStream::new(self.inner.state.subscribe())
    }

    /// Apply one environment notification.
    ///
    /// Observers (the banner among them) run before the new state is
    /// published, so a subscriber never sees a state the banner does not
    /// show yet.
    pub fn apply(&self, signal: ConnectivitySignal) {
        debug!(%signal, "connectivity notification");
        let state = ConnectivityState {
            is_online: signal.is_online(),
        };
        self.notify(state.is_online);
        self.inner.state.send_replace(state);
    }

    /// Consume the source's notifications until `cancel` fires or the
    /// source goes away.
    ///
    /// Only the first call does anything; the notification receiver is
    /// handed out once.
    pub async fn run(&self, cancel: CancellationToken) {
        let Some(mut rx) = self.take_signals() else {
            warn!("connectivity monitor is already running");
            return;
        };

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                signal = rx.recv() => match signal {
                    Ok(signal) => self.apply(signal),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "connectivity notifications lagged, resynchronizing");
                        self.apply(ConnectivitySignal::from(self.current_status()));
                    }
                    Err(RecvError::Closed) => {
                        debug!("connectivity source closed");
                        break;
                    }
                },
            }
        }
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn notify(&self, online: bool) {
        // Snapshot first so callbacks may register or remove observers.
        let observers: Vec<Observer> = self
            .observers()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer(online);
        }
    }

    fn observers(&self) -> MutexGuard<'_, Vec<(ObserverHandle, Observer)>> {
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn take_signals(&self) -> Option<broadcast::Receiver<ConnectivitySignal>> {
        self.inner
            .signals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}
