// ── Native connectivity source ──
//
// Decides connectivity by opening a TCP connection to a probe target on
// a fixed interval. Notifications are emitted only on transitions.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{ConnectivitySignal, ConnectivitySource, SIGNAL_CHANNEL_SIZE};
use crate::config::ProbeSettings;

/// Connectivity source backed by periodic TCP probes.
#[derive(Debug)]
pub struct ProbeSource {
    settings: ProbeSettings,
    online: AtomicBool,
    tx: broadcast::Sender<ConnectivitySignal>,
}

impl ProbeSource {
    /// Probe once, then keep probing in a background task until `cancel`
    /// fires.
    ///
    /// The first probe completes before this returns, so
    /// [`is_online`](ConnectivitySource::is_online) is truthful from the start.
    pub async fn start(settings: ProbeSettings, cancel: CancellationToken) -> Arc<Self> {
        let online = Self::probe(&settings).await;
        info!(probe = %settings.target, online, "connectivity probe started");

        let (tx, _) = broadcast::channel(SIGNAL_CHANNEL_SIZE);
        let source = Arc::new(Self {
            settings,
            online: AtomicBool::new(online),
            tx,
        });

        tokio::spawn(probe_task(Arc::clone(&source), cancel));
        source
    }

    /// Run a single probe against `settings.target`.
    pub async fn probe(settings: &ProbeSettings) -> bool {
        let attempt = TcpStream::connect(settings.target.as_str());
        match tokio::time::timeout(settings.connect_timeout, attempt).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                debug!(probe = %settings.target, error = %e, "probe failed");
                false
            }
            Err(_) => {
                debug!(
                    probe = %settings.target,
                    timeout_ms = settings.connect_timeout.as_millis(),
                    "probe timed out"
                );
                false
            }
        }
    }

    /// Store a probe result, notifying only if the flag flipped.
    fn record(&self, online: bool) {
        let previous = self.online.swap(online, Ordering::SeqCst);
        if previous != online {
            let signal = ConnectivitySignal::from(online);
            info!(%signal, "connectivity changed");
            let _ = self.tx.send(signal);
        }
    }
}

impl ConnectivitySource for ProbeSource {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn signals(&self) -> broadcast::Receiver<ConnectivitySignal> {
        self.tx.subscribe()
    }
}

async fn probe_task(source: Arc<ProbeSource>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(source.settings.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let online = ProbeSource::probe(&source.settings).await;
                source.record(online);
            }
        }
    }
    debug!("connectivity probe stopped");
}
