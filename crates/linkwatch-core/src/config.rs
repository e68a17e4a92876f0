// ── Runtime configuration ──
//
// These types describe *where* to fetch from and *how* to decide whether
// the network is reachable. They never touch disk: the CLI builds a
// `WatchConfig` (usually via linkwatch-config) and hands it in.

use std::time::Duration;

use linkwatch_api::{DEFAULT_ENDPOINT, TlsMode, TransportConfig};
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification.
    DangerAcceptInvalid,
}

/// How the native connectivity source probes the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    /// `host:port` to open a TCP connection to.
    pub target: String,
    /// Delay between probes.
    pub interval: Duration,
    /// How long a single connection attempt may take before it counts as offline.
    pub connect_timeout: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            target: "1.1.1.1:443".into(),
            interval: Duration::from_secs(5),
            connect_timeout: Duration::from_millis(1500),
        }
    }
}

/// Everything the core needs to run one monitor and one fetch controller.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// The fixed remote resource.
    pub endpoint: Url,
    /// TLS verification strategy for the fetch.
    pub tls: TlsVerification,
    /// Request timeout for the fetch.
    pub timeout: Duration,
    /// Connectivity probing.
    pub probe: ProbeSettings,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            probe: ProbeSettings::default(),
        }
    }
}

impl WatchConfig {
    /// Build a [`TransportConfig`] for the fetch client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: tls_to_transport(&self.tls),
            timeout: self.timeout,
            ..TransportConfig::default()
        }
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
