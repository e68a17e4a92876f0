//! Configuration for linkwatch.
//!
//! A TOML file layered under `LINKWATCH_*` environment variables, and
//! translation to `linkwatch_core::WatchConfig`. Core never reads this
//! crate's types; it receives the translated config.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use linkwatch_core::{ProbeSettings, TlsVerification, WatchConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// The remote user resource.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept any TLS certificate from the endpoint.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Connectivity probing.
    #[serde(default)]
    pub probe: Probe,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
            probe: Probe::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Probe {
    #[serde(default = "default_probe_host")]
    pub host: String,

    #[serde(default = "default_probe_port")]
    pub port: u16,

    #[serde(default = "default_probe_interval")]
    pub interval_secs: u64,

    #[serde(default = "default_probe_connect_timeout")]
    pub connect_timeout_ms: u64,
}

impl Default for Probe {
    fn default() -> Self {
        Self {
            host: default_probe_host(),
            port: default_probe_port(),
            interval_secs: default_probe_interval(),
            connect_timeout_ms: default_probe_connect_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    linkwatch_api::DEFAULT_ENDPOINT.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_probe_host() -> String {
    "1.1.1.1".into()
}
fn default_probe_port() -> u16 {
    443
}
fn default_probe_interval() -> u64 {
    5
}
fn default_probe_connect_timeout() -> u64 {
    1500
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "linkwatch", "linkwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("linkwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path` + environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LINKWATCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write it to `path`, creating parent dirs.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `WatchConfig` from a loaded config.
pub fn to_watch_config(cfg: &Config) -> Result<WatchConfig, ConfigError> {
    let endpoint: url::Url = cfg.endpoint.parse().map_err(|_| ConfigError::Validation {
        field: "endpoint".into(),
        reason: format!("invalid URL: {}", cfg.endpoint),
    })?;

    if !matches!(endpoint.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("unsupported scheme '{}', expected http or https", endpoint.scheme()),
        });
    }

    for (field, value) in [
        ("timeout", cfg.timeout),
        ("probe.interval_secs", cfg.probe.interval_secs),
        ("probe.connect_timeout_ms", cfg.probe.connect_timeout_ms),
    ] {
        if value == 0 {
            return Err(ConfigError::Validation {
                field: field.into(),
                reason: "must be at least 1".into(),
            });
        }
    }

    let tls = if cfg.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = cfg.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(WatchConfig {
        endpoint,
        tls,
        timeout: Duration::from_secs(cfg.timeout),
        probe: ProbeSettings {
            target: format!("{}:{}", cfg.probe.host, cfg.probe.port),
            interval: Duration::from_secs(cfg.probe.interval_secs),
            connect_timeout: Duration::from_millis(cfg.probe.connect_timeout_ms),
        },
    })
}
