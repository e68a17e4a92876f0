//! CLI error types with miette diagnostics.
//!
//! Maps config and client errors into user-facing errors with actionable
//! help text. Fetch failures never get here with detail: the controller
//! has already rendered the canonical message, and the underlying cause
//! is only in the logs.

use miette::Diagnostic;
use thiserror::Error;

use linkwatch_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connectivity / fetch ─────────────────────────────────────────
    #[error("Fetch from {endpoint} failed")]
    #[diagnostic(
        code(linkwatch::fetch_failed),
        help("Run again with -v to log the underlying failure.")
    )]
    FetchFailed { endpoint: String },

    #[error("Network unreachable: probe to {target} failed")]
    #[diagnostic(
        code(linkwatch::offline),
        help(
            "Check your connection, or point the probe elsewhere with\n\
             LINKWATCH_PROBE__HOST / LINKWATCH_PROBE__PORT."
        )
    )]
    Offline { target: String },

    #[error("Could not set up the HTTP client")]
    #[diagnostic(
        code(linkwatch::client),
        help("Check ca_cert in your config, or use --insecure (-k).")
    )]
    Client {
        #[source]
        source: linkwatch_api::Error,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(linkwatch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(linkwatch::config))]
    Config(Box<figment::Error>),

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(linkwatch::config_exists),
        help("Use --force to overwrite it.\nPath: {path}")
    )]
    ConfigExists { path: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    #[diagnostic(code(linkwatch::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FetchFailed { .. } | Self::Offline { .. } => exit_code::CONNECTION,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Config(_) | Self::ConfigExists { .. } | Self::Client { .. } => exit_code::CONFIG,
            Self::Io(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<linkwatch_api::Error> for CliError {
    fn from(source: linkwatch_api::Error) -> Self {
        Self::Client { source }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: format!("failed to serialize config: {e}"),
            },
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
