//! Clap derive structures for the `linkwatch` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// linkwatch -- connectivity banner and on-demand user fetch
#[derive(Debug, Parser)]
#[command(
    name = "linkwatch",
    version,
    about = "Watch network connectivity and fetch a remote user list",
    long_about = "Shows an offline banner whenever the network becomes unreachable,\n\
        and fetches a remote user list on demand, rendering the users or a\n\
        single error message.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Remote user endpoint (overrides config)
    #[arg(long, short = 'e', env = "LINKWATCH_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "LINKWATCH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Accept any TLS certificate from the endpoint
    #[arg(long, short = 'k', env = "LINKWATCH_INSECURE", global = true)]
    pub insecure: bool,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// One line per user (default, interactive)
    Pretty,
    /// Pretty-printed JSON array of users
    Json,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Watch connectivity and fetch users on demand (interactive)
    #[command(alias = "w")]
    Watch,

    /// Fetch the user list once
    #[command(alias = "f")]
    Fetch(FetchArgs),

    /// Probe connectivity once
    Status,

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Print the man page (roff) to stdout
    Man,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Output format
    #[arg(long, short = 'o', default_value = "pretty")]
    pub output: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (file + environment)
    Show,

    /// Print the config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
