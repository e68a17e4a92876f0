mod cli;
mod commands;
mod error;
mod surface;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use linkwatch_core::WatchConfig;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a resolved WatchConfig
        Command::Config(args) => commands::config_cmd::handle(args),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "linkwatch", &mut std::io::stdout());
            Ok(())
        }

        Command::Man => {
            use clap::CommandFactory;

            clap_mangen::Man::new(Cli::command()).render(&mut std::io::stdout())?;
            Ok(())
        }

        cmd => {
            let config = build_watch_config(&cli.global)?;
            tracing::debug!(command = ?cmd, endpoint = %config.endpoint, "dispatching command");
            commands::dispatch(cmd, config, &cli.global).await
        }
    }
}

/// Build a `WatchConfig` from the config file, environment, and CLI overrides.
fn build_watch_config(global: &GlobalOpts) -> Result<WatchConfig, CliError> {
    let mut cfg = linkwatch_config::load_config()?;

    if let Some(ref endpoint) = global.endpoint {
        cfg.endpoint.clone_from(endpoint);
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    if global.insecure {
        cfg.insecure = true;
    }

    Ok(linkwatch_config::to_watch_config(&cfg)?)
}
