//! Command dispatch: bridges CLI args -> core controllers -> terminal.

pub mod config_cmd;
pub mod fetch;
pub mod status;
pub mod watch;

use linkwatch_core::WatchConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command that needs a resolved `WatchConfig`.
pub async fn dispatch(
    cmd: Command,
    config: WatchConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Watch => watch::handle(config, global).await,
        Command::Fetch(args) => fetch::handle(args, &config, global).await,
        Command::Status => status::handle(config, global).await,
        // Config, Completions and Man are handled before dispatch
        Command::Config(_) | Command::Completions(_) | Command::Man => unreachable!(),
    }
}
