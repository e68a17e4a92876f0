//! `linkwatch watch`: the interactive page.
//!
//! The banner follows the probe for the whole session. Each input line is
//! a command; an empty line fetches.

use std::io::BufRead;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use linkwatch_api::UsersClient;
use linkwatch_core::{ConnectivityMonitor, FetchController, ProbeSource, WatchConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::surface::{TerminalSurface, should_color};

const HELP: &str = "commands: <enter>/f/fetch  s/status  q/quit  h/help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Fetch,
    Status,
    Quit,
    Help,
    Unknown,
}

impl Input {
    fn parse(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "f" | "fetch" => Self::Fetch,
            "s" | "status" => Self::Status,
            "q" | "quit" | "exit" => Self::Quit,
            "h" | "help" | "?" => Self::Help,
            _ => Self::Unknown,
        }
    }
}

pub async fn handle(config: WatchConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let terminal = Arc::new(TerminalSurface::new(should_color(&global.color)));
    let client = UsersClient::new(config.endpoint.clone(), &config.transport())?;
    let cancel = CancellationToken::new();

    let source = ProbeSource::start(config.probe, cancel.child_token()).await;
    let monitor = ConnectivityMonitor::new(source, terminal.clone());
    let monitor_task = tokio::spawn({
        let monitor = monitor.clone();
        let cancel = cancel.child_token();
        async move { monitor.run(cancel).await }
    });

    let controller = FetchController::new(client, terminal.clone(), terminal);
    eprintln!("Watching {}. {HELP}", config.endpoint);

    let mut lines = spawn_input_reader();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            biased;
            _ = &mut ctrl_c => {
                debug!("interrupted");
                break;
            }
            line = lines.recv() => {
                let Some(line) = line else {
                    debug!("input closed");
                    break;
                };
                match Input::parse(&line) {
                    Input::Fetch => {
                        if controller.is_loading() {
                            eprintln!("A fetch is already in progress.");
                            continue;
                        }
                        let controller = controller.clone();
                        tokio::spawn(async move { controller.trigger().await });
                    }
                    Input::Status => {
                        let state = if monitor.current_status() { "online" } else { "offline" };
                        eprintln!("{state}");
                    }
                    Input::Quit => break,
                    Input::Help => eprintln!("{HELP}"),
                    Input::Unknown => eprintln!("Unknown command {:?}. {HELP}", line.trim()),
                }
            }
        }
    }

    cancel.cancel();
    if let Err(e) = monitor_task.await {
        warn!(error = %e, "connectivity monitor task failed");
    }
    Ok(())
}

/// Read stdin lines on a plain thread.
///
/// Blocking stdin reads can't be cancelled; a detached thread does not
/// hold up runtime shutdown the way `spawn_blocking` would.
fn spawn_input_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::Input;

    #[test]
    fn empty_line_fetches() {
        assert_eq!(Input::parse(""), Input::Fetch);
        assert_eq!(Input::parse("   "), Input::Fetch);
        assert_eq!(Input::parse("Fetch"), Input::Fetch);
    }

    #[test]
    fn recognizes_commands() {
        assert_eq!(Input::parse("s"), Input::Status);
        assert_eq!(Input::parse("quit"), Input::Quit);
        assert_eq!(Input::parse("?"), Input::Help);
        assert_eq!(Input::parse("reload"), Input::Unknown);
    }
}
