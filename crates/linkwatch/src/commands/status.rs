//! `linkwatch status`: probe connectivity once.

use owo_colors::OwoColorize;

use linkwatch_core::{ProbeSource, WatchConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::surface::should_color;

pub async fn handle(config: WatchConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let online = ProbeSource::probe(&config.probe).await;
    let color = should_color(&global.color);

    match (online, color) {
        (true, true) => println!("{}", "online".green()),
        (true, false) => println!("online"),
        (false, true) => println!("{}", "offline".red()),
        (false, false) => println!("offline"),
    }

    if online {
        Ok(())
    } else {
        Err(CliError::Offline {
            target: config.probe.target,
        })
    }
}
