//! `linkwatch fetch`: one trigger, one rendered outcome.

use std::sync::Arc;

use linkwatch_api::UsersClient;
use linkwatch_core::{
    FetchController, FetchState, MemorySurface, ResultsRegion, TriggerOutcome, WatchConfig,
};

use crate::cli::{FetchArgs, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::surface::{TerminalSurface, should_color};

pub async fn handle(
    args: FetchArgs,
    config: &WatchConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let terminal = Arc::new(TerminalSurface::new(should_color(&global.color)));
    let client = UsersClient::new(config.endpoint.clone(), &config.transport())?;

    // JSON output prints the users itself, so the results region goes nowhere.
    let results: Arc<dyn ResultsRegion> = match args.output {
        OutputFormat::Pretty => terminal.clone(),
        OutputFormat::Json => Arc::new(MemorySurface::new()),
    };
    let controller = FetchController::new(client, results, terminal);

    match controller.trigger().await {
        TriggerOutcome::Completed(state @ FetchState::Success(_)) => {
            if matches!(args.output, OutputFormat::Json) {
                println!("{}", serde_json::to_string_pretty(state.users())?);
            }
            Ok(())
        }
        TriggerOutcome::Completed(FetchState::Error(_)) => Err(CliError::FetchFailed {
            endpoint: controller.directory().endpoint().to_string(),
        }),
        // A fresh controller always runs its first trigger to completion.
        TriggerOutcome::Ignored
        | TriggerOutcome::Completed(FetchState::Idle | FetchState::Loading) => Ok(()),
    }
}
