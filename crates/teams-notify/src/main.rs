//! teams-notify - post a CI notification to a Microsoft Teams webhook.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use teams_notify::metadata::{PipeMetadata, DEFAULT_METADATA_PATH};
use teams_notify::report;
use teams_notify::{run, Configuration, NotifyError, TeamsChannel};

/// Send a notification to a Microsoft Teams incoming webhook.
///
/// Options are read from the environment: WEBHOOK_URL, MESSAGE,
/// PAYLOAD_FILE, TITLE and DEBUG.
#[derive(Parser, Debug)]
#[command(name = "teams-notify")]
#[command(version, about)]
struct Cli {
    /// Pipe descriptor reported at startup
    #[arg(long, env = "PIPE_METADATA", default_value = DEFAULT_METADATA_PATH)]
    metadata: PathBuf,
}

fn init_tracing(debug: bool) {
    let default_directive = if debug {
        "teams_notify=debug,info"
    } else {
        "teams_notify=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn log_metadata(cli: &Cli) {
    match PipeMetadata::load(&cli.metadata) {
        Ok(Some(metadata)) => info!(
            name = metadata.name.as_deref().unwrap_or("unknown"),
            version = metadata.version().unwrap_or("unknown"),
            "Pipe metadata loaded"
        ),
        Ok(None) => debug!(path = %cli.metadata.display(), "No pipe metadata found"),
        Err(e) => warn!("{e:#}"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = Configuration::from_env();
    init_tracing(config.as_ref().is_ok_and(Configuration::debug));
    log_metadata(&cli);

    let result = match config {
        Ok(config) => {
            let channel = TeamsChannel::new(config.webhook_url().clone());
            run(&config, &channel).await
        }
        Err(errors) => Err(NotifyError::from(errors)),
    };

    match result {
        Ok(summary) => {
            report::print_success(summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            report::print_failure(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
