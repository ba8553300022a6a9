mod cli;
mod metadata;
mod run;
mod upload;

use clap::Parser;
use cli::Cli;
use kmz_route_lib::TracingReporter;
use run::Outcome;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use upload::{DriveUploader, Uploader};

fn main() -> ExitCode {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    metadata::log_version_info();

    let cli = Cli::parse();

    // Fail before doing any work if the upload cannot happen
    let uploader = if cli.upload {
        match DriveUploader::new(cli.drive_token.clone()) {
            Ok(uploader) => Some(uploader),
            Err(e) => {
                tracing::error!("{e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        None
    };

    match run::run(
        &cli,
        &TracingReporter,
        uploader.as_ref().map(|u| u as &dyn Uploader),
    ) {
        Ok(Outcome::NoRoutes) => {
            tracing::info!("No routes found in the directory.");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Written {
            path,
            routes,
            upload_id,
        }) => {
            tracing::info!(
                "Done: {routes} route(s) in {}{}",
                path.display(),
                upload_id
                    .map(|id| format!(", Drive file {id}"))
                    .unwrap_or_default()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
