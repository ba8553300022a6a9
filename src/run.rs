use crate::cli::Cli;
use crate::upload::{UploadError, Uploader};
use kmz_route_lib::{Config, Reporter, RouteCollection, RouteError, writer};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),
}

/// How a run ended
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The directory held no usable route; nothing was written
    NoRoutes,
    /// The combined document was written (and uploaded when requested)
    Written {
        path: PathBuf,
        routes: usize,
        upload_id: Option<String>,
    },
}

/// Aggregate the input directory, write the combined KML and optionally upload it
pub fn run(
    cli: &Cli,
    reporter: &dyn Reporter,
    uploader: Option<&dyn Uploader>,
) -> Result<Outcome, RunError> {
    let config = Config {
        parallel: !cli.sequential,
    };
    let Some(collection) = RouteCollection::load_directory(&cli.directory, &config, reporter)?
    else {
        return Ok(Outcome::NoRoutes);
    };

    writer::write_kml(&collection, &cli.output, reporter)?;

    let upload_id = match uploader {
        Some(uploader) => {
            let name = cli
                .output
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| crate::cli::DEFAULT_OUTPUT.to_string());
            let id = uploader.upload(&cli.output, &name)?;
            tracing::info!("File uploaded to Google Drive with ID: {id}");
            tracing::info!("You can now import this KML into Google My Maps.");
            Some(id)
        }
        None => None,
    };

    Ok(Outcome::Written {
        path: cli.output.clone(),
        routes: collection.len(),
        upload_id,
    })
}
