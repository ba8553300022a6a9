//! Progress and warning reporting
//!
//! The pipeline never logs directly: everything worth telling the user goes through a
//! [`Reporter`], so callers decide where messages end up and tests can inspect them.

use crate::RouteError;
use chrono::{DateTime, FixedOffset};
use std::path::Path;

/// Something the pipeline wants to tell its caller
#[derive(Debug)]
pub enum Report<'a> {
    /// An archive was dropped entirely (unreadable, no KML, or malformed KML)
    ArchiveSkipped {
        archive: &'a Path,
        error: &'a RouteError,
    },
    /// A recoverable problem inside an archive that was otherwise used
    Issue {
        archive: &'a Path,
        issue: &'a RouteError,
    },
    /// An archive was parsed
    ArchiveParsed {
        archive: &'a Path,
        geometries: usize,
        capture_time: Option<DateTime<FixedOffset>>,
    },
    /// The combined document was written
    Saved { path: &'a Path, polygons: usize },
}

/// Sink for pipeline reports
///
/// Must be shareable across threads, as archives may be processed in parallel.
pub trait Reporter: Send + Sync {
    fn report(&self, report: Report<'_>);
}

/// Reporter that forwards everything to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, report: Report<'_>) {
        match report {
            Report::ArchiveSkipped { archive, error } => {
                tracing::warn!("Skipping {}: {error}", archive.display());
            }
            Report::Issue { archive, issue } => {
                tracing::warn!("{}: {issue}", archive.display());
            }
            Report::ArchiveParsed {
                archive,
                geometries,
                capture_time,
            } => match capture_time {
                Some(time) => tracing::debug!(
                    "Parsed {geometries} route(s) from {} captured at {time}",
                    archive.display()
                ),
                None => tracing::debug!(
                    "Parsed {geometries} route(s) from {} without capture time",
                    archive.display()
                ),
            },
            Report::Saved { path, polygons } => {
                tracing::info!("Combined KML with {polygons} route(s) saved to {}", path.display());
            }
        }
    }
}
