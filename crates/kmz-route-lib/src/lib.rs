//! KMZ Route Library - Core pipeline for combining recorded KMZ tracks
//!
//! This library extracts recorded paths from a directory of KMZ archives and renders them
//! into a single KML overlay where every path is a filled, outlined highlight polygon.
//!
//! # Architecture
//!
//! - **[`archive`]**: Locates the embedded KML document inside a KMZ container
//! - **[`markup`]**: Lenient KML parsing into geometries plus an optional capture time
//! - **[`RouteCollection`]**: Drives reading and parsing over a directory and orders the result
//! - **[`ring`]**: Idempotent ring closing for polygon fill
//! - **[`writer`]**: Styled KML rendering behind the [`DocumentBuilder`] capability
//!
//! Data flows strictly forward: directory → archive → markup → collection → ring → writer.
//!
//! # Error Policy
//!
//! Per-archive and per-token failures are reported through a [`Reporter`] and skipped at the
//! smallest possible scope. Only listing the input directory and persisting the output are fatal.

pub mod archive;
mod collection;
pub mod markup;
mod report;
pub mod ring;
mod route;
pub mod utils;
pub mod writer;

use std::path::PathBuf;

// Public API exports
pub use collection::{Config, RouteCollection, list_archives, load_archive};
pub use markup::ParsedMarkup;
pub use report::{Report, Reporter, TracingReporter};
pub use route::Route;
pub use writer::{DocumentBuilder, KmlColor, KmlDocument, PolygonStyle};

/// Error types for the route pipeline
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("Cannot read archive {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("No KML document found in {}", path.display())]
    MissingDocument { path: PathBuf },

    #[error("Malformed KML: {0}")]
    MalformedMarkup(#[from] xml::reader::Error),

    #[error("Skipping malformed coordinate token {token:?}")]
    MalformedCoordinateToken { token: String },

    #[error("Invalid timestamp {value:?}: {reason}")]
    MalformedTimestamp { value: String, reason: String },

    #[error("Empty route")]
    EmptyRoute,

    #[error("KML rendering error: {0}")]
    Render(#[from] xml::writer::Error),

    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RouteError>;
