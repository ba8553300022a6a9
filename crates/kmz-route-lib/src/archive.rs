//! KMZ container access
//!
//! A KMZ file is a ZIP archive bundling one KML document (commonly `doc.kml`) and optional
//! assets such as icons. Only the document is of interest here.

use crate::{Result, RouteError};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// File extension of the compressed archives accepted as input
pub const ARCHIVE_EXTENSION: &str = "kmz";

/// File extension of the markup document embedded in each archive
pub const MARKUP_EXTENSION: &str = "kml";

/// Case-insensitive check of a file name against an extension (without the dot)
#[inline]
pub fn has_extension(name: &str, extension: &str) -> bool {
    let lower = name.to_lowercase();
    lower.len() > extension.len()
        && lower.ends_with(extension)
        && lower.as_bytes()[lower.len() - extension.len() - 1] == b'.'
}

/// Read the first embedded KML document of a KMZ archive
///
/// Entries are scanned in archive order and the first file whose name ends in `.kml`
/// (any case) wins. The archive is closed before returning on every path.
///
/// # Errors
/// * [`RouteError::ReadError`] if the archive cannot be opened, is corrupt, or the entry
///   cannot be decompressed
/// * [`RouteError::MissingDocument`] if no entry carries the KML extension
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn read_markup(path: &Path) -> Result<Vec<u8>> {
    let read_error = |source: zip::result::ZipError| RouteError::ReadError {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| read_error(e.into()))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(read_error)?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(read_error)?;
        if entry.is_dir() || !has_extension(entry.name(), MARKUP_EXTENSION) {
            continue;
        }

        tracing::debug!("Reading {} from {}", entry.name(), path.display());
        // The declared size comes from the archive itself and may be bogus
        let mut data = Vec::new();
        entry
            .read_to_end(&mut data)
            .map_err(|e| read_error(e.into()))?;
        return Ok(data);
    }

    Err(RouteError::MissingDocument {
        path: path.to_path_buf(),
    })
}
