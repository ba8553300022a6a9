//! RouteCollection - Directory aggregation and ordering of routes
//!
//! This module drives the archive reader and markup parser over every KMZ file of a
//! directory, turns each extracted geometry into a [`Route`] and orders the result by
//! natural name order.

use crate::{Report, Reporter, Result, Route, archive, markup, utils};

use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for directory aggregation
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Read and parse archives on the rayon thread pool (default true).
    /// Ordering is identical either way.
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Non-empty, naturally ordered set of routes built once per run
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteCollection {
    /// Routes in natural name order
    routes: Vec<Route>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl RouteCollection {
    /// Build a collection from routes in any order
    ///
    /// Routes are stably sorted by [`utils::natural_cmp`] on their names, so routes sharing a
    /// name keep their relative order. Returns `None` when there are no routes.
    pub fn from_routes(mut routes: Vec<Route>) -> Option<Self> {
        if routes.is_empty() {
            return None;
        }
        routes.sort_by(|a, b| utils::natural_cmp(a.name(), b.name()));
        Some(Self { routes })
    }

    /// Load every KMZ archive of a directory
    ///
    /// Entries whose name ends in `.kmz` (any case) are read and parsed, other entries are
    /// ignored. Archives that fail to read or parse are reported and skipped.
    ///
    /// # Returns
    /// * `Ok(Some(collection))` with every extracted route in natural order
    /// * `Ok(None)` when no archive yielded any route
    /// * `Err(_)` only if the directory itself cannot be listed
    pub fn load_directory(
        directory: &Path,
        config: &Config,
        reporter: &dyn Reporter,
    ) -> Result<Option<Self>> {
        #[cfg(feature = "profiling")]
        profiling::scope!("collection::load_directory");

        let archives = list_archives(directory)?;
        tracing::debug!(
            "Found {} archive(s) in {}",
            archives.len(),
            directory.display()
        );
        Ok(Self::load_archives(&archives, config, reporter))
    }

    /// Load the given archives, see [`RouteCollection::load_directory`]
    ///
    /// Per-archive work may run in parallel; the routes are collected in input order and
    /// sorted once every archive has been processed.
    pub fn load_archives<P: AsRef<Path> + Sync>(
        archives: &[P],
        config: &Config,
        reporter: &dyn Reporter,
    ) -> Option<Self> {
        let per_archive: Vec<Vec<Route>> = if config.parallel {
            archives
                .par_iter()
                .map(|path| load_archive(path.as_ref(), reporter))
                .collect()
        } else {
            archives
                .iter()
                .map(|path| load_archive(path.as_ref(), reporter))
                .collect()
        };

        Self::from_routes(per_archive.into_iter().flatten().collect())
    }

    /// Get total number of routes
    #[inline]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Always false: an empty aggregation is represented as `None`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Get all routes in order
    #[inline]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }
}

impl<'a> IntoIterator for &'a RouteCollection {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

/// List the KMZ archives of a directory, sorted by path
///
/// The sort only makes processing order reproducible; the final route order comes from
/// [`RouteCollection::from_routes`].
pub fn list_archives(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut archives = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        let file_name = entry.file_name();
        if archive::has_extension(&file_name.to_string_lossy(), archive::ARCHIVE_EXTENSION) {
            archives.push(entry.path());
        }
    }
    archives.sort();
    Ok(archives)
}

/// Route name for an archive: its file name without the extension
fn route_name(archive: &Path) -> String {
    archive
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read and parse one archive into routes
///
/// Never fails: every problem is reported and the archive contributes what it can, possibly
/// nothing.
pub fn load_archive(path: &Path, reporter: &dyn Reporter) -> Vec<Route> {
    #[cfg(feature = "profiling")]
    profiling::scope!("collection::load_archive");

    let parsed = match archive::read_markup(path).and_then(|data| markup::parse_markup(&data)) {
        Ok(parsed) => parsed,
        Err(error) => {
            reporter.report(Report::ArchiveSkipped {
                archive: path,
                error: &error,
            });
            return Vec::new();
        }
    };

    for issue in &parsed.issues {
        reporter.report(Report::Issue {
            archive: path,
            issue,
        });
    }
    reporter.report(Report::ArchiveParsed {
        archive: path,
        geometries: parsed.geometries.len(),
        capture_time: parsed.capture_time,
    });

    let name = route_name(path);
    parsed
        .geometries
        .into_iter()
        .filter_map(|geometry| Route::new(name.clone(), parsed.capture_time, geometry).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RouteError;
    use geo::LineString;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingReporter {
        skipped: Mutex<Vec<PathBuf>>,
    }

    impl Reporter for RecordingReporter {
        fn report(&self, report: Report<'_>) {
            if let Report::ArchiveSkipped { archive, .. } = report {
                self.skipped.lock().unwrap().push(archive.to_path_buf());
            }
        }
    }

    fn create_test_route(name: &str) -> Route {
        Route::new(name, None, LineString::from(vec![(0.0, 0.0), (1.0, 1.0)])).unwrap()
    }

    #[test]
    fn test_from_routes_orders_naturally() {
        let routes = vec![
            create_test_route("route2"),
            create_test_route("route10"),
            create_test_route("route1"),
        ];
        let collection = RouteCollection::from_routes(routes).unwrap();

        let names: Vec<&str> = collection.iter().map(Route::name).collect();
        assert_eq!(names, vec!["route1", "route2", "route10"]);
        assert_eq!(collection.len(), 3);
        assert!(!collection.is_empty());
    }

    #[test]
    fn test_from_routes_keeps_order_within_one_archive() {
        let first = Route::new("a", None, LineString::from(vec![(1.0, 1.0)])).unwrap();
        let second = Route::new("a", None, LineString::from(vec![(2.0, 2.0)])).unwrap();
        let collection =
            RouteCollection::from_routes(vec![create_test_route("b"), first.clone(), second.clone()])
                .unwrap();

        assert_eq!(collection.routes()[0], first);
        assert_eq!(collection.routes()[1], second);
    }

    #[test]
    fn test_empty_routes_is_none() {
        assert!(RouteCollection::from_routes(Vec::new()).is_none());
    }

    #[test]
    fn test_route_name() {
        assert_eq!(route_name(Path::new("/data/route1.kmz")), "route1");
        assert_eq!(route_name(Path::new("Morning.Ride.KMZ")), "Morning.Ride");
    }

    #[test]
    fn test_list_archives_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.kmz", "A.KMZ", "notes.txt", "doc.kml", "kmz"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let archives = list_archives(dir.path()).unwrap();
        let names: Vec<String> = archives
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["A.KMZ", "b.kmz"]);
    }

    #[test]
    fn test_list_archives_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = list_archives(&dir.path().join("nope"));
        assert!(matches!(result, Err(RouteError::Io(_))));
    }

    #[test]
    fn test_unreadable_archive_is_skipped_and_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.kmz");
        std::fs::write(&path, b"garbage").unwrap();

        let reporter = RecordingReporter::default();
        let routes = load_archive(&path, &reporter);

        assert!(routes.is_empty());
        assert_eq!(*reporter.skipped.lock().unwrap(), vec![path]);
    }

    #[test]
    fn test_default_config_is_parallel() {
        assert!(Config::default().parallel);
    }
}
