use clap::Parser;
use std::path::PathBuf;

/// Default name of the combined document
pub const DEFAULT_OUTPUT: &str = "combined_routes.kml";

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// KMZ Route Highlighter - Combine recorded KMZ tracks into one highlighted KML overlay
///
/// Every route is drawn as a semi-transparent hot pink polygon with a hot pink outline.
/// The base map is not part of the output: pick a light or simple base map in the viewer
/// (e.g. Google My Maps) after importing the file.
pub struct Cli {
    /// Directory containing your KMZ files
    #[clap(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Output KML filename
    #[clap(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Upload the resulting KML to Google Drive
    #[clap(long, default_value = "false")]
    pub upload: bool,

    /// OAuth access token used for the Google Drive upload
    #[clap(
        long,
        value_name = "TOKEN",
        env = "GOOGLE_DRIVE_ACCESS_TOKEN",
        hide_env_values = true
    )]
    pub drive_token: Option<String>,

    /// Read archives one at a time instead of in parallel
    #[clap(long, default_value = "false")]
    pub sequential: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["kmz-route-highlighter", "tracks"]).unwrap();
        assert_eq!(cli.directory, PathBuf::from("tracks"));
        assert_eq!(cli.output, PathBuf::from(DEFAULT_OUTPUT));
        assert!(!cli.upload);
        assert!(!cli.sequential);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "kmz-route-highlighter",
            "tracks",
            "-o",
            "out/all.kml",
            "--upload",
            "--drive-token",
            "secret",
            "--sequential",
        ])
        .unwrap();
        assert_eq!(cli.output, PathBuf::from("out/all.kml"));
        assert!(cli.upload);
        assert_eq!(cli.drive_token.as_deref(), Some("secret"));
        assert!(cli.sequential);
    }

    #[test]
    fn test_directory_is_required() {
        assert!(Cli::try_parse_from(["kmz-route-highlighter"]).is_err());
    }
}
