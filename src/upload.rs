//! Optional upload of the combined document to Google Drive
//!
//! Only the transfer lives here. Obtaining and refreshing the OAuth access token is left to
//! the user (e.g. `gcloud auth print-access-token`).

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// MIME type of KML documents
pub const KML_MIME_TYPE: &str = "application/vnd.google-earth.kml+xml";

const DRIVE_UPLOAD_URL: &str =
    "https://www.googleapis.com/upload/drive/v3/files?uploadType=multipart&fields=id";

const MULTIPART_BOUNDARY: &str = "kmz-route-highlighter-part";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Google Drive upload needs an access token (--drive-token or GOOGLE_DRIVE_ACCESS_TOKEN)")]
    MissingToken,

    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Remote storage for the produced document
///
/// Implementations read the file at `path` and never modify it.
pub trait Uploader {
    /// Upload the file under the display name `name`, returning the remote file id
    fn upload(&self, path: &Path, name: &str) -> Result<String, UploadError>;
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

/// Uploads files with the Google Drive v3 multipart endpoint
pub struct DriveUploader {
    client: reqwest::blocking::Client,
    access_token: String,
}

impl DriveUploader {
    pub fn new(access_token: Option<String>) -> Result<Self, UploadError> {
        let access_token = access_token
            .filter(|token| !token.trim().is_empty())
            .ok_or(UploadError::MissingToken)?;
        Ok(Self {
            client: reqwest::blocking::Client::new(),
            access_token,
        })
    }
}

impl Uploader for DriveUploader {
    fn upload(&self, path: &Path, name: &str) -> Result<String, UploadError> {
        let content = std::fs::read(path).map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let file: DriveFile = self
            .client
            .post(DRIVE_UPLOAD_URL)
            .bearer_auth(&self.access_token)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(multipart_body(name, &content))
            .send()?
            .error_for_status()?
            .json()?;
        Ok(file.id)
    }
}

/// `multipart/related` body carrying the file metadata followed by the KML content
fn multipart_body(name: &str, content: &[u8]) -> Vec<u8> {
    let metadata = serde_json::json!({ "name": name, "mimeType": KML_MIME_TYPE });

    let mut body = Vec::with_capacity(content.len() + 256);
    body.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!("--{MULTIPART_BOUNDARY}\r\nContent-Type: {KML_MIME_TYPE}\r\n\r\n").as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token() {
        assert!(matches!(
            DriveUploader::new(None),
            Err(UploadError::MissingToken)
        ));
        assert!(matches!(
            DriveUploader::new(Some("  ".to_string())),
            Err(UploadError::MissingToken)
        ));
        assert!(DriveUploader::new(Some("token".to_string())).is_ok());
    }

    #[test]
    fn test_multipart_body() {
        let body = String::from_utf8(multipart_body("routes.kml", b"<kml/>")).unwrap();

        assert!(body.starts_with("--kmz-route-highlighter-part\r\n"));
        assert!(body.contains(r#""name":"routes.kml""#));
        assert!(body.contains(r#""mimeType":"application/vnd.google-earth.kml+xml""#));
        assert!(body.contains(
            "Content-Type: application/vnd.google-earth.kml+xml\r\n\r\n<kml/>\r\n--kmz-route-highlighter-part--\r\n"
        ));
        assert_eq!(body.matches("--kmz-route-highlighter-part").count(), 3);
    }

    #[test]
    fn test_unreadable_file() {
        let uploader = DriveUploader::new(Some("token".to_string())).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let result = uploader.upload(&dir.path().join("missing.kml"), "missing.kml");
        assert!(matches!(result, Err(UploadError::Read { .. })));
    }
}
