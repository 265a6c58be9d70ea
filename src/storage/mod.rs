//! OneDrive file store behind Microsoft Graph.

pub mod onedrive;
pub mod token;

use thiserror::Error;

pub use onedrive::OneDriveClient;
pub use token::{AccessToken, GraphCredentials, TokenCache, TokenSource};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Token request failed: {0}")]
    Token(String),

    #[error("Graph request failed with {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Normalise a drive path into its segments.
///
/// Accepts `%2F` as a separator and backslashes, drops empty and `.` segments,
/// and collapses the doubled `Oefenschema/Oefenschema` and `Templates/Templates`
/// folder prefixes that older links carry. `..` is rejected.
pub fn normalize_path(raw: &str) -> Result<Vec<String>, StorageError> {
    let decoded = raw.trim().replace("%2F", "/").replace("%2f", "/").replace('\\', "/");

    let mut segments: Vec<String> = Vec::new();
    for segment in decoded.split('/') {
        match segment.trim() {
            "" | "." => continue,
            ".." => return Err(StorageError::InvalidPath(raw.to_string())),
            s => segments.push(s.to_string()),
        }
    }

    for folder in ["Oefenschema", "Templates"] {
        while segments.len() >= 2 && segments[0] == folder && segments[1] == folder {
            segments.remove(0);
        }
    }

    if segments.is_empty() {
        return Err(StorageError::InvalidPath(raw.to_string()));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slashes_and_encoded_separators_are_normalised() {
        assert_eq!(
            normalize_path("/Oefenschema%2FPatient 12\\plan.pdf/").unwrap(),
            vec!["Oefenschema", "Patient 12", "plan.pdf"]
        );
        assert_eq!(normalize_path("a/./b//c").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn doubled_root_folders_collapse() {
        assert_eq!(
            normalize_path("Oefenschema/Oefenschema/x.pdf").unwrap(),
            vec!["Oefenschema", "x.pdf"]
        );
        assert_eq!(
            normalize_path("Templates/Templates/Templates/k.png").unwrap(),
            vec!["Templates", "k.png"]
        );
    }

    #[test]
    fn traversal_and_empty_paths_are_rejected() {
        assert!(matches!(normalize_path("a/../etc"), Err(StorageError::InvalidPath(_))));
        assert!(matches!(normalize_path(" / "), Err(StorageError::InvalidPath(_))));
    }
}
