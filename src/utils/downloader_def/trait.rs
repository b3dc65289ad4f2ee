use std::path::Path;

use crate::utils::errors::DownloadError;

/// Somewhere layer content can be fetched from, given the location returned by
/// the Lambda API.
pub trait ContentSource {
    /// Stores the content found at `location` in `dest_path`, truncating any
    /// existing file, and returns the number of bytes written.
    fn download(&self, location: &str, dest_path: &Path) -> Result<u64, DownloadError>;
}
