use reqwest::blocking::{Client, Response};
use std::fs::File;
use std::io::{BufWriter, Write as _, copy};
use std::path::Path;
use tracing::debug;

use crate::utils::downloader_def::r#trait::ContentSource;
use crate::utils::errors::DownloadError;

/// Fetches content with a plain, unauthenticated GET. Pre-signed URLs carry
/// their signature in the query string, so no credentials are attached.
#[derive(Debug)]
pub struct HttpContentSource {
    client: Client,
}

impl HttpContentSource {
    pub fn new() -> Result<Self, DownloadError> {
        let client = Client::builder()
            .user_agent(concat!("layer-inspect/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn save_to_file(&self, mut resp: Response, dest: &Path) -> Result<u64, DownloadError> {
        let io_err = |source| DownloadError::Io {
            path: dest.to_path_buf(),
            source,
        };

        let mut writer = BufWriter::new(File::create(dest).map_err(io_err)?);
        let written = copy(&mut resp, &mut writer).map_err(io_err)?;
        writer.flush().map_err(io_err)?;
        Ok(written)
    }
}

impl ContentSource for HttpContentSource {
    fn download(&self, location: &str, dest_path: &Path) -> Result<u64, DownloadError> {
        let resp = self.client.get(location).send()?;
        if !resp.status().is_success() {
            return Err(DownloadError::Status {
                status: resp.status().as_u16(),
            });
        }

        let written = self.save_to_file(resp, dest_path)?;
        debug!("Downloaded {} bytes to {:?}", written, dest_path);
        Ok(written)
    }
}
