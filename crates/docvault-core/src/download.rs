//! Saving search results to local disk.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError};
use crate::utils::download_file_name;

impl ApiClient {
    /// Download a document's file into `dest_dir`.
    ///
    /// File URLs are served directly, so no token header is sent. A partial
    /// file is removed if the transfer fails.
    pub async fn download_document(
        &self,
        file_url: &str,
        file_name: Option<&str>,
        dest_dir: &Path,
    ) -> Result<PathBuf, ApiError> {
        let target = dest_dir.join(download_file_name(file_url, file_name));

        let response = self.client.get(file_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(|e| ApiError::from_io(e, dest_dir))?;
        let mut file = tokio::fs::File::create(&target)
            .await
            .map_err(|e| ApiError::from_io(e, &target))?;

        match Self::write_body(response, &mut file).await {
            Ok(written) => {
                debug!(path = %target.display(), bytes = written, "Download saved");
                Ok(target)
            }
            Err(e) => {
                drop(file);
                remove_partial(&target).await;
                Err(e)
            }
        }
    }

    /// Stream the body into `file` and flush it. Returns the bytes written.
    async fn write_body(
        response: reqwest::Response,
        file: &mut tokio::fs::File,
    ) -> Result<usize, ApiError> {
        let mut written = 0usize;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let bytes = chunk?;
            written += bytes.len();
            file.write_all(&bytes).await?;
        }
        file.flush().await?;
        Ok(written)
    }
}

async fn remove_partial(target: &Path) {
    if let Err(e) = tokio::fs::remove_file(target).await {
        warn!(error = %e, path = %target.display(), "Failed to remove partial download");
    }
}
