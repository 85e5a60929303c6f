//! Media downloader: the [`Materializer`] that writes archived files.
//!
//! Checks for an existing file on its own (independent of the resume gate)
//! so that `--overwrite` can force a re-fetch and files placed by other tools
//! are left alone.

pub mod error;
pub mod file;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::archive::{DestinationLayout, Materializer, MediaReference};
use crate::console::Console;
use error::DownloadError;

pub struct Downloader {
    client: Client,
    layout: DestinationLayout,
    overwrite: bool,
    console: Arc<dyn Console>,
}

impl std::fmt::Debug for Downloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Downloader")
            .field("layout", &self.layout)
            .field("overwrite", &self.overwrite)
            .finish_non_exhaustive()
    }
}

impl Downloader {
    pub fn new(
        client: Client,
        layout: DestinationLayout,
        overwrite: bool,
        console: Arc<dyn Console>,
    ) -> Self {
        Self {
            client,
            layout,
            overwrite,
            console,
        }
    }
}

#[async_trait::async_trait]
impl Materializer for Downloader {
    async fn materialize(
        &self,
        reference: &MediaReference,
        cancel: &CancellationToken,
    ) -> Result<(), DownloadError> {
        let download_path = self.layout.path_for(reference);

        if !self.overwrite && download_path.exists() {
            self.console.diagnostic(&format!(
                "file {} already exists. skipping.",
                download_path.display()
            ));
            return Ok(());
        }

        tracing::debug!(path = %download_path.display(), url = %reference, "downloading");
        let bytes = file::download_file(&self.client, reference.url(), &download_path, cancel)
            .await
            .inspect_err(|e| {
                tracing::debug!(
                    retrieval = e.is_retrieval(),
                    path = %download_path.display(),
                    "download failed: {e}"
                );
            })?;
        tracing::debug!(size_bytes = bytes, path = %download_path.display(), "downloaded");

        self.console.print(&format!("{reference} downloaded."));
        Ok(())
    }
}
