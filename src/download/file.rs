use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::error::DownloadError;

/// Sibling `.part` path used while the body is still streaming.
fn part_path(download_path: &Path) -> PathBuf {
    let mut name = download_path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    download_path.with_file_name(name)
}

/// Stream `url` into `download_path` through a `.part` temp file.
///
/// The final name only appears once the whole body has been written, so an
/// interrupted transfer never looks archived. On failure or cancellation the
/// `.part` file is removed. Returns the number of bytes written.
pub async fn download_file(
    client: &Client,
    url: &Url,
    download_path: &Path,
    cancel: &CancellationToken,
) -> Result<u64, DownloadError> {
    let part_path = part_path(download_path);

    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(DownloadError::Cancelled),
        r = attempt_download(client, url, download_path, &part_path) => r,
    };

    if result.is_err() {
        let _ = fs::remove_file(&part_path).await;
    }
    result
}

async fn attempt_download(
    client: &Client,
    url: &Url,
    download_path: &Path,
    part_path: &Path,
) -> Result<u64, DownloadError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| DownloadError::Http {
            source: e,
            url: url.to_string(),
            bytes_written: 0,
        })?;

    if !response.status().is_success() {
        return Err(DownloadError::HttpStatus {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }

    if let Some(parent) = download_path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(DownloadError::disk(parent))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(part_path)
        .await
        .map_err(DownloadError::disk(part_path))?;

    let content_length = response.content_length();
    let mut bytes_written: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            tracing::warn!(
                "Body error for {} (content_length={:?}, bytes_so_far={}): {}",
                url,
                content_length,
                bytes_written,
                e
            );
            DownloadError::Http {
                source: e,
                url: url.to_string(),
                bytes_written,
            }
        })?;
        file.write_all(&chunk)
            .await
            .map_err(DownloadError::disk(part_path))?;
        bytes_written += chunk.len() as u64;
    }
    file.flush().await.map_err(DownloadError::disk(part_path))?;
    drop(file);

    fs::rename(part_path, download_path)
        .await
        .map_err(DownloadError::disk(download_path))?;

    Ok(bytes_written)
}
