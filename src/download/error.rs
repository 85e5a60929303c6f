use std::path::PathBuf;

use thiserror::Error;

/// Typed failures from fetching one media file to disk.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP error {status} downloading {url}")]
    HttpStatus { status: u16, url: String },

    #[error("HTTP error downloading {url} (bytes_so_far={bytes_written}): {source}")]
    Http {
        source: reqwest::Error,
        url: String,
        bytes_written: u64,
    },

    #[error("Disk error writing {}: {source}", path.display())]
    Disk {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("download cancelled")]
    Cancelled,
}

impl DownloadError {
    pub(crate) fn disk(path: &std::path::Path) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| DownloadError::Disk { source, path }
    }

    /// Whether the failure happened while talking to the media host, as
    /// opposed to writing locally.
    pub fn is_retrieval(&self) -> bool {
        matches!(
            self,
            DownloadError::HttpStatus { .. } | DownloadError::Http { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_is_retrieval() {
        let e = DownloadError::HttpStatus {
            status: 404,
            url: "https://example.com/a.jpg".into(),
        };
        assert!(e.is_retrieval());
        assert_eq!(
            e.to_string(),
            "HTTP error 404 downloading https://example.com/a.jpg"
        );
    }

    #[test]
    fn test_disk_is_not_retrieval() {
        let e = DownloadError::disk(std::path::Path::new("/x/a.jpg"))(std::io::Error::other(
            "disk full",
        ));
        assert!(!e.is_retrieval());
        assert_eq!(e.to_string(), "Disk error writing /x/a.jpg: disk full");
    }

    #[test]
    fn test_connection_error_is_retrieval() {
        // Create a reqwest::Error by requesting an unreachable address
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let err = rt
            .block_on(crate::download::testing::test_client().get("http://127.0.0.1:1").send())
            .unwrap_err();
        let e = DownloadError::Http {
            source: err,
            url: "x".into(),
            bytes_written: 0,
        };
        assert!(e.is_retrieval());
    }
}
