use thiserror::Error;

use super::reference::ReferenceError;
use crate::download::error::DownloadError;

/// Failures that abort an archive run.
///
/// Nothing here is retried: files written before the failure stay on disk and
/// the next run resumes from them.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// `cause` already carries its context chain, which the message renders.
    #[error("fetch media feed page {page}: {cause:#}")]
    FeedFetch { page: usize, cause: anyhow::Error },

    #[error("parse media reference {reference:?}: {source}")]
    ReferenceParse {
        reference: String,
        #[source]
        source: ReferenceError,
    },

    #[error("archive {reference}: {source}")]
    Materialize {
        reference: String,
        #[source]
        source: DownloadError,
    },

    #[error("archive run cancelled")]
    Cancelled,
}

impl ArchiveError {
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            ArchiveError::Cancelled
                | ArchiveError::Materialize {
                    source: DownloadError::Cancelled,
                    ..
                }
        )
    }
}
