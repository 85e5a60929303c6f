use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::collect::PendingBatch;
use super::error::ArchiveError;
use super::reference::MediaReference;
use crate::download::error::DownloadError;

/// Fixed wait between consecutive materializations, keeping the run under the
/// media host's rate limit.
pub const PACING_DELAY: Duration = Duration::from_secs(1);

/// Turns a reference into a durable local file.
#[async_trait::async_trait]
pub trait Materializer: Send + Sync {
    async fn materialize(
        &self,
        reference: &MediaReference,
        cancel: &CancellationToken,
    ) -> Result<(), DownloadError>;
}

/// Materialize a newest-first batch in chronological order.
///
/// Waits `pacing` between consecutive items (not before the first). The first
/// failure ends the replay; items already written are left in place, and since
/// they are all older than the failed one the next run resumes correctly.
pub async fn replay<M>(
    batch: &PendingBatch,
    materializer: &M,
    pacing: Duration,
    cancel: &CancellationToken,
) -> Result<usize, ArchiveError>
where
    M: Materializer + ?Sized,
{
    let mut materialized = 0usize;

    for (index, reference) in batch.chronological().enumerate() {
        if index > 0 {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ArchiveError::Cancelled),
                _ = tokio::time::sleep(pacing) => {}
            }
        }
        if cancel.is_cancelled() {
            return Err(ArchiveError::Cancelled);
        }

        debug!(
            position = index + 1,
            total = batch.len(),
            file = reference.file_name(),
            "materializing"
        );
        materializer
            .materialize(reference, cancel)
            .await
            .map_err(|source| ArchiveError::Materialize {
                reference: reference.to_string(),
                source,
            })?;
        materialized += 1;
    }

    Ok(materialized)
}
