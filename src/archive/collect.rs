use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::error::ArchiveError;
use super::gate::ResumeGate;
use super::reference::MediaReference;
use super::source::{Cursor, MediaSource};

/// References discovered during one run, newest first.
#[derive(Debug, Default)]
pub struct PendingBatch {
    newest_first: Vec<MediaReference>,
}

impl PendingBatch {
    pub fn push(&mut self, reference: MediaReference) {
        self.newest_first.push(reference);
    }

    pub fn len(&self) -> usize {
        self.newest_first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.newest_first.is_empty()
    }

    /// Oldest first, i.e. the reverse of collection order.
    pub fn chronological(&self) -> impl Iterator<Item = &MediaReference> {
        self.newest_first.iter().rev()
    }
}

/// Walk the feed page by page until the resume boundary or the last page.
///
/// Within a page, items are checked newest first. The first reference whose
/// file already exists ends the walk immediately: the rest of that page and
/// all later pages are older and were archived by an earlier run.
pub async fn collect<S>(
    source: &S,
    gate: &ResumeGate,
    cancel: &CancellationToken,
) -> Result<PendingBatch, ArchiveError>
where
    S: MediaSource + ?Sized,
{
    let mut batch = PendingBatch::default();
    let mut cursor: Option<Cursor> = None;
    let mut page_number = 0usize;

    loop {
        page_number += 1;
        let page = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ArchiveError::Cancelled),
            page = source.fetch_page(cursor.as_ref()) => page,
        }
        .map_err(|cause| ArchiveError::FeedFetch {
            page: page_number,
            cause,
        })?;

        debug!(
            page = page_number,
            items = page.items.len(),
            has_more = page.has_more(),
            "fetched feed page"
        );

        for raw in page.items {
            let reference = match MediaReference::parse(&raw) {
                Ok(r) => r,
                Err(source) => {
                    return Err(ArchiveError::ReferenceParse {
                        reference: raw,
                        source,
                    })
                }
            };
            if gate.should_stop(&reference) {
                debug!(
                    file = reference.file_name(),
                    collected = batch.len(),
                    "reached previously archived media"
                );
                return Ok(batch);
            }
            batch.push(reference);
        }

        match page.next {
            Some(next) => cursor = Some(next),
            None => {
                debug!(collected = batch.len(), "feed exhausted");
                return Ok(batch);
            }
        }
    }
}
