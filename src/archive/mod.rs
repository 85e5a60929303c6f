//! Incremental archive engine.
//!
//! A run walks a newest-first media feed until it meets a file that already
//! exists in the destination directory (or the feed runs out), then replays
//! what it found oldest first with a fixed pause between downloads. The files
//! on disk are the only resume state: because replay is chronological, every
//! file present is older than anything not yet fetched, so the first existing
//! file marks the boundary between archived and new.

mod collect;
pub mod error;
mod gate;
mod reference;
mod replay;
mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use collect::collect;
pub use error::ArchiveError;
pub use gate::{DestinationLayout, ResumeGate};
pub use reference::MediaReference;
pub use replay::{replay, Materializer, PACING_DELAY};
pub use source::{Cursor, MediaSource, Page};

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::console::Console;

/// Per-run knobs that don't belong to any single component.
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    pub pacing: Duration,
    pub dry_run: bool,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            pacing: PACING_DELAY,
            dry_run: false,
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub collected: usize,
    pub materialized: usize,
}

/// Collect new media from `source` and archive it through `materializer`.
pub async fn archive_media<S, M>(
    source: &S,
    gate: &ResumeGate,
    materializer: &M,
    console: &dyn Console,
    options: &ArchiveOptions,
    cancel: &CancellationToken,
) -> Result<ArchiveSummary, ArchiveError>
where
    S: MediaSource + ?Sized,
    M: Materializer + ?Sized,
{
    let started = Instant::now();

    let batch = collect(source, gate, cancel).await?;
    if batch.is_empty() {
        tracing::info!("No new media to archive");
        return Ok(ArchiveSummary {
            collected: 0,
            materialized: 0,
        });
    }
    tracing::info!(count = batch.len(), "Collected new media");

    if options.dry_run {
        for reference in batch.chronological() {
            console.print(&format!("[DRY RUN] Would download {reference}"));
        }
        return Ok(ArchiveSummary {
            collected: batch.len(),
            materialized: 0,
        });
    }

    let materialized = replay(&batch, materializer, options.pacing, cancel).await?;

    tracing::info!("── Summary ──");
    tracing::info!("  {} new since last run", batch.len());
    tracing::info!("  {} written or already present", materialized);
    tracing::info!("  elapsed: {}", format_duration(started.elapsed()));

    Ok(ArchiveSummary {
        collected: batch.len(),
        materialized,
    })
}

/// Sub-minute runs (a handful of paced downloads) keep one decimal.
fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    if total_secs < 60 {
        return format!("{:.1}s", d.as_secs_f64());
    }
    let (hours, mins, secs) = (total_secs / 3600, total_secs / 60 % 60, total_secs % 60);
    if hours > 0 {
        format!("{hours}h {mins:02}m {secs:02}s")
    } else {
        format!("{mins}m {secs:02}s")
    }
}
