//! Graceful shutdown coordinator.
//!
//! Listens for SIGINT (Ctrl+C), SIGTERM, and SIGHUP, then cancels a
//! [`tokio_util::sync::CancellationToken`] so an in-flight page fetch,
//! pacing delay or download stops promptly. A second signal force-exits.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use crate::archive::ArchiveError;

/// Exit status after an interrupt, matching the shell's 128 + SIGINT.
pub(crate) const INTERRUPTED_EXIT_CODE: i32 = 130;

/// The exit status for a run that ended because of a shutdown signal.
///
/// `None` for every other failure, which `main` reports as a normal error.
pub(crate) fn interrupted_exit_code(err: &anyhow::Error) -> Option<i32> {
    err.downcast_ref::<ArchiveError>()
        .is_some_and(ArchiveError::is_cancelled)
        .then_some(INTERRUPTED_EXIT_CODE)
}

/// Install signal handlers and return a [`CancellationToken`] that is
/// cancelled on the first SIGINT / SIGTERM / SIGHUP.
pub(crate) fn install_signal_handler() -> anyhow::Result<CancellationToken> {
    let token = CancellationToken::new();
    let count = Arc::new(AtomicU32::new(0));

    #[cfg(unix)]
    let (mut sigterm, mut sighup) = {
        use tokio::signal::unix::{signal, SignalKind};
        (
            signal(SignalKind::terminate()).context("register SIGTERM handler")?,
            signal(SignalKind::hangup()).context("register SIGHUP handler")?,
        )
    };

    let handler_token = token.clone();
    tokio::spawn(async move {
        loop {
            #[cfg(unix)]
            {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                    _ = sighup.recv() => {}
                }
            }

            #[cfg(not(unix))]
            {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!("Cannot listen for Ctrl+C: {e}");
                    return;
                }
            }

            let prev = count.fetch_add(1, Ordering::SeqCst);
            if prev == 0 {
                tracing::info!("Received shutdown signal, stopping after the current step...");
                tracing::info!("Press Ctrl+C again to force exit");
                handler_token.cancel();
            } else {
                tracing::warn!("Force exit requested");
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        }
    });

    Ok(token)
}
