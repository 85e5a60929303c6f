//! Scripted feed and recording materializer shared by the archive tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::reference::MediaReference;
use super::replay::Materializer;
use super::source::{Cursor, MediaSource, Page};
use crate::download::error::DownloadError;

pub(crate) fn media_url(name: &str) -> String {
    format!("https://example.com/media/{name}")
}

pub(crate) fn touch(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), b"archived").unwrap();
}

/// In-memory feed: page `i` is served for cursor `page-i` (or `None` for 0).
pub(crate) struct ScriptedFeed {
    pages: Vec<Vec<String>>,
    fail_at: Option<usize>,
    cursors: Mutex<Vec<Option<String>>>,
}

impl ScriptedFeed {
    pub(crate) fn new(pages: Vec<Vec<&str>>) -> Self {
        Self::from_raw(
            pages
                .into_iter()
                .map(|page| page.into_iter().map(media_url).collect())
                .collect(),
        )
    }

    pub(crate) fn from_raw(pages: Vec<Vec<String>>) -> Self {
        Self {
            pages,
            fail_at: None,
            cursors: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing_at(mut self, call: usize) -> Self {
        self.fail_at = Some(call);
        self
    }

    pub(crate) fn cursors_seen(&self) -> Vec<Option<String>> {
        self.cursors.lock().unwrap().clone()
    }

    pub(crate) fn pages_served(&self) -> usize {
        self.cursors.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl MediaSource for ScriptedFeed {
    async fn fetch_page(&self, cursor: Option<&Cursor>) -> anyhow::Result<Page> {
        let call = {
            let mut cursors = self.cursors.lock().unwrap();
            cursors.push(cursor.map(|c| c.as_str().to_string()));
            cursors.len() - 1
        };
        if self.fail_at == Some(call) {
            anyhow::bail!("HTTP 503 on call {call}");
        }
        let index = match cursor {
            None => 0,
            Some(c) => c
                .as_str()
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| anyhow::anyhow!("unknown cursor {c}"))?,
        };
        let items = self.pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < self.pages.len()).then(|| Cursor::new(format!("page-{}", index + 1)));
        Ok(Page { items, next })
    }
}

/// Records every materialization; optionally writes the file into `dir` and
/// fails on a chosen file name.
pub(crate) struct RecordingMaterializer {
    dir: Option<PathBuf>,
    fail_on: Option<String>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl RecordingMaterializer {
    pub(crate) fn new() -> Self {
        Self {
            dir: None,
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn writing_to(dir: &Path) -> Self {
        Self {
            dir: Some(dir.to_path_buf()),
            ..Self::new()
        }
    }

    pub(crate) fn failing_on(mut self, name: &str) -> Self {
        self.fail_on = Some(name.to_string());
        self
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub(crate) fn start_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait::async_trait]
impl Materializer for RecordingMaterializer {
    async fn materialize(
        &self,
        reference: &MediaReference,
        _cancel: &CancellationToken,
    ) -> Result<(), DownloadError> {
        let name = reference.file_name().to_string();
        self.calls
            .lock()
            .unwrap()
            .push((name.clone(), Instant::now()));
        if self.fail_on.as_deref() == Some(name.as_str()) {
            return Err(DownloadError::HttpStatus {
                status: 404,
                url: reference.to_string(),
            });
        }
        if let Some(dir) = &self.dir {
            touch(dir, &name);
        }
        Ok(())
    }
}
