use std::fmt;

/// Opaque continuation token handed back by a [`MediaSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of a reverse-chronological media feed.
#[derive(Debug, Default)]
pub struct Page {
    /// Media locators, newest first.
    pub items: Vec<String>,
    /// Cursor for the following page; `None` on the last page.
    pub next: Option<Cursor>,
}

impl Page {
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

/// A paginated, newest-first feed of media locators.
///
/// The first call receives `None`; every later call receives the cursor
/// returned with the previous page.
#[async_trait::async_trait]
pub trait MediaSource: Send + Sync {
    async fn fetch_page(&self, cursor: Option<&Cursor>) -> anyhow::Result<Page>;
}
