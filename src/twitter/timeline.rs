use anyhow::Context;

use super::media::media_urls;
use super::TwitterClient;
use crate::archive::{Cursor, MediaSource, Page};

/// A user's tweets as a newest-first feed of media URLs.
///
/// The continuation cursor is the API's `next_token`; an absent or empty token
/// marks the last page.
#[derive(Debug, Clone)]
pub struct UserMediaTimeline {
    client: TwitterClient,
    user_id: String,
}

impl UserMediaTimeline {
    pub fn new(client: TwitterClient, user_id: String) -> Self {
        Self { client, user_id }
    }
}

#[async_trait::async_trait]
impl MediaSource for UserMediaTimeline {
    async fn fetch_page(&self, cursor: Option<&Cursor>) -> anyhow::Result<Page> {
        let response = self
            .client
            .user_tweets(&self.user_id, cursor.map(Cursor::as_str))
            .await
            .context("fetch timeline")?;
        tracing::debug!(
            user = %self.user_id,
            tweets = response.meta.result_count,
            "timeline page"
        );

        let items = media_urls(&response).context("select media")?;
        let next = response
            .meta
            .next_token
            .filter(|token| !token.is_empty())
            .map(Cursor::new);
        Ok(Page { items, next })
    }
}
