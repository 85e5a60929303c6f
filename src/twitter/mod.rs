//! Twitter API v2 client: user lookup and the media timeline feed.

pub mod error;
pub mod media;
pub mod oauth;
pub mod responses;
mod timeline;

pub use timeline::UserMediaTimeline;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use url::Url;

use error::TwitterError;
use oauth::OAuthCredentials;
use responses::{TimelineResponse, UserLookupResponse};

const API_BASE: &str = "https://api.twitter.com";

/// Largest page size the user timeline endpoint accepts.
const TIMELINE_PAGE_SIZE: u32 = 100;

/// OAuth 1.0a user-context client.
#[derive(Debug, Clone)]
pub struct TwitterClient {
    http: Client,
    credentials: OAuthCredentials,
    api_base: Url,
}

impl TwitterClient {
    pub fn new(http: Client, credentials: OAuthCredentials) -> Result<Self, TwitterError> {
        Ok(Self {
            http,
            credentials,
            api_base: Url::parse(API_BASE)?,
        })
    }

    #[cfg(test)]
    fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = api_base;
        self
    }

    /// Resolve a screen name (without `@`) to its numeric user id.
    pub async fn find_user_id(&self, screen_name: &str) -> Result<String, TwitterError> {
        let mut url = self.api_base.join("/2/users/by")?;
        url.query_pairs_mut().append_pair("usernames", screen_name);

        let response: UserLookupResponse = self.get_json(url).await?;
        let user = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| TwitterError::UserNotFound(screen_name.to_string()))?;
        tracing::debug!(id = %user.id, username = %user.username, "resolved user");
        Ok(user.id)
    }

    /// One page of a user's tweets with media attachments expanded.
    pub async fn user_tweets(
        &self,
        user_id: &str,
        pagination_token: Option<&str>,
    ) -> Result<TimelineResponse, TwitterError> {
        let mut url = self.api_base.join(&format!("/2/users/{user_id}/tweets"))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("expansions", "attachments.media_keys")
                .append_pair("tweet.fields", "created_at")
                .append_pair("media.fields", "url,media_key,variants")
                .append_pair("max_results", &TIMELINE_PAGE_SIZE.to_string());
            if let Some(token) = pagination_token {
                query.append_pair("pagination_token", token);
            }
        }
        self.get_json(url).await
    }

    pub fn media_timeline(&self, user_id: String) -> UserMediaTimeline {
        UserMediaTimeline::new(self.clone(), user_id)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, TwitterError> {
        let header = self
            .credentials
            .authorization_header(&Method::GET, &url, &[]);
        tracing::debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, header)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TwitterError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}
