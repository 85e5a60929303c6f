//! Serde models for the subset of Twitter API v2 responses this tool reads.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UserLookupResponse {
    #[serde(default)]
    pub data: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
}

/// `GET /2/users/:id/tweets` with media expansions.
#[derive(Debug, Default, Deserialize)]
pub struct TimelineResponse {
    #[serde(default)]
    pub data: Vec<Tweet>,
    #[serde(default)]
    pub includes: Option<Includes>,
    #[serde(default)]
    pub meta: TimelineMeta,
}

#[derive(Debug, Deserialize)]
pub struct Tweet {
    pub id: String,
    #[serde(default)]
    pub attachments: Option<Attachments>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Attachments {
    #[serde(default)]
    pub media_keys: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub media: Vec<Media>,
}

#[derive(Debug, Deserialize)]
pub struct Media {
    pub media_key: String,
    #[serde(rename = "type")]
    pub media_type: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub bit_rate: Option<u64>,
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TimelineMeta {
    #[serde(default)]
    pub next_token: Option<String>,
    #[serde(default)]
    pub result_count: u32,
}
