use thiserror::Error;

#[derive(Debug, Error)]
pub enum TwitterError {
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("User @{0} not found")]
    UserNotFound(String),

    #[error("Video media {media_key} has no variants")]
    EmptyVariantSet { media_key: String },

    #[error("Malformed token response: {0}")]
    MalformedTokenResponse(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),
}
