use std::collections::HashMap;

use super::error::TwitterError;
use super::responses::{Media, TimelineResponse};

/// How a media object maps to a downloadable URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    StaticImage,
    Video,
    Unsupported,
}

impl MediaKind {
    pub fn from_type(media_type: &str) -> Self {
        match media_type {
            // "git" is accepted as an alias for "photo".
            "photo" | "git" => MediaKind::StaticImage,
            "video" => MediaKind::Video,
            _ => MediaKind::Unsupported,
        }
    }
}

/// Pick the URL to archive for one media object.
///
/// Videos use the highest-bitrate variant; the first one wins on ties and a
/// missing bit rate counts as zero. `Ok(None)` means the media has nothing
/// this tool archives.
pub fn select_url(media: &Media) -> Result<Option<&str>, TwitterError> {
    match MediaKind::from_type(&media.media_type) {
        MediaKind::StaticImage => Ok(media.url.as_deref()),
        MediaKind::Video => {
            let mut variants = media.variants.iter();
            let Some(first) = variants.next() else {
                return Err(TwitterError::EmptyVariantSet {
                    media_key: media.media_key.clone(),
                });
            };
            let best = variants.fold(first, |best, v| {
                if v.bit_rate.unwrap_or(0) > best.bit_rate.unwrap_or(0) {
                    v
                } else {
                    best
                }
            });
            Ok(Some(best.url.as_str()))
        }
        MediaKind::Unsupported => {
            tracing::debug!(
                media_key = %media.media_key,
                media_type = %media.media_type,
                "skipping unsupported media type"
            );
            Ok(None)
        }
    }
}

/// Flatten a timeline page into media URLs, newest first.
///
/// Tweets already arrive newest first; within a tweet the attachments are
/// emitted last-to-first so the combined list keeps that ordering.
pub fn media_urls(response: &TimelineResponse) -> Result<Vec<String>, TwitterError> {
    let Some(includes) = &response.includes else {
        return Ok(Vec::new());
    };

    let mut by_key: HashMap<&str, &str> = HashMap::with_capacity(includes.media.len());
    for media in &includes.media {
        if let Some(url) = select_url(media)? {
            by_key.insert(media.media_key.as_str(), url);
        }
    }

    let mut urls = Vec::new();
    for tweet in &response.data {
        let Some(attachments) = &tweet.attachments else {
            continue;
        };
        for key in attachments.media_keys.iter().rev() {
            match by_key.get(key.as_str()) {
                Some(url) => urls.push((*url).to_string()),
                None => tracing::debug!(tweet = %tweet.id, media_key = %key, "no archivable media"),
            }
        }
    }
    Ok(urls)
}
