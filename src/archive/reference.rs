use std::fmt;

use percent_encoding::percent_decode_str;
use thiserror::Error;
use url::Url;

/// Why a raw feed item could not be turned into a [`MediaReference`].
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("invalid media URL: {0}")]
    Invalid(#[from] url::ParseError),

    #[error("media URL {0} has no file name in its path")]
    NoFileName(String),
}

/// Locator for a single media item plus the local file name derived from it.
///
/// The file name is the last path segment of the URL, percent-decoded and
/// stripped of characters that common filesystems reject. Query string and
/// fragment never contribute to the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReference {
    url: Url,
    file_name: String,
}

impl MediaReference {
    pub fn parse(raw: &str) -> Result<Self, ReferenceError> {
        let url = Url::parse(raw)?;
        let segment = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or("");
        let file_name = clean_filename(&percent_decode_str(segment).decode_utf8_lossy());
        if file_name.is_empty() || file_name == "." || file_name == ".." {
            return Err(ReferenceError::NoFileName(raw.to_string()));
        }
        Ok(Self { url, file_name })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl fmt::Display for MediaReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Remove characters that are invalid on common filesystems:
/// `/`, `\`, `:`, `*`, `?`, `"`, `<`, `>`, `|`.
fn clean_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_is_last_path_segment() {
        let r = MediaReference::parse("https://pbs.twimg.com/media/FxAbC123.jpg").unwrap();
        assert_eq!(r.file_name(), "FxAbC123.jpg");
        assert_eq!(r.to_string(), "https://pbs.twimg.com/media/FxAbC123.jpg");
    }

    #[test]
    fn test_query_does_not_leak_into_file_name() {
        let r = MediaReference::parse(
            "https://video.twimg.com/ext_tw_video/1/pu/vid/1280x720/clip.mp4?tag=12",
        )
        .unwrap();
        assert_eq!(r.file_name(), "clip.mp4");
        assert_eq!(r.url().query(), Some("tag=12"));
    }

    #[test]
    fn test_percent_encoded_segment_is_decoded() {
        let r = MediaReference::parse("https://example.com/a/my%20photo.png").unwrap();
        assert_eq!(r.file_name(), "my photo.png");
    }

    #[test]
    fn test_invalid_characters_are_removed() {
        let r = MediaReference::parse("https://example.com/a/we%3Aird%3F.png").unwrap();
        assert_eq!(r.file_name(), "weird.png");
    }

    #[test]
    fn test_unparsable_url_is_rejected() {
        let err = MediaReference::parse("not a url").unwrap_err();
        assert!(matches!(err, ReferenceError::Invalid(_)));
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let err = MediaReference::parse("https://example.com/").unwrap_err();
        assert!(matches!(err, ReferenceError::NoFileName(_)));

        let err = MediaReference::parse("https://example.com/media/").unwrap_err();
        assert!(matches!(err, ReferenceError::NoFileName(_)));
    }
}
