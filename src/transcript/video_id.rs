//! Video identifier parsing.

use crate::error::{BlogError, Result};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static REFERENCE_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"(?x)
        (?:[?&]v=|youtu\.be/)
        ([A-Za-z0-9_-]{11})
        # the id must not run on into further id characters
        (?:[^A-Za-z0-9_-]|$)
    ",
    )
    .expect("Invalid regex")
});

static ID_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("Invalid regex"));

/// A canonical 11-character YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    /// Extract the identifier from a video reference.
    ///
    /// Accepts `...watch?v=<id>` (the `v` parameter may appear anywhere in the query)
    /// and `...youtu.be/<id>`. No network access happens here.
    pub fn parse(reference: &str) -> Result<Self> {
        REFERENCE_REGEX
            .captures(reference.trim())
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_string()))
            .ok_or_else(|| BlogError::InvalidReference(reference.to_string()))
    }

    /// Validate a bare identifier.
    pub fn from_bare(id: &str) -> Result<Self> {
        let id = id.trim();
        if ID_REGEX.is_match(id) {
            Ok(Self(id.to_string()))
        } else {
            Err(BlogError::InvalidReference(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VideoId {
    type Error = BlogError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_bare(&value)
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_accepted_shapes() {
        let cases = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "  youtu.be/dQw4w9WgXcQ  ",
            "m.youtube.com/watch?v=dQw4w9WgXcQ",
        ];

        for input in cases {
            let id = VideoId::parse(input).unwrap();
            assert_eq!(id.as_str(), "dQw4w9WgXcQ", "input: {}", input);
        }
    }

    #[test]
    fn test_parse_keeps_dash_and_underscore() {
        let id = VideoId::parse("https://youtu.be/a-B_c1D2e3F").unwrap();
        assert_eq!(id.as_str(), "a-B_c1D2e3F");
    }

    #[test]
    fn test_parse_rejects_other_inputs() {
        let cases = [
            "https://example.com/video",
            "",
            "dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=short",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQextra",
            "https://youtu.be/",
            "https://www.youtube.com/channel/UC1234567890",
        ];

        for input in cases {
            let err = VideoId::parse(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidReference, "input: {}", input);
        }
    }

    #[test]
    fn test_invalid_reference_carries_input() {
        match VideoId::parse("https://example.com/video") {
            Err(BlogError::InvalidReference(input)) => {
                assert_eq!(input, "https://example.com/video")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_from_bare() {
        assert_eq!(VideoId::from_bare("dQw4w9WgXcQ").unwrap().as_str(), "dQw4w9WgXcQ");
        assert!(VideoId::from_bare("dQw4w9WgXc").is_err());
        assert!(VideoId::from_bare("dQw4w9WgXc!").is_err());
        assert!(VideoId::from_bare("https://youtu.be/dQw4w9WgXcQ").is_err());
    }

    #[test]
    fn test_watch_url() {
        let id = VideoId::from_bare("dQw4w9WgXcQ").unwrap();
        assert_eq!(id.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(VideoId::parse(&id.watch_url()).unwrap(), id);
    }
}
