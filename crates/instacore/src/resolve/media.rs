//! Media candidates and kind inference from the URL's file extension.

use serde::Serialize;
use std::fmt;
use url::Url;

/// Path suffixes that mark a URL as a video file.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "m4v"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
    /// Never produced by inference; for candidates built by callers that
    /// cannot tell.
    Unknown,
}

impl MediaKind {
    /// Video if the URL path ends in a known video extension, else Image.
    /// Query string and fragment are ignored.
    pub fn from_url(url: &str) -> Self {
        let path = match Url::parse(url) {
            Ok(parsed) => parsed.path().to_string(),
            Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
        };

        let is_video = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()));

        if is_video {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Image => "image",
            MediaKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A direct media URL found in a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaCandidate {
    pub url: String,
    pub kind: MediaKind,
}

impl MediaCandidate {
    pub fn new(url: impl Into<String>, kind: MediaKind) -> Self {
        Self { url: url.into(), kind }
    }

    /// Unescapes an extracted value and infers its kind. `None` for blanks.
    pub fn from_extracted(raw: &str) -> Option<Self> {
        let url = unescape_url(raw.trim());
        if url.is_empty() {
            return None;
        }
        let kind = MediaKind::from_url(&url);
        Some(Self { url, kind })
    }
}

/// Undoes the JSON-in-HTML escaping found in embedded payloads:
/// `\u0026` becomes `&` and `\/` becomes `/`.
pub fn unescape_url(raw: &str) -> String {
    raw.replace("\\u0026", "&").replace("\\/", "/")
}
