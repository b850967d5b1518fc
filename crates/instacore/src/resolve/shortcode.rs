//! Post identifier (shortcode) extraction.
//!
//! Supports:
//! - `/p/<code>/`, `/reel/<code>/`, `/reels/<code>/`, `/tv/<code>/`
//! - the same with a `/<username>/` prefix
//! - anything else: the last non-empty path segment
//!
//! A URL without a scheme (`instagram.com/p/abc`) is read as https.

use url::Url;

/// Path segments that precede a post identifier.
const POST_MARKERS: &[&str] = &["p", "reel", "tv", "reels"];

/// A submitted URL and the post identifier found in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReference {
    pub raw_url: String,
    post_id: Option<String>,
}

impl PostReference {
    /// Parses `raw_url`. Never fails: an unusable URL yields an absent id.
    pub fn parse(raw_url: &str) -> Self {
        let raw_url = raw_url.trim();
        Self {
            raw_url: raw_url.to_string(),
            post_id: parse_url(raw_url).and_then(|url| extract_shortcode(&url)),
        }
    }

    /// The shortcode; `None` when the URL has no usable path segment.
    pub fn post_id(&self) -> Option<&str> {
        self.post_id.as_deref()
    }

    /// The submitted URL as fetched: parsed, with `https://` added when the
    /// scheme is missing.
    pub fn url(&self) -> Option<Url> {
        parse_url(&self.raw_url)
    }
}

fn parse_url(raw: &str) -> Option<Url> {
    Url::parse(raw)
        .or_else(|_| Url::parse(&format!("https://{}", raw)))
        .ok()
        .filter(|url| url.has_host())
}

/// Extract the shortcode from a parsed URL.
pub fn extract_shortcode(url: &Url) -> Option<String> {
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();

    let after_marker = segments
        .windows(2)
        .find(|pair| POST_MARKERS.contains(&pair[0]))
        .map(|pair| pair[1]);

    after_marker
        .or_else(|| segments.last().copied())
        .map(trim_noise)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Cuts a segment at the first `?` or `/`.
fn trim_noise(segment: &str) -> &str {
    segment.split(['?', '/']).next().unwrap_or("")
}
