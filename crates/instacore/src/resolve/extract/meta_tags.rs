//! Open Graph / Twitter Card `<meta>` tags.
//!
//! Last resort: present even on most login-walled pages, but usually only a
//! preview image. Tags are checked in priority order, video tags first. Both
//! attribute orders (`property` before `content` and the reverse) and both
//! `property=` and `name=` are accepted, case-insensitively.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use super::ExtractionStrategy;
use crate::resolve::error::ResolveError;
use crate::resolve::media::MediaCandidate;

/// Tag names in priority order.
pub const META_TAGS: &[&str] = &[
    "og:video",
    "og:video:url",
    "og:video:secure_url",
    "og:image",
    "og:image:url",
    "twitter:image",
];

/// Attribute value, closed by the same quote that opened it.
const CONTENT_VALUE: &str = r#"content\s*=\s*(?:"([^"]+)"|'([^']+)')"#;

fn tag_patterns(tag: &str) -> [String; 2] {
    let tag = regex::escape(tag);
    [
        format!(r#"<meta\s[^>]*(?:property|name)\s*=\s*["']{tag}["'][^>]*\s{CONTENT_VALUE}"#),
        format!(r#"<meta\s[^>]*{CONTENT_VALUE}[^>]*\s(?:property|name)\s*=\s*["']{tag}["']"#),
    ]
}

static TAG_REGEXES: Lazy<Vec<(&'static str, Vec<Regex>)>> = Lazy::new(|| {
    META_TAGS
        .iter()
        .map(|tag| {
            let regexes = tag_patterns(tag)
                .iter()
                .filter_map(|pattern| match RegexBuilder::new(pattern).case_insensitive(true).build() {
                    Ok(re) => Some(re),
                    Err(e) => {
                        log::error!("Invalid meta tag pattern for {}: {}", tag, e);
                        None
                    }
                })
                .collect();
            (*tag, regexes)
        })
        .collect()
});

/// Decodes the HTML entities that show up in attribute values.
fn decode_entities(value: &str) -> String {
    value
        .replace("&amp;", "&")
        .replace("&#38;", "&")
        .replace("&#x2F;", "/")
        .replace("&#47;", "/")
}

pub struct MetaTagStrategy;

impl ExtractionStrategy for MetaTagStrategy {
    fn name(&self) -> &'static str {
        "meta_tags"
    }

    fn extract(&self, payload: &str) -> Result<Option<MediaCandidate>, ResolveError> {
        for (tag, regexes) in TAG_REGEXES.iter() {
            let value = regexes
                .iter()
                .find_map(|re| re.captures(payload))
                .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
                .map(|m| decode_entities(m.as_str()));

            if let Some(candidate) = value.as_deref().and_then(MediaCandidate::from_extracted) {
                log::debug!("Media URL found in meta tag {}", tag);
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}
