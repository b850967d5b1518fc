//! Regex scan for media URL fields anywhere in the payload.
//!
//! Catches pages where the media descriptor is present but not inside one of
//! the wrappers `EmbeddedDataStrategy` understands. All video patterns run
//! before any image pattern.

use lazy_regex::{regex, Regex};

use super::ExtractionStrategy;
use crate::resolve::error::ResolveError;
use crate::resolve::media::MediaCandidate;

pub struct PatternStrategy;

fn video_patterns() -> [(&'static str, &'static Regex); 5] {
    [
        ("video_url", regex!(r#""video_url"\s*:\s*"([^"]+)""#)),
        ("video_versions", regex!(r#""video_versions".*?"url"\s*:\s*"([^"]+)""#s)),
        ("mp4_url", regex!(r#""url"\s*:\s*"([^"]*\.mp4[^"]*)""#)),
        ("playback_url", regex!(r#""playback_url"\s*:\s*"([^"]+)""#)),
        ("mp4_src", regex!(r#""src"\s*:\s*"([^"]*\.mp4[^"]*)""#)),
    ]
}

fn image_patterns() -> [(&'static str, &'static Regex); 3] {
    [
        ("display_url", regex!(r#""display_url"\s*:\s*"([^"]+)""#)),
        ("display_resources", regex!(r#""display_resources".*?"src"\s*:\s*"([^"]+)""#s)),
        ("image_src", regex!(r#""src"\s*:\s*"([^"]*\.(?:jpe?g|png|webp)[^"]*)""#)),
    ]
}

fn first_match(payload: &str, patterns: &[(&'static str, &'static Regex)]) -> Option<(&'static str, String)> {
    patterns.iter().find_map(|(name, re)| {
        re.captures_iter(payload)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .find(|value| !value.trim().is_empty())
            .map(|value| (*name, value.to_string()))
    })
}

impl ExtractionStrategy for PatternStrategy {
    fn name(&self) -> &'static str {
        "regex_patterns"
    }

    fn extract(&self, payload: &str) -> Result<Option<MediaCandidate>, ResolveError> {
        if let Some((pattern, raw)) = first_match(payload, &video_patterns()) {
            log::debug!("Video URL found via pattern {}", pattern);
            return Ok(MediaCandidate::from_extracted(&raw));
        }

        if let Some((pattern, raw)) = first_match(payload, &image_patterns()) {
            log::debug!("Image URL found via pattern {}", pattern);
            return Ok(MediaCandidate::from_extracted(&raw));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::media::MediaKind;
    use pretty_assertions::assert_eq;

    fn extract(payload: &str) -> Option<MediaCandidate> {
        PatternStrategy.extract(payload).unwrap()
    }

    #[test]
    fn test_display_url_literal() {
        assert_eq!(
            extract(r#"foo "display_url":"https://x/i.jpg" bar"#),
            Some(MediaCandidate::new("https://x/i.jpg", MediaKind::Image))
        );
    }

    #[test]
    fn test_video_beats_image_regardless_of_position() {
        let payload = r#"{"display_url":"https://x/first.jpg","other":1,"video_url":"https:\/\/x\/v.mp4?a=1&b=2"}"#;
        assert_eq!(
            extract(payload),
            Some(MediaCandidate::new("https://x/v.mp4?a=1&b=2", MediaKind::Video))
        );
    }

    #[test]
    fn test_video_versions() {
        let payload = r#"{"video_versions":[{"type":101,"width":720,"url":"https://x/v720.mp4?_nc=1"}]}"#;
        assert_eq!(
            extract(payload),
            Some(MediaCandidate::new("https://x/v720.mp4?_nc=1", MediaKind::Video))
        );
    }

    #[test]
    fn test_kind_follows_extension_not_field_name() {
        let payload = r#"{"video_url":"https://x/hls_manifest"}"#;
        let candidate = extract(payload).unwrap();
        assert_eq!(candidate.url, "https://x/hls_manifest");
        assert_eq!(candidate.kind, MediaKind::from_url(&candidate.url));
        assert_eq!(candidate.kind, MediaKind::Image);
    }

    #[test]
    fn test_generic_mp4_url() {
        let payload = r#"{"url":"https://x/clip.mp4?efg=abc"}"#;
        assert_eq!(extract(payload).map(|c| c.kind), Some(MediaKind::Video));
    }

    #[test]
    fn test_display_resources() {
        let payload = r#"{"display_resources":[{"src":"https://x/640","config_width":640}]}"#;
        assert_eq!(extract(payload).map(|c| c.url), Some("https://x/640".to_string()));
    }

    #[test]
    fn test_generic_image_src() {
        let payload = r#"<img data-x='{"src":"https://x/photo.jpeg"}'>"#;
        assert_eq!(
            extract(payload),
            Some(MediaCandidate::new("https://x/photo.jpeg", MediaKind::Image))
        );
    }

    #[test]
    fn test_empty_values_are_skipped() {
        let payload = r#"{"video_url":"","display_url":"https://x/i.jpg"}"#;
        assert_eq!(extract(payload).map(|c| c.url), Some("https://x/i.jpg".to_string()));
    }

    #[test]
    fn test_nothing_to_find() {
        assert_eq!(extract("<html>no media here</html>"), None);
    }
}
