//! oEmbed metadata response.
//!
//! The oEmbed document carries `thumbnail_url` and, for some video posts, a
//! direct `url`. `url` wins only when it points at a video file.

use serde::Deserialize;

use super::ExtractionStrategy;
use crate::resolve::error::ResolveError;
use crate::resolve::media::{MediaCandidate, MediaKind};

#[derive(Debug, Deserialize)]
struct OEmbedDocument {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    thumbnail_url: Option<String>,
}

pub struct OEmbedStrategy;

impl ExtractionStrategy for OEmbedStrategy {
    fn name(&self) -> &'static str {
        "oembed"
    }

    fn extract(&self, payload: &str) -> Result<Option<MediaCandidate>, ResolveError> {
        let trimmed = payload.trim_start();
        if !trimmed.starts_with('{') {
            return Ok(None);
        }

        let doc: OEmbedDocument = serde_json::from_str(trimmed)?;

        let video = doc
            .url
            .as_deref()
            .and_then(MediaCandidate::from_extracted)
            .filter(|candidate| candidate.kind == MediaKind::Video);
        if video.is_some() {
            return Ok(video);
        }

        Ok(doc.thumbnail_url.as_deref().and_then(MediaCandidate::from_extracted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_video_url_preferred() {
        let payload = r#"{"version":"1.0","url":"https://x/v.mp4","thumbnail_url":"https://x/t.jpg"}"#;
        assert_eq!(
            OEmbedStrategy.extract(payload).unwrap(),
            Some(MediaCandidate::new("https://x/v.mp4", MediaKind::Video))
        );
    }

    #[test]
    fn test_non_video_url_falls_back_to_thumbnail() {
        let payload = r#"{"url":"https://www.instagram.com/p/ABC/","thumbnail_url":"https://x/t.jpg"}"#;
        assert_eq!(
            OEmbedStrategy.extract(payload).unwrap(),
            Some(MediaCandidate::new("https://x/t.jpg", MediaKind::Image))
        );
    }

    #[test]
    fn test_object_without_fields_is_none() {
        assert_eq!(OEmbedStrategy.extract(r#"{"title":"post"}"#).unwrap(), None);
    }

    #[test]
    fn test_html_is_not_oembed() {
        assert_eq!(OEmbedStrategy.extract("<html></html>").unwrap(), None);
    }

    #[test]
    fn test_broken_json_is_parse_failure() {
        assert!(matches!(
            OEmbedStrategy.extract(r#"{"thumbnail_url": "#),
            Err(ResolveError::ParseFailure(_))
        ));
    }

    #[test]
    fn test_mistyped_field_is_parse_failure() {
        assert!(matches!(
            OEmbedStrategy.extract(r#"{"thumbnail_url": 5}"#),
            Err(ResolveError::ParseFailure(_))
        ));
    }
}
