//! Helpers for whatever front end submits URLs: input validation and the
//! user-facing response shape.

use serde::Serialize;

use crate::resolve::error::ResolveError;
use crate::resolve::media::MediaKind;
use crate::resolve::resolver::{ResolutionResult, Resolver};

/// Domain tokens a submitted URL must contain.
pub const SUPPORTED_DOMAINS: &[&str] = &["instagram.com", "instagr.am"];

const MISSING_URL: &str = "URL is required";
const UNSUPPORTED_URL: &str = "Please enter a valid Instagram URL";

/// Whether the input mentions a supported platform domain (case-insensitive).
pub fn is_supported_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    SUPPORTED_DOMAINS.iter().any(|domain| lower.contains(domain))
}

/// Response body for one submitted URL.
///
/// Success: `{"success": true, "media_url": ..., "media_type": "video"|"image"}`.
/// Failure: `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DownloadResponse {
    Success {
        success: bool,
        media_url: String,
        media_type: MediaKind,
    },
    Error {
        error: String,
    },
}

impl DownloadResponse {
    pub fn error(message: impl Into<String>) -> Self {
        DownloadResponse::Error { error: message.into() }
    }

    pub fn from_result(result: &ResolutionResult) -> Self {
        match (&result.media, &result.failure) {
            (Some(media), _) => DownloadResponse::Success {
                success: true,
                media_url: media.url.clone(),
                media_type: media.kind,
            },
            (None, Some(reason)) => Self::error(reason.user_message()),
            (None, None) => Self::error(ResolveError::NoCandidateFound.user_message()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DownloadResponse::Success { .. })
    }

    /// HTTP status a web front end would answer with.
    pub fn status_code(&self) -> u16 {
        if self.is_success() {
            200
        } else {
            400
        }
    }
}

/// Checks a submitted URL before any fetch: it must be non-empty and name a
/// supported domain. Returns the trimmed URL.
pub fn validate_url(url: &str) -> Result<&str, DownloadResponse> {
    let url = url.trim();
    if url.is_empty() {
        return Err(DownloadResponse::error(MISSING_URL));
    }
    if !is_supported_url(url) {
        log::info!("Rejected unsupported URL: {}", url);
        return Err(DownloadResponse::error(UNSUPPORTED_URL));
    }
    Ok(url)
}

/// Validates the input, resolves it and maps the outcome. No fetch is made
/// for empty or unsupported input.
pub async fn handle_download(resolver: &Resolver, url: &str) -> DownloadResponse {
    match validate_url(url) {
        Ok(url) => DownloadResponse::from_result(&resolver.resolve(url).await),
        Err(response) => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ResolverConfig;
    use crate::resolve::media::MediaCandidate;
    use crate::resolve::shortcode::PostReference;
    use pretty_assertions::assert_eq;

    fn result(media: Option<MediaCandidate>, failure: Option<ResolveError>) -> ResolutionResult {
        ResolutionResult {
            post: PostReference::parse("https://www.instagram.com/p/ABC/"),
            media,
            attempts_tried: Vec::new(),
            matched: None,
            failure,
        }
    }

    #[test]
    fn test_supported_domains() {
        assert!(is_supported_url("https://www.instagram.com/p/ABC/"));
        assert!(is_supported_url("HTTPS://WWW.INSTAGRAM.COM/reel/ABC/"));
        assert!(is_supported_url("https://instagr.am/p/ABC/"));
        assert!(!is_supported_url("https://www.youtube.com/watch?v=abc"));
    }

    #[test]
    fn test_success_json_shape() {
        let response = DownloadResponse::from_result(&result(
            Some(MediaCandidate::new("https://x/v.mp4", MediaKind::Video)),
            None,
        ));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"success": true, "media_url": "https://x/v.mp4", "media_type": "video"})
        );
        assert_eq!(response.status_code(), 200);
    }

    #[test]
    fn test_not_found_mentions_anti_scraping() {
        let response = DownloadResponse::from_result(&result(None, Some(ResolveError::NoCandidateFound)));
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["error"].as_str().unwrap().contains("anti-scraping"));
        assert_eq!(response.status_code(), 400);
    }

    #[test]
    fn test_validate_url_trims() {
        assert_eq!(validate_url("  https://instagr.am/p/X/ \n"), Ok("https://instagr.am/p/X/"));
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_resolving() {
        let resolver = Resolver::new(ResolverConfig::default());

        assert_eq!(handle_download(&resolver, "   ").await, DownloadResponse::error(MISSING_URL));
        assert_eq!(
            handle_download(&resolver, "https://example.com/p/ABC/").await,
            DownloadResponse::error(UNSUPPORTED_URL)
        );
    }

    #[tokio::test]
    async fn test_url_without_identifier() {
        let resolver = Resolver::new(ResolverConfig::default());
        let response = handle_download(&resolver, "https://www.instagram.com/").await;
        assert_eq!(
            response,
            DownloadResponse::error(ResolveError::IdentifierNotFound.user_message())
        );
    }
}
