use std::fmt;

/// Why a single fetch attempt did not produce a usable payload.
///
/// Always recovered locally: the Fetcher moves on to the next profile or
/// source. Only recorded in `FetchAttempt` for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request did not complete within its timeout
    Timeout,
    /// Connection, TLS or body-read failure
    Network(String),
    /// HTTP 429
    RateLimited,
    /// Any other non-200 status
    HttpStatus(u16),
    /// HTTP 200, but the body carries none of the known content markers
    /// (typically a login wall or consent page)
    MissingMarker,
    /// The caller-level deadline expired before the request was sent
    DeadlineExceeded,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Timeout => write!(f, "request timed out"),
            FetchError::Network(msg) => write!(f, "network error: {}", msg),
            FetchError::RateLimited => write!(f, "rate limited (HTTP 429)"),
            FetchError::HttpStatus(code) => write!(f, "HTTP {}", code),
            FetchError::MissingMarker => write!(f, "response has no recognizable content"),
            FetchError::DeadlineExceeded => write!(f, "resolve deadline exceeded"),
        }
    }
}

impl std::error::Error for FetchError {}

impl FetchError {
    /// Returns subcategory for diagnostics
    pub fn subcategory(&self) -> &'static str {
        match self {
            FetchError::Timeout => "timeout",
            FetchError::Network(_) => "network",
            FetchError::RateLimited => "rate_limited",
            FetchError::HttpStatus(_) => "http_status",
            FetchError::MissingMarker => "missing_marker",
            FetchError::DeadlineExceeded => "deadline",
        }
    }
}

/// Error taxonomy of the resolution pipeline.
///
/// Only `IdentifierNotFound` and `NoCandidateFound` ever reach the caller, and
/// only as the failure reason of a not-found `ResolutionResult`. The other
/// variants are recovered at the attempt or strategy boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// URL has no resolvable post segment
    IdentifierNotFound,
    /// Network, timeout or non-200 for one profile/source
    FetchFailure(FetchError),
    /// HTTP 429 for one profile/source
    RateLimited,
    /// Malformed embedded data or unexpected JSON shape
    ParseFailure(String),
    /// Every source and strategy exhausted
    NoCandidateFound,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::IdentifierNotFound => write!(f, "no post identifier in URL"),
            ResolveError::FetchFailure(err) => write!(f, "fetch failed: {}", err),
            ResolveError::RateLimited => write!(f, "rate limited"),
            ResolveError::ParseFailure(msg) => write!(f, "parse failed: {}", msg),
            ResolveError::NoCandidateFound => write!(f, "no media found in any source"),
        }
    }
}

impl std::error::Error for ResolveError {}

impl From<FetchError> for ResolveError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::RateLimited => ResolveError::RateLimited,
            other => ResolveError::FetchFailure(other),
        }
    }
}

impl From<serde_json::Error> for ResolveError {
    fn from(err: serde_json::Error) -> Self {
        ResolveError::ParseFailure(err.to_string())
    }
}

impl ResolveError {
    /// Returns subcategory for diagnostics
    pub fn subcategory(&self) -> &'static str {
        match self {
            ResolveError::IdentifierNotFound => "identifier_not_found",
            ResolveError::FetchFailure(_) => "fetch_failure",
            ResolveError::RateLimited => "rate_limited",
            ResolveError::ParseFailure(_) => "parse_failure",
            ResolveError::NoCandidateFound => "no_candidate",
        }
    }

    /// Message suitable for showing to the person who submitted the URL.
    pub fn user_message(&self) -> &'static str {
        match self {
            ResolveError::IdentifierNotFound => "Could not find a post identifier in this URL.",
            _ => {
                "Could not extract media from this URL. Instagram has implemented anti-scraping \
                 measures that may prevent downloads. Try using a desktop browser extension or a \
                 dedicated Instagram downloader tool."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(FetchError::HttpStatus(503).to_string(), "HTTP 503");
        assert_eq!(FetchError::RateLimited.to_string(), "rate limited (HTTP 429)");
    }

    #[test]
    fn test_rate_limit_maps_to_its_own_variant() {
        let err: ResolveError = FetchError::RateLimited.into();
        assert_eq!(err, ResolveError::RateLimited);

        let err: ResolveError = FetchError::Timeout.into();
        assert_eq!(err, ResolveError::FetchFailure(FetchError::Timeout));
    }

    #[test]
    fn test_subcategories() {
        assert_eq!(ResolveError::IdentifierNotFound.subcategory(), "identifier_not_found");
        assert_eq!(ResolveError::NoCandidateFound.subcategory(), "no_candidate");
        assert_eq!(FetchError::MissingMarker.subcategory(), "missing_marker");
        assert_eq!(FetchError::Network("reset".into()).subcategory(), "network");
    }

    #[test]
    fn test_user_message_mentions_anti_scraping() {
        assert!(ResolveError::NoCandidateFound.user_message().contains("anti-scraping"));
        assert!(!ResolveError::IdentifierNotFound.user_message().contains("anti-scraping"));
    }
}
