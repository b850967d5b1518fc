//! Fetcher: every outbound request of one resolve call.
//!
//! A `Fetcher` lives exactly as long as one resolve call. It owns the call's
//! HTTP session (and therefore its cookie store), the shared 429 backoff gate
//! and the optional caller deadline. Every request it sends becomes one
//! `FetchAttempt`, successful or not.
//!
//! Sources:
//! - post page and canonical page: GET, profiles tried in order until one
//!   returns HTTP 200 with a recognizable content marker
//! - oEmbed: one GET keyed by the submitted URL
//! - API query: one request per known query variant, keyed by shortcode

use futures_util::FutureExt;
use serde::Serialize;
use std::fmt;
use std::panic::AssertUnwindSafe;
use tokio::time::Instant;

use crate::core::config::{endpoints, ResolverConfig};
use crate::resolve::backoff::RateLimitGate;
use crate::resolve::error::FetchError;
use crate::resolve::profiles::{ProfileSet, RequestProfile};
use crate::resolve::transport::{HttpRequest, HttpSession};

/// Strings whose presence means a page body carries post content rather than
/// a login wall or consent page.
pub const CONTENT_MARKERS: &[&str] = &[
    "window._sharedData",
    "__additionalDataLoaded",
    "\"shortcode_media\"",
    "\"xdt_shortcode_media\"",
    "\"video_url\"",
    "\"display_url\"",
    "og:video",
    "og:image",
    "twitter:image",
];

/// Profile name recorded when the profile set is empty.
const NO_PROFILE: &str = "none";

pub fn has_content_marker(body: &str) -> bool {
    CONTENT_MARKERS.iter().any(|marker| body.contains(marker))
}

/// Where a fetch went, in resolver precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchSource {
    PostPage,
    CanonicalPage,
    OEmbed,
    ApiQuery,
}

impl FetchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchSource::PostPage => "post_page",
            FetchSource::CanonicalPage => "canonical_page",
            FetchSource::OEmbed => "oembed",
            FetchSource::ApiQuery => "api_query",
        }
    }
}

impl fmt::Display for FetchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success { status: u16, body: String },
    Failure(FetchError),
}

/// One request and what came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchAttempt {
    pub source: FetchSource,
    pub target_url: String,
    pub profile: &'static str,
    pub outcome: AttemptOutcome,
}

impl FetchAttempt {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Success { .. })
    }

    /// Body of a successful attempt.
    pub fn body(&self) -> Option<&str> {
        match &self.outcome {
            AttemptOutcome::Success { body, .. } => Some(body),
            AttemptOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FetchError> {
        match &self.outcome {
            AttemptOutcome::Success { .. } => None,
            AttemptOutcome::Failure(err) => Some(err),
        }
    }
}

/// Known API-query variants, tried in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVariant {
    /// POST `api/graphql` with a `doc_id` and form-encoded variables
    DocIdPost,
    /// GET `graphql/query/` with the legacy `query_hash`
    QueryHashGet,
}

impl ApiVariant {
    pub const ALL: [ApiVariant; 2] = [ApiVariant::DocIdPost, ApiVariant::QueryHashGet];

    pub fn name(&self) -> &'static str {
        match self {
            ApiVariant::DocIdPost => "doc_id_post",
            ApiVariant::QueryHashGet => "query_hash_get",
        }
    }
}

pub struct Fetcher<'a> {
    session: Box<dyn HttpSession>,
    profiles: &'a ProfileSet,
    config: &'a ResolverConfig,
    gate: RateLimitGate,
    deadline: Option<Instant>,
}

impl<'a> Fetcher<'a> {
    /// Starts the deadline clock, if one is configured. A budget too large to
    /// represent as an `Instant` means no deadline.
    pub fn new(session: Box<dyn HttpSession>, profiles: &'a ProfileSet, config: &'a ResolverConfig) -> Self {
        Self {
            session,
            profiles,
            config,
            gate: RateLimitGate::new(config.rate_limit_backoff),
            deadline: config.deadline.and_then(|budget| Instant::now().checked_add(budget)),
        }
    }

    pub fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Number of HTTP 429 responses seen so far.
    pub fn rate_limit_hits(&self) -> u32 {
        self.gate.hits()
    }

    /// Fetches a post page, trying each profile in order until one returns
    /// HTTP 200 with a content marker. Returns every attempt made; the last
    /// one is the success, if any.
    pub async fn fetch_page(&self, source: FetchSource, target_url: &str) -> Vec<FetchAttempt> {
        let mut attempts = Vec::with_capacity(self.profiles.len());

        for profile in self.profiles {
            let request = HttpRequest::get(target_url, self.config.page_timeout).headers(profile.headers.iter().copied());
            let attempt = self.fetch(source, profile.name, request, true).await;

            let done = attempt.is_success() || attempt.failure() == Some(&FetchError::DeadlineExceeded);
            attempts.push(attempt);
            if done {
                break;
            }
        }

        if !attempts.iter().any(FetchAttempt::is_success) {
            log::warn!("All {} profiles failed for {}", attempts.len(), target_url);
        }
        attempts
    }

    /// Fetches oEmbed metadata for the submitted post URL.
    pub async fn fetch_oembed(&self, post_url: &str) -> FetchAttempt {
        let base = &self.config.endpoints.oembed_url;
        let separator = if base.contains('?') { '&' } else { '?' };
        let url = format!("{}{}url={}", base, separator, urlencoding::encode(post_url));

        let profile = self.profiles.primary();
        let request = HttpRequest::get(url, self.config.oembed_timeout).headers(json_headers(profile));
        self.fetch(FetchSource::OEmbed, profile_name(profile), request, false).await
    }

    /// Sends one API-query variant for a shortcode.
    pub async fn fetch_api(&self, variant: ApiVariant, shortcode: &str) -> FetchAttempt {
        let urls = &self.config.endpoints;
        let variables = serde_json::json!({ "shortcode": shortcode }).to_string();
        let profile = self.profiles.primary();

        let request = match variant {
            ApiVariant::DocIdPost => {
                let body = format!(
                    "doc_id={}&variables={}&lsd={}",
                    self.config.doc_id,
                    urlencoding::encode(&variables),
                    endpoints::FB_LSD_TOKEN
                );
                HttpRequest::post(&urls.graphql_post_url, body, self.config.api_timeout)
                    .headers(json_headers(profile))
                    .header("X-IG-App-ID", endpoints::IG_APP_ID)
                    .header("X-FB-LSD", endpoints::FB_LSD_TOKEN)
                    .header("X-ASBD-ID", endpoints::FB_ASBD_ID)
                    .header("X-Requested-With", "XMLHttpRequest")
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .header("Referer", &format!("{}/", urls.base_url))
                    .header("Origin", &urls.base_url)
            }
            ApiVariant::QueryHashGet => {
                let url = format!(
                    "{}?query_hash={}&variables={}",
                    urls.graphql_query_url,
                    endpoints::SHORTCODE_QUERY_HASH,
                    urlencoding::encode(&variables)
                );
                HttpRequest::get(url, self.config.api_timeout)
                    .headers(json_headers(profile))
                    .header("X-IG-App-ID", endpoints::IG_APP_ID)
                    .header("X-Requested-With", "XMLHttpRequest")
                    .header("Referer", &urls.post_url(shortcode))
            }
        };

        log::debug!("API query variant {} for {}", variant.name(), shortcode);
        self.fetch(FetchSource::ApiQuery, profile_name(profile), request, false).await
    }

    /// Sends one request and records it. Never fails: every problem becomes
    /// the attempt's `Failure` outcome.
    pub async fn fetch(
        &self,
        source: FetchSource,
        profile: &'static str,
        request: HttpRequest,
        require_marker: bool,
    ) -> FetchAttempt {
        let target_url = request.url.clone();
        let outcome = self.send(request, require_marker).await;

        match &outcome {
            AttemptOutcome::Success { status, body } => {
                log::info!(
                    "Fetched {} ({}) with profile {}: HTTP {}, {} bytes",
                    target_url,
                    source,
                    profile,
                    status,
                    body.len()
                );
            }
            AttemptOutcome::Failure(err) => {
                log::warn!("Fetch of {} ({}) with profile {} failed: {}", target_url, source, profile, err);
            }
        }

        FetchAttempt {
            source,
            target_url,
            profile,
            outcome,
        }
    }

    async fn send(&self, mut request: HttpRequest, require_marker: bool) -> AttemptOutcome {
        self.gate.wait(self.deadline).await;

        if let Some(deadline) = self.deadline {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return AttemptOutcome::Failure(FetchError::DeadlineExceeded);
            }
            request.timeout = request.timeout.min(remaining);
        }

        let timeout = request.timeout;
        let sent = AssertUnwindSafe(tokio::time::timeout(timeout, self.session.send(request)))
            .catch_unwind()
            .await;

        let response = match sent {
            Ok(Ok(Ok(response))) => response,
            Ok(Ok(Err(err))) => return AttemptOutcome::Failure(err),
            Ok(Err(_elapsed)) => return AttemptOutcome::Failure(FetchError::Timeout),
            Err(_) => {
                log::error!("Transport panicked while sending a request");
                return AttemptOutcome::Failure(FetchError::Network("transport panicked".to_string()));
            }
        };

        match response.status {
            200 if !require_marker || has_content_marker(&response.body) => AttemptOutcome::Success {
                status: response.status,
                body: response.body,
            },
            200 => AttemptOutcome::Failure(FetchError::MissingMarker),
            429 => {
                self.gate.note_rate_limited();
                AttemptOutcome::Failure(FetchError::RateLimited)
            }
            status => AttemptOutcome::Failure(FetchError::HttpStatus(status)),
        }
    }
}

fn profile_name(profile: Option<&RequestProfile>) -> &'static str {
    profile.map_or(NO_PROFILE, |p| p.name)
}

fn json_headers(profile: Option<&RequestProfile>) -> Vec<(&'static str, &'static str)> {
    profile.map(RequestProfile::json_headers).unwrap_or_default()
}
