//! Resolver: post URL in, direct media URL out.
//!
//! Fetch sources are tried strictly in sequence, in this order:
//!
//! 1. the submitted post URL
//! 2. the canonical post URL rebuilt from the shortcode (skipped when equal to 1)
//! 3. oEmbed metadata
//! 4. the internal API query, one attempt per known variant
//!
//! Every successful fetch is run through the whole extraction chain. The
//! first candidate ends the call; nothing after it is fetched.

use std::sync::Arc;
use tracing::Instrument;

use crate::core::config::ResolverConfig;
use crate::resolve::error::ResolveError;
use crate::resolve::extract::{ExtractionChain, StrategyMatch};
use crate::resolve::fetcher::{ApiVariant, FetchAttempt, FetchSource, Fetcher};
use crate::resolve::media::MediaCandidate;
use crate::resolve::profiles::ProfileSet;
use crate::resolve::shortcode::PostReference;
use crate::resolve::transport::{ReqwestTransport, Transport};

/// Which source and strategy produced the media URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchInfo {
    pub source: FetchSource,
    pub strategy: &'static str,
}

/// Outcome of one resolve call. Built fresh per call and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub post: PostReference,
    pub media: Option<MediaCandidate>,
    /// Every request sent, in order. Diagnostics only.
    pub attempts_tried: Vec<FetchAttempt>,
    pub matched: Option<MatchInfo>,
    /// Why nothing was found; `None` when `media` is present.
    pub failure: Option<ResolveError>,
}

impl ResolutionResult {
    fn found(post: PostReference, attempts: Vec<FetchAttempt>, source: FetchSource, found: StrategyMatch) -> Self {
        Self {
            post,
            media: Some(found.candidate),
            attempts_tried: attempts,
            matched: Some(MatchInfo {
                source,
                strategy: found.strategy,
            }),
            failure: None,
        }
    }

    fn not_found(post: PostReference, attempts: Vec<FetchAttempt>, reason: ResolveError) -> Self {
        Self {
            post,
            media: None,
            attempts_tried: attempts,
            matched: None,
            failure: Some(reason),
        }
    }

    pub fn is_found(&self) -> bool {
        self.media.is_some()
    }

    pub fn into_result(self) -> Result<MediaCandidate, ResolveError> {
        match self.media {
            Some(media) => Ok(media),
            None => Err(self.failure.unwrap_or(ResolveError::NoCandidateFound)),
        }
    }
}

/// One planned fetch.
enum Step {
    Page(FetchSource, String),
    OEmbed(String),
    Api(ApiVariant),
}

/// Strips the trailing slash so `/p/X` and `/p/X/` compare equal.
fn same_url(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}

/// Post-URL-to-media-URL resolver.
///
/// Cheap to clone; clones share the transport, profiles and strategy chain.
/// Holds no per-call state, so one instance can serve concurrent calls.
#[derive(Clone)]
pub struct Resolver {
    transport: Arc<dyn Transport>,
    profiles: Arc<ProfileSet>,
    chain: Arc<ExtractionChain>,
    config: ResolverConfig,
}

impl Resolver {
    /// Resolver with the reqwest transport, default profiles and default
    /// strategy chain.
    pub fn new(config: ResolverConfig) -> Self {
        let transport = Arc::new(ReqwestTransport::new(&config));
        Self::with_parts(
            transport,
            Arc::new(ProfileSet::default()),
            Arc::new(ExtractionChain::default_chain()),
            config,
        )
    }

    pub fn from_env() -> Self {
        Self::new(ResolverConfig::from_env())
    }

    pub fn with_parts(
        transport: Arc<dyn Transport>,
        profiles: Arc<ProfileSet>,
        chain: Arc<ExtractionChain>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            transport,
            profiles,
            chain,
            config,
        }
    }

    /// Same parts, different transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    pub fn chain(&self) -> &ExtractionChain {
        &self.chain
    }

    /// Resolves a post URL. Never fails: problems end up in the result's
    /// `failure` and `attempts_tried`.
    pub async fn resolve(&self, raw_url: &str) -> ResolutionResult {
        let post = PostReference::parse(raw_url);

        let Some(shortcode) = post.post_id().map(str::to_string) else {
            log::info!("No post identifier in {:?}, nothing to fetch", post.raw_url);
            return ResolutionResult::not_found(post, Vec::new(), ResolveError::IdentifierNotFound);
        };

        let span = tracing::info_span!("resolve", shortcode = %shortcode);
        self.resolve_post(post, &shortcode).instrument(span).await
    }

    fn plan(&self, post: &PostReference, shortcode: &str) -> Vec<Step> {
        let mut steps = Vec::with_capacity(3 + ApiVariant::ALL.len());

        let post_url = post.url().map(|url| url.to_string());
        let canonical = self.config.endpoints.post_url(shortcode);

        if let Some(ref url) = post_url {
            steps.push(Step::Page(FetchSource::PostPage, url.clone()));
        }
        if post_url.as_deref().is_some_and(|url| same_url(url, &canonical)) {
            log::debug!("Submitted URL is already canonical, skipping second page fetch");
        } else {
            steps.push(Step::Page(FetchSource::CanonicalPage, canonical.clone()));
        }

        steps.push(Step::OEmbed(post_url.unwrap_or(canonical)));
        steps.extend(ApiVariant::ALL.into_iter().map(Step::Api));
        steps
    }

    async fn resolve_post(&self, post: PostReference, shortcode: &str) -> ResolutionResult {
        log::info!("Resolving {} (shortcode {})", post.raw_url, shortcode);

        let session = match self.transport.open_session() {
            Ok(session) => session,
            Err(e) => {
                log::error!("Failed to open HTTP session: {}", e);
                return ResolutionResult::not_found(post, Vec::new(), ResolveError::NoCandidateFound);
            }
        };
        let fetcher = Fetcher::new(session, &self.profiles, &self.config);
        let mut attempts: Vec<FetchAttempt> = Vec::new();

        for step in self.plan(&post, shortcode) {
            if fetcher.deadline_passed() {
                log::warn!("Resolve deadline reached after {} attempts", attempts.len());
                break;
            }

            match step {
                Step::Page(source, url) => attempts.extend(fetcher.fetch_page(source, &url).await),
                Step::OEmbed(url) => attempts.push(fetcher.fetch_oembed(&url).await),
                Step::Api(variant) => attempts.push(fetcher.fetch_api(variant, shortcode).await),
            }

            if let Some((source, found)) = self.extract_from(attempts.last()) {
                log::info!(
                    "Resolved {} via {} / {}: {} ({})",
                    shortcode,
                    source,
                    found.strategy,
                    found.candidate.url,
                    found.candidate.kind
                );
                return ResolutionResult::found(post, attempts, source, found);
            }
        }

        let failed = attempts.iter().filter(|a| !a.is_success()).count();
        log::warn!(
            "No media found for {}: {} attempts ({} failed, {} rate limited)",
            shortcode,
            attempts.len(),
            failed,
            fetcher.rate_limit_hits()
        );
        ResolutionResult::not_found(post, attempts, ResolveError::NoCandidateFound)
    }

    /// Runs the chain over a successful attempt's body.
    fn extract_from(&self, attempt: Option<&FetchAttempt>) -> Option<(FetchSource, StrategyMatch)> {
        let attempt = attempt?;
        let body = attempt.body()?;
        let found = self.chain.extract(body);
        if found.is_none() {
            log::debug!("No strategy matched the {} payload", attempt.source);
        }
        found.map(|found| (attempt.source, found))
    }
}
