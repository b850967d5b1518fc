//! Extraction strategies and the chain that runs them.
//!
//! Every fetched payload, whatever its source, goes through the same ordered
//! chain. The first strategy to return a candidate wins. A strategy that
//! errors or panics is logged and skipped; it never aborts the chain.

pub mod api_query;
pub mod embedded;
pub mod media_node;
pub mod meta_tags;
pub mod oembed;
pub mod patterns;

use std::panic::{self, AssertUnwindSafe};

use crate::resolve::error::ResolveError;
use crate::resolve::media::MediaCandidate;

pub use api_query::ApiQueryStrategy;
pub use embedded::EmbeddedDataStrategy;
pub use meta_tags::MetaTagStrategy;
pub use oembed::OEmbedStrategy;
pub use patterns::PatternStrategy;

/// One way of pulling a media URL out of a payload.
///
/// `Ok(None)` means "nothing here"; `Err` means the payload looked like this
/// strategy's format but could not be read. Both let the chain continue.
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    fn extract(&self, payload: &str) -> Result<Option<MediaCandidate>, ResolveError>;
}

/// A candidate together with the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyMatch {
    pub strategy: &'static str,
    pub candidate: MediaCandidate,
}

/// Ordered list of strategies.
pub struct ExtractionChain {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for ExtractionChain {
    fn default() -> Self {
        Self::default_chain()
    }
}

impl ExtractionChain {
    /// Chain with no strategies.
    pub fn empty() -> Self {
        Self { strategies: Vec::new() }
    }

    /// embedded data → regex patterns → oEmbed → API query → meta tags.
    pub fn default_chain() -> Self {
        let mut chain = Self::empty();
        chain.register(Box::new(EmbeddedDataStrategy));
        chain.register(Box::new(PatternStrategy));
        chain.register(Box::new(OEmbedStrategy));
        chain.register(Box::new(ApiQueryStrategy));
        chain.register(Box::new(MetaTagStrategy));
        chain
    }

    /// Appends a strategy; it runs after every existing one.
    pub fn register(&mut self, strategy: Box<dyn ExtractionStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Runs the strategies in order and returns the first candidate.
    pub fn extract(&self, payload: &str) -> Option<StrategyMatch> {
        for strategy in &self.strategies {
            let name = strategy.name();
            match panic::catch_unwind(AssertUnwindSafe(|| strategy.extract(payload))) {
                Ok(Ok(Some(candidate))) => {
                    log::debug!("Strategy {} matched {} ({})", name, candidate.url, candidate.kind);
                    return Some(StrategyMatch {
                        strategy: name,
                        candidate,
                    });
                }
                Ok(Ok(None)) => {}
                Ok(Err(e)) => {
                    log::debug!("Strategy {} failed: {}", name, e);
                }
                Err(_) => {
                    log::error!("Strategy {} panicked, skipping it", name);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::media::MediaKind;

    struct Fixed(&'static str, Option<&'static str>);

    impl ExtractionStrategy for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn extract(&self, _payload: &str) -> Result<Option<MediaCandidate>, ResolveError> {
            Ok(self.1.map(|url| MediaCandidate::new(url, MediaKind::Image)))
        }
    }

    struct Failing;

    impl ExtractionStrategy for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn extract(&self, _payload: &str) -> Result<Option<MediaCandidate>, ResolveError> {
            Err(ResolveError::ParseFailure("broken".into()))
        }
    }

    struct Panicking;

    impl ExtractionStrategy for Panicking {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn extract(&self, _payload: &str) -> Result<Option<MediaCandidate>, ResolveError> {
            panic!("strategy bug")
        }
    }

    #[test]
    fn test_default_chain_order() {
        assert_eq!(
            ExtractionChain::default_chain().names(),
            vec!["embedded_data", "regex_patterns", "oembed", "api_query", "meta_tags"]
        );
    }

    #[test]
    fn test_first_match_wins() {
        let mut chain = ExtractionChain::empty();
        chain.register(Box::new(Fixed("none", None)));
        chain.register(Box::new(Fixed("first", Some("https://x/1.jpg"))));
        chain.register(Box::new(Fixed("second", Some("https://x/2.jpg"))));

        let found = chain.extract("payload").unwrap();
        assert_eq!(found.strategy, "first");
        assert_eq!(found.candidate.url, "https://x/1.jpg");
    }

    #[test]
    fn test_errors_and_panics_do_not_stop_the_chain() {
        let mut chain = ExtractionChain::empty();
        chain.register(Box::new(Failing));
        chain.register(Box::new(Panicking));
        chain.register(Box::new(Fixed("last", Some("https://x/i.jpg"))));

        let found = chain.extract("payload").unwrap();
        assert_eq!(found.strategy, "last");
    }

    #[test]
    fn test_empty_chain_finds_nothing() {
        assert!(ExtractionChain::empty().extract("anything").is_none());
        assert!(ExtractionChain::empty().is_empty());
    }

    #[test]
    fn test_default_chain_on_unrelated_html() {
        let html = "<html><head><title>Login</title></head><body>Please log in</body></html>";
        assert!(ExtractionChain::default_chain().extract(html).is_none());
    }

    #[test]
    fn test_default_chain_falls_through_to_patterns() {
        let html = r#"<html><body><div data-media='{"display_url":"https://x/i.jpg"}'></div></body></html>"#;
        let found = ExtractionChain::default_chain().extract(html).unwrap();
        assert_eq!(found.strategy, "regex_patterns");
        assert_eq!(found.candidate, MediaCandidate::new("https://x/i.jpg", MediaKind::Image));
    }

    #[test]
    fn test_default_chain_prefers_embedded_over_meta() {
        let html = r#"<html><head>
            <meta property="og:image" content="https://x/meta.jpg">
            <script>window._sharedData = {"entry_data":{"PostPage":[{"graphql":{"shortcode_media":
                {"__typename":"GraphVideo","video_url":"https:\/\/x\/v.mp4"}}}]}};</script>
            </head></html>"#;
        let found = ExtractionChain::default_chain().extract(html).unwrap();
        assert_eq!(found.strategy, "embedded_data");
        assert_eq!(found.candidate, MediaCandidate::new("https://x/v.mp4", MediaKind::Video));
    }
}
