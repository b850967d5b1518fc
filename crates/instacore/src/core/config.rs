use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Proxy URL applied to every fetch of a resolve call.
/// Read from INSTASAVE_PROXY environment variable
/// Example: socks5://127.0.0.1:1080
/// Empty, "none" and "disabled" all mean no proxy
pub static PROXY: Lazy<Option<String>> = Lazy::new(|| {
    env::var("INSTASAVE_PROXY").ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == "none" || trimmed == "disabled" {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
});

/// GraphQL document id used by the POST API-query variant.
/// Read from INSTAGRAM_DOC_ID environment variable (the platform rotates it every few weeks)
pub static INSTAGRAM_DOC_ID: Lazy<String> =
    Lazy::new(|| env::var("INSTAGRAM_DOC_ID").unwrap_or_else(|_| endpoints::DEFAULT_DOC_ID.to_string()));

/// Default log level for the CLI
/// Read from LOG_LEVEL environment variable; RUST_LOG still takes precedence
pub static LOG_LEVEL: Lazy<String> = Lazy::new(|| env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

/// Endpoint defaults
pub mod endpoints {
    /// Site root; canonical post URLs are built from it
    pub const BASE_URL: &str = "https://www.instagram.com";

    /// oEmbed metadata endpoint (takes `?url=`)
    pub const OEMBED_URL: &str = "https://api.instagram.com/oembed/";

    /// Internal GraphQL endpoint (POST, form-encoded)
    pub const GRAPHQL_POST_URL: &str = "https://www.instagram.com/api/graphql";

    /// Legacy GraphQL query endpoint (GET, `query_hash` + `variables`)
    pub const GRAPHQL_QUERY_URL: &str = "https://www.instagram.com/graphql/query/";

    pub const DEFAULT_DOC_ID: &str = "25531498899829322";

    /// Query hash of the shortcode-media query
    pub const SHORTCODE_QUERY_HASH: &str = "b3055c01b4b222b8a47dc12b090e4e64";

    /// Internal app ID (public, embedded in the web app)
    pub const IG_APP_ID: &str = "936619743392459";

    /// Anti-CSRF token (public static value)
    pub const FB_LSD_TOKEN: &str = "AVqbxe3J_YA";

    /// ASBD ID (public, embedded in the web app)
    pub const FB_ASBD_ID: &str = "129477";
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Timeout for post page fetches (in seconds)
    pub const PAGE_TIMEOUT_SECS: u64 = 15;

    /// Timeout for the oEmbed fetch (in seconds)
    pub const OEMBED_TIMEOUT_SECS: u64 = 15;

    /// Timeout for API-query fetches (in seconds)
    pub const API_TIMEOUT_SECS: u64 = 30;

    /// TCP/TLS connect timeout (in seconds)
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    pub fn page_timeout() -> Duration {
        Duration::from_secs(PAGE_TIMEOUT_SECS)
    }

    pub fn oembed_timeout() -> Duration {
        Duration::from_secs(OEMBED_TIMEOUT_SECS)
    }

    pub fn api_timeout() -> Duration {
        Duration::from_secs(API_TIMEOUT_SECS)
    }

    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_TIMEOUT_SECS)
    }
}

/// Rate limiting configuration
pub mod rate_limit {
    use super::Duration;

    /// Pause after an HTTP 429 before the next request (in seconds)
    pub const BACKOFF_SECS: u64 = 2;

    pub fn backoff() -> Duration {
        Duration::from_secs(BACKOFF_SECS)
    }
}

/// Endpoint set used by the Fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base_url: String,
    pub oembed_url: String,
    pub graphql_post_url: String,
    pub graphql_query_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_url: endpoints::BASE_URL.to_string(),
            oembed_url: endpoints::OEMBED_URL.to_string(),
            graphql_post_url: endpoints::GRAPHQL_POST_URL.to_string(),
            graphql_query_url: endpoints::GRAPHQL_QUERY_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Reads INSTASAVE_BASE_URL, INSTASAVE_OEMBED_URL and INSTASAVE_API_URL,
    /// keeping the defaults for anything unset.
    pub fn from_env() -> Self {
        let mut endpoints = Self::default();
        if let Some(base) = non_empty_var("INSTASAVE_BASE_URL") {
            endpoints = endpoints.with_base_url(&base);
        }
        if let Some(oembed) = non_empty_var("INSTASAVE_OEMBED_URL") {
            endpoints.oembed_url = oembed;
        }
        if let Some(api) = non_empty_var("INSTASAVE_API_URL") {
            endpoints.graphql_post_url = format!("{}/api/graphql", api.trim_end_matches('/'));
            endpoints.graphql_query_url = format!("{}/graphql/query/", api.trim_end_matches('/'));
        }
        endpoints
    }

    /// Points every site-relative endpoint at `base` (mirrors, test servers).
    #[must_use]
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.base_url = base.to_string();
        self.graphql_post_url = format!("{}/api/graphql", base);
        self.graphql_query_url = format!("{}/graphql/query/", base);
        self
    }

    /// Points every endpoint, oEmbed included, at one server.
    #[must_use]
    pub fn single_host(base: &str) -> Self {
        let mut endpoints = Self::default().with_base_url(base);
        endpoints.oembed_url = format!("{}/oembed/", base.trim_end_matches('/'));
        endpoints
    }

    /// Canonical post page URL for a shortcode.
    pub fn post_url(&self, shortcode: &str) -> String {
        format!("{}/p/{}/", self.base_url, shortcode)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Tunables of one Resolver. Immutable once the Resolver is built.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Timeout for post page fetches
    pub page_timeout: Duration,
    /// Timeout for the oEmbed fetch
    pub oembed_timeout: Duration,
    /// Timeout for API-query fetches
    pub api_timeout: Duration,
    /// Connect timeout for the transport
    pub connect_timeout: Duration,
    /// Pause after an HTTP 429 before the next request
    pub rate_limit_backoff: Duration,
    /// Budget for the whole resolve call; `None` = only per-fetch timeouts
    pub deadline: Option<Duration>,
    /// Proxy URL for the transport
    pub proxy: Option<String>,
    /// GraphQL document id for the POST API-query variant
    pub doc_id: String,
    pub endpoints: Endpoints,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            page_timeout: network::page_timeout(),
            oembed_timeout: network::oembed_timeout(),
            api_timeout: network::api_timeout(),
            connect_timeout: network::connect_timeout(),
            rate_limit_backoff: rate_limit::backoff(),
            deadline: None,
            proxy: None,
            doc_id: endpoints::DEFAULT_DOC_ID.to_string(),
            endpoints: Endpoints::default(),
        }
    }
}

impl ResolverConfig {
    /// Creates a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with the environment (proxy, doc id, endpoints).
    pub fn from_env() -> Self {
        Self {
            proxy: PROXY.clone(),
            doc_id: INSTAGRAM_DOC_ID.clone(),
            endpoints: Endpoints::from_env(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = timeout;
        self
    }

    #[must_use]
    pub fn oembed_timeout(mut self, timeout: Duration) -> Self {
        self.oembed_timeout = timeout;
        self
    }

    #[must_use]
    pub fn api_timeout(mut self, timeout: Duration) -> Self {
        self.api_timeout = timeout;
        self
    }

    /// Sets all three per-source timeouts at once.
    #[must_use]
    pub fn timeouts(self, timeout: Duration) -> Self {
        self.page_timeout(timeout).oembed_timeout(timeout).api_timeout(timeout)
    }

    #[must_use]
    pub fn rate_limit_backoff(mut self, backoff: Duration) -> Self {
        self.rate_limit_backoff = backoff;
        self
    }

    #[must_use]
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    #[must_use]
    pub fn doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = doc_id.into();
        self
    }

    #[must_use]
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}
