//! Media resolution pipeline
//!
//! - `shortcode`: post URL → shortcode
//! - `profiles`: browser-like header bundles
//! - `transport`: HTTP sessions (reqwest)
//! - `fetcher`: page, oEmbed and API-query fetches for one call
//! - `extract`: extraction strategies and the chain that runs them
//! - `resolver`: ties the above together

pub mod backoff;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod media;
pub mod profiles;
pub mod resolver;
pub mod response;
pub mod shortcode;
pub mod transport;

pub use error::{FetchError, ResolveError};
pub use extract::{ExtractionChain, ExtractionStrategy, StrategyMatch};
pub use fetcher::{AttemptOutcome, FetchAttempt, FetchSource};
pub use media::{MediaCandidate, MediaKind};
pub use profiles::{ProfileSet, RequestProfile};
pub use resolver::{MatchInfo, ResolutionResult, Resolver};
pub use response::{handle_download, is_supported_url, validate_url, DownloadResponse};
pub use shortcode::PostReference;
pub use transport::{HttpRequest, HttpResponse, HttpSession, ReqwestTransport, Transport};
