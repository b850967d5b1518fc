//! InstaCore - resolves public Instagram post URLs into direct media URLs
//!
//! This library provides the media-resolution pipeline behind InstaSave:
//! post identifier extraction, multi-profile fetching and an ordered chain
//! of extraction strategies run over every fetched payload.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors and logging
//! - `resolve`: The resolution pipeline and its HTTP transport
//!
//! # Example
//!
//! ```no_run
//! use instacore::{Resolver, ResolverConfig};
//!
//! # async fn run() {
//! let resolver = Resolver::new(ResolverConfig::default());
//! let result = resolver.resolve("https://www.instagram.com/p/ABC123/").await;
//! if let Some(media) = result.media {
//!     println!("{} ({})", media.url, media.kind);
//! }
//! # }
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod core;
pub mod resolve;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult, Endpoints, ResolverConfig};
pub use resolve::{
    handle_download, is_supported_url, validate_url, DownloadResponse, FetchAttempt, FetchSource, MediaCandidate,
    MediaKind, PostReference, ResolutionResult, ResolveError, Resolver,
};
