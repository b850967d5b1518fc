//! Core utilities: configuration, errors, logging

pub mod config;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use config::{Endpoints, ResolverConfig};
pub use error::{AppError, AppResult};
pub use logging::{init_logger, log_resolver_configuration};
