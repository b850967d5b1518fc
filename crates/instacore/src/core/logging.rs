//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (tracing subscriber + `log` bridge)
//! - Resolver configuration summary at startup

use tracing_subscriber::EnvFilter;

use crate::core::config::ResolverConfig;
use crate::core::error::{AppError, AppResult};
use crate::resolve::profiles::ProfileSet;

/// Initialize the global logger
///
/// Library code logs through the `log` macros; `LogTracer` forwards those
/// records into the tracing subscriber installed here. `RUST_LOG` overrides
/// `default_level` when set.
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(AppError::Logging)` - A logger was already installed
pub fn init_logger(default_level: &str) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_log::LogTracer::init().map_err(|e| AppError::Logging(format!("Failed to bridge log records: {}", e)))?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| AppError::Logging(format!("Failed to initialize logger: {}", e)))?;

    Ok(())
}

/// Logs the resolver configuration at application startup
pub fn log_resolver_configuration(config: &ResolverConfig, profiles: &ProfileSet) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("Resolver configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("  profiles: {}", profiles.names().join(", "));
    log::info!(
        "  timeouts: page={:?} oembed={:?} api={:?}",
        config.page_timeout,
        config.oembed_timeout,
        config.api_timeout
    );
    log::info!("  rate-limit backoff: {:?}", config.rate_limit_backoff);
    match config.deadline {
        Some(deadline) => log::info!("  deadline: {:?}", deadline),
        None => log::info!("  deadline: none"),
    }
    match config.proxy {
        Some(ref proxy) => log::info!("  proxy: {}", proxy),
        None => log::info!("  proxy: none"),
    }
    log::info!("  doc_id: {}", config.doc_id);
    log::info!("  base url: {}", config.endpoints.base_url);
}
