use thiserror::Error;

use crate::resolve::error::ResolveError;

/// Centralized error type for setup and I/O around the pipeline.
///
/// The resolve call itself never fails with this type: per-attempt failures
/// are recorded in the `ResolutionResult`. `AppError` covers building the
/// transport, parsing configuration and the CLI.
///
/// # Example
///
/// ```no_run
/// use instacore::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP client construction or request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Resolution pipeline errors surfaced to the caller
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// Logger setup errors
    #[error("Logging error: {0}")]
    Logging(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
