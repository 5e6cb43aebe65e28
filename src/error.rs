//! Error types for the fiscalcast crate

use thiserror::Error;

/// Custom error types for the fiscalcast crate
///
/// The engine favors graceful degradation over failure: thin history never
/// produces an error, only explicitly empty or absent results. Errors are
/// reserved for malformed parameters and failing history sources.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error surfaced by a caller-supplied history source
    #[error("History source error: {0}")]
    SourceError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
