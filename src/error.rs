//! Error types for iam-expand
//!
//! This module defines the error hierarchy used throughout the crate.
//! We use `thiserror` for library-style errors that are part of the API;
//! the CLI wraps them in `anyhow` at the boundary.

use thiserror::Error;

/// Failures raised by the expansion and inversion engines.
///
/// Whether a bad input surfaces as an error or degrades to being dropped
/// from the output is controlled by [`ExpansionConfig`](crate::expand::ExpansionConfig),
/// with one exception: inversion raises [`ExpandError::EmptyInput`]
/// unconditionally.
#[derive(Error, Debug)]
pub enum ExpandError {
    /// The input does not have the `service:action` shape.
    #[error("Invalid action format: {0}")]
    InvalidFormat(String),

    /// The service key is not in the catalog.
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// An exact, wildcard-free action is not in the catalog.
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Inversion needs at least one pattern to work with.
    #[error("at least one action must be provided to invert")]
    EmptyInput,
}

/// Catalog data loading errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog data from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, ExpandError>;

/// Result type alias for catalog loading
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
