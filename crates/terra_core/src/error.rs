//! Error Types
//!
//! This module defines the error types shared by every Terra crate.
//!
//! # Overview
//!
//! The main error type [`Error`] groups failures by subsystem:
//! - [`AssetError`]: listing, metadata and geometry fetches and decoding
//! - [`LayerError`]: host-map layer lifecycle problems
//!
//! Most of these never escape the overlay: per-asset failures are logged and
//! contained at the boundary that owns the asset. They are still typed so the
//! boundary can report *why* an asset was skipped.
//!
//! ```rust,ignore
//! use terra_core::{Error, Result};
//!
//! fn resolve() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Failures raised while reading or decoding an asset.
#[derive(Error, Debug)]
pub enum AssetError {
    /// The requested resource does not exist.
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Local file I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The server answered with a non-success status.
    #[error("HTTP response error: status {status} for {uri}")]
    Http {
        /// Requested URI
        uri: String,
        /// HTTP status code
        status: u16,
    },

    /// Transport-level failure (DNS, connection reset, CORS, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// The payload was fetched but its content is unusable.
    #[error("Invalid asset data: {0}")]
    Format(String),
}

/// Failures raised by the host-map layer lifecycle.
#[derive(Error, Debug)]
pub enum LayerError {
    /// A layer with this id is already registered on the host.
    #[error("Layer already registered: {0}")]
    DuplicateLayer(String),
}

/// The main error type for Terra.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Layer(#[from] LayerError),

    /// JSON parsing error (listing, metadata, settings).
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Feature not enabled at compile time.
    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Asset(AssetError::Io(err))
    }
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
