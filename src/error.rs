//! Error types for extbuild
//!
//! Uses `thiserror` for library errors; the binary wraps these in `anyhow`
//! with file-path context at the I/O boundary.

use thiserror::Error;

/// Result type alias for extbuild operations
pub type ExtbuildResult<T> = Result<T, ExtbuildError>;

/// Main error type for extbuild operations
#[derive(Error, Debug)]
pub enum ExtbuildError {
    /// Platform selection normalized to an empty list
    #[error("at least one platform must be provided")]
    NoPlatform,

    /// Arch token outside the supported vocabulary
    #[error("unknown arch token: {token} (supported: amd64, arm64)")]
    UnknownArchToken { token: String },

    /// Reduced CI mode string that is none of auto|enabled|disabled
    #[error("invalid reduced CI mode: '{mode}' (must be auto|enabled|disabled)")]
    InvalidReducedCiMode { mode: String },

    /// Selected platform missing from the matrix configuration
    #[error("unknown platform: {platform}")]
    UnknownPlatform { platform: String },

    /// Matrix configuration contains a field outside the schema
    #[error("unknown field '{field}' in matrix configuration")]
    UnknownField { field: String },

    /// More than one top-level JSON value in the matrix configuration
    #[error("invalid JSON: multiple top-level values")]
    TrailingData,

    /// GitHub event payload file unreadable
    #[error("read GitHub event '{path}': {source}")]
    EventRead {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    /// GitHub event payload file is not valid JSON
    #[error("parse GitHub event '{path}': {source}")]
    EventParse {
        path: std::path::PathBuf,
        source: serde_json::Error,
    },

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
