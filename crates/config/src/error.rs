//! Configuration Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration file does not exist.
    #[display("configuration file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// File extension doesn't map to a supported format (json, yaml, toml).
    #[display("unsupported configuration format: {}", _0.display())]
    UnsupportedFormat(#[error(not(source))] PathBuf),
    /// The configuration could be read, but not parsed into the expected shape.
    #[display("invalid configuration")]
    Invalid,
    /// No platform configuration directory could be determined.
    #[display("no configuration directory available on this platform")]
    NoConfigDir,
    /// The manifest section does not follow the manifest schema.
    #[display("invalid manifest: {_0}")]
    InvalidManifest(#[error(not(source))] String),
    /// A manifest lookup named a key that was never loaded.
    #[display("unknown manifest key: {_0}")]
    UnknownManifestKey(#[error(not(source))] String),
    /// Following parent keys from this entry loops back onto itself.
    #[display("manifest parent keys form a cycle at: {_0}")]
    ManifestCycle(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Configuration is either valid or it isn't; fix the file instead.
        false
    }
}
