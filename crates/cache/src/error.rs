//! Cache Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use behavior_config::error::{Error as ConfigError, ErrorKind as ConfigErrorKind};
use behavior_table::error::{Error as TableError, ErrorKind as TableErrorKind};
use derive_more::{Display, Error};
use std::path::PathBuf;

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The project manifest could not be read as a table.
    #[display("unable to load project manifest: {}", _0.display())]
    ManifestUnreadable(#[error(not(source))] PathBuf),
    /// The project manifest was read but lacks required columns or values.
    #[display("invalid project manifest: {_0}")]
    InvalidManifest(#[error(not(source))] String),
    /// No manifest row belongs to the requested container.
    #[display("container not found: {_0}")]
    ContainerNotFound(#[error(not(source))] u64),
    /// The session metadata table is empty or malformed.
    #[display("invalid session metadata: {_0}")]
    InvalidMetadata(#[error(not(source))] String),
    /// Reading or combining session tables failed.
    #[display("table error: {_0}")]
    Table(TableErrorKind),
    /// Loading the cache configuration failed.
    #[display("configuration error: {_0}")]
    Config(ConfigErrorKind),
}

impl ErrorKind {
    /// Convert a table error into a cache error, keeping the table crate's
    /// `Exn` frame as a child in the error tree.
    #[track_caller]
    pub fn table(err: TableError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Table(inner))
    }

    /// Convert a configuration error into a cache error, keeping the
    /// configuration crate's `Exn` frame as a child in the error tree.
    #[track_caller]
    pub fn config(err: ConfigError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Config(inner))
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Table(inner) => inner.is_retryable(),
            Self::Config(inner) => inner.is_retryable(),
            _ => false,
        }
    }
}
