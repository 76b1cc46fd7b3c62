//! Table Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A table error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for table operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// File does not exist.
    #[display("file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Underlying I/O error while opening, reading or writing a file.
    #[display("I/O error: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// The file exists but could not be decoded (or encoded) as a table.
    #[display("malformed table file: {}", _0.display())]
    Format(#[error(not(source))] PathBuf),
    /// The file does not contain a table stored under the requested key.
    #[display("table '{key}' not found in {}", path.display())]
    MissingKey { path: PathBuf, key: String },
    /// A named column is not part of the table.
    #[display("column not found: {_0}")]
    MissingColumn(#[error(not(source))] String),
    /// Both sides of a join define the same data columns.
    #[display("columns overlap: {_0}")]
    ColumnOverlap(#[error(not(source))] String),
    /// The index levels of a table are unusable for the requested operation.
    #[display("invalid index: {_0}")]
    InvalidIndex(#[error(not(source))] String),
    /// A column read as integers holds values with a fractional part, or
    /// values no 64-bit integer can represent.
    #[display("column '{_0}' holds non-integer values")]
    NotInteger(#[error(not(source))] String),
    /// In-memory table data could not be transformed (type casts, kernels).
    #[display("invalid table data")]
    InvalidData,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
