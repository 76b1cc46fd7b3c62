//! Keyed table stores.
//!
//! A store file holds one or more tables, each under a string key, the way
//! hierarchical scientific formats do. Readers are handed a path and a key
//! and either return that table or fail; they never create anything.

#[cfg(any(test, feature = "mock"))]
mod memory;
mod parquet;

#[cfg(any(test, feature = "mock"))]
pub use self::memory::MemoryStore;
pub use self::parquet::ParquetStore;
use crate::Table;
use crate::error::Result;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

/// Read access to keyed tables.
///
/// Implementations report a missing file as
/// [`NotFound`](crate::error::ErrorKind::NotFound) and a file without the
/// requested key as [`MissingKey`](crate::error::ErrorKind::MissingKey).
pub trait TableReader {
    fn read_table(&self, path: &Path, key: &str) -> Result<Table>;
}

/// Write access to keyed tables. Writing a key that already exists replaces it.
pub trait TableWriter {
    fn write_table(&self, path: &Path, key: &str, table: &Table) -> Result<()>;
}

impl<R: TableReader + ?Sized> TableReader for &R {
    fn read_table(&self, path: &Path, key: &str) -> Result<Table> {
        (**self).read_table(path, key)
    }
}

impl<R: TableReader + ?Sized> TableReader for Rc<R> {
    fn read_table(&self, path: &Path, key: &str) -> Result<Table> {
        (**self).read_table(path, key)
    }
}

impl<R: TableReader + ?Sized> TableReader for Arc<R> {
    fn read_table(&self, path: &Path, key: &str) -> Result<Table> {
        (**self).read_table(path, key)
    }
}

impl<W: TableWriter + ?Sized> TableWriter for &W {
    fn write_table(&self, path: &Path, key: &str, table: &Table) -> Result<()> {
        (**self).write_table(path, key, table)
    }
}

impl<W: TableWriter + ?Sized> TableWriter for Rc<W> {
    fn write_table(&self, path: &Path, key: &str, table: &Table) -> Result<()> {
        (**self).write_table(path, key, table)
    }
}
