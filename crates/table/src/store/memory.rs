//! In-memory table store for testing.

use super::{TableReader, TableWriter};
use crate::Table;
use crate::error::{ErrorKind, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

type Location = (PathBuf, String);

/// In-memory table store for testing.
///
/// Tables live in a `HashMap` behind a [`RefCell`], so both traits operate on
/// `&self`. Every read attempt is counted per `(path, key)`, successful or
/// not, which makes it easy to assert how often a consumer hits storage.
/// Single-threaded only; share it with [`Rc`](std::rc::Rc).
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RefCell<HashMap<Location, Table>>,
    reads: RefCell<HashMap<Location, usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `(path, key, table)` entries.
    pub fn with_tables(tables: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<String>, Table)>) -> Self {
        let store = Self::new();
        for (path, key, table) in tables {
            store.insert(path, key, table);
        }
        store
    }

    pub fn insert(&self, path: impl Into<PathBuf>, key: impl Into<String>, table: Table) {
        self.tables.borrow_mut().insert((path.into(), key.into()), table);
    }

    /// Remove a table, returning it if it was present.
    pub fn remove(&self, path: impl Into<PathBuf>, key: impl Into<String>) -> Option<Table> {
        let location: Location = (path.into(), key.into());
        self.tables.borrow_mut().remove(&location)
    }

    /// Number of read attempts for one `(path, key)`.
    pub fn reads(&self, path: impl Into<PathBuf>, key: impl Into<String>) -> usize {
        let location: Location = (path.into(), key.into());
        self.reads.borrow().get(&location).copied().unwrap_or(0)
    }

    /// Number of read attempts across every location.
    pub fn total_reads(&self) -> usize {
        self.reads.borrow().values().sum()
    }
}

impl TableReader for MemoryStore {
    fn read_table(&self, path: &Path, key: &str) -> Result<Table> {
        let location = (path.to_path_buf(), key.to_string());
        *self.reads.borrow_mut().entry(location.clone()).or_insert(0) += 1;
        let tables = self.tables.borrow();
        if let Some(table) = tables.get(&location) {
            return Ok(table.clone());
        }
        match tables.keys().any(|(stored, _)| stored == path) {
            true => exn::bail!(ErrorKind::MissingKey { path: path.to_path_buf(), key: key.to_string() }),
            false => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
        }
    }
}

impl TableWriter for MemoryStore {
    fn write_table(&self, path: &Path, key: &str, table: &Table) -> Result<()> {
        self.insert(path, key, table.clone());
        Ok(())
    }
}
