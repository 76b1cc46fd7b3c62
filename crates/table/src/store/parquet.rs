//! Parquet-backed keyed table store.

use super::{TableReader, TableWriter};
use crate::Table;
use crate::error::{ErrorKind, Result};
use crate::fs;
use arrow::compute::concat_batches;
use exn::ResultExt;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// File metadata entry naming the key a table is stored under.
pub const TABLE_KEY_METADATA: &str = "behavior.table_key";
/// File metadata entry holding the JSON list of index column names.
pub const INDEX_METADATA: &str = "behavior.index_columns";
const EXTENSION: &str = "parquet";

/// Stores each table as its own Parquet file.
///
/// - A **file** path holds exactly one table; its key is recorded in the
///   file's key-value metadata and must match the requested key.
/// - A **directory** path is a multi-table store: the table for `key` lives
///   at `{dir}/{key}.parquet`.
///
/// Index column names travel in the file metadata as well, so a table reads
/// back with the same index it was written with.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParquetStore;

impl ParquetStore {
    pub fn new() -> Self {
        Self
    }

    fn locate(path: &Path, key: &str) -> PathBuf {
        match path.is_dir() {
            true => path.join(format!("{key}.{EXTENSION}")),
            false => path.to_path_buf(),
        }
    }
}

impl TableReader for ParquetStore {
    #[instrument(level = "debug", skip(self, path), fields(path = %path.display()))]
    fn read_table(&self, path: &Path, key: &str) -> Result<Table> {
        let location = Self::locate(path, key);
        let file = fs::open(&location)?;
        let builder =
            ParquetRecordBatchReaderBuilder::try_new(file).or_raise(|| ErrorKind::Format(location.clone()))?;

        let lookup = |name: &str| {
            builder
                .metadata()
                .file_metadata()
                .key_value_metadata()
                .and_then(|entries| entries.iter().find(|entry| entry.key == name))
                .and_then(|entry| entry.value.clone())
        };
        if lookup(TABLE_KEY_METADATA).as_deref() != Some(key) {
            exn::bail!(ErrorKind::MissingKey { path: location, key: key.to_string() });
        }
        let index: Vec<String> = match lookup(INDEX_METADATA) {
            Some(json) => serde_json::from_str(&json).or_raise(|| ErrorKind::Format(location.clone()))?,
            None => Vec::new(),
        };

        let schema = builder.schema().clone();
        let reader = builder.build().or_raise(|| ErrorKind::Format(location.clone()))?;
        let batches = reader
            .collect::<std::result::Result<Vec<_>, _>>()
            .or_raise(|| ErrorKind::Format(location.clone()))?;
        let batch = concat_batches(&schema, &batches).or_raise(|| ErrorKind::Format(location.clone()))?;
        Table::new(batch, index)
    }
}

impl TableWriter for ParquetStore {
    #[instrument(level = "debug", skip(self, path, table), fields(path = %path.display(), rows = table.num_rows()))]
    fn write_table(&self, path: &Path, key: &str, table: &Table) -> Result<()> {
        let location = Self::locate(path, key);
        let index = serde_json::to_string(table.index_names()).or_raise(|| ErrorKind::InvalidData)?;
        let props = WriterProperties::builder()
            .set_key_value_metadata(Some(vec![
                KeyValue::new(TABLE_KEY_METADATA.to_string(), key.to_string()),
                KeyValue::new(INDEX_METADATA.to_string(), index),
            ]))
            .build();
        let file = fs::create(&location)?;
        let mut writer =
            ArrowWriter::try_new(file, table.schema(), Some(props)).or_raise(|| ErrorKind::Format(location.clone()))?;
        writer.write(table.batch()).or_raise(|| ErrorKind::Format(location.clone()))?;
        writer.close().or_raise(|| ErrorKind::Format(location.clone()))?;
        Ok(())
    }
}
