//! CSV tables, written with an unnamed leading index column.
//!
//! Dataframe libraries commonly write their index as the first CSV column
//! with an empty header. Empty header names are read back as
//! `Unnamed: {position}` so the index column can be selected by name
//! ([`UNNAMED_INDEX`] for the usual case).

use crate::Table;
use crate::error::{ErrorKind, Result};
use crate::fs;
use arrow::compute::concat_batches;
use arrow::datatypes::{Field, Schema};
use arrow_csv::reader::Format;
use arrow_csv::{ReaderBuilder, WriterBuilder};
use exn::ResultExt;
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

/// Name given to an unnamed first column.
pub const UNNAMED_INDEX: &str = "Unnamed: 0";
// Enough rows to settle integer vs float vs string for manifest-sized files.
const INFER_RECORDS: usize = 1000;

fn unnamed(schema: Schema) -> Schema {
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(position, field)| match field.name().trim().is_empty() {
            true => field.as_ref().clone().with_name(format!("Unnamed: {position}")),
            false => field.as_ref().clone(),
        })
        .collect();
    Schema::new_with_metadata(fields, schema.metadata().clone())
}

/// Read a CSV file with a header row into a [`Table`].
///
/// Column types are inferred. When `index` is given, that column becomes
/// the table's single index level and must exist.
#[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_csv(path: impl AsRef<Path>, index: Option<&str>) -> Result<Table> {
    let path = path.as_ref();
    let mut file = fs::open(path)?;
    let format = Format::default().with_header(true);
    let (schema, _) = format.infer_schema(&mut file, Some(INFER_RECORDS)).or_raise(|| ErrorKind::Format(path.to_path_buf()))?;
    file.seek(SeekFrom::Start(0)).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
    let schema = Arc::new(unnamed(schema));
    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .build(file)
        .or_raise(|| ErrorKind::Format(path.to_path_buf()))?;
    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .or_raise(|| ErrorKind::Format(path.to_path_buf()))?;
    let batch = concat_batches(&schema, &batches).or_raise(|| ErrorKind::Format(path.to_path_buf()))?;
    Table::new(batch, index)
}

/// Write a table (index levels included, in column order) as CSV with a header.
#[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display(), rows = table.num_rows()))]
pub fn write_csv(path: impl AsRef<Path>, table: &Table) -> Result<()> {
    let path = path.as_ref();
    let file = fs::create(path)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(table.batch()).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
    Ok(())
}
