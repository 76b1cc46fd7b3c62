//! The [`Table`] type: an Arrow record batch with named index columns.

use crate::error::{ErrorKind, Result};
use arrow::array::{Array, ArrayRef, AsArray, Int64Array, StringArray};
use arrow::compute::kernels::cmp::eq;
use arrow::compute::{cast, filter_record_batch};
use arrow::datatypes::{DataType, Field, Float64Type, Int64Type, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use exn::{OptionExt, ResultExt};
use std::collections::HashSet;
use std::sync::Arc;

/// An immutable, column-oriented table with zero or more index levels.
///
/// Index levels are ordinary columns of the underlying [`RecordBatch`] whose
/// names are listed in [`index_names`](Self::index_names); they play the part
/// of a dataframe index. Every other column is a *data column*. All
/// transforms return a new table and leave `self` untouched, so handing out
/// a "copy" of a table is just a clone of two reference-counted handles.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    batch: RecordBatch,
    index: Vec<String>,
}

impl Table {
    /// Wrap a record batch, marking the given columns as index levels.
    ///
    /// Returns [`ErrorKind::MissingColumn`] if an index level is not a column
    /// of the batch, or [`ErrorKind::InvalidIndex`] if a level is repeated.
    pub fn new(batch: RecordBatch, index: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        let index: Vec<String> = index.into_iter().map(Into::into).collect();
        let mut seen = HashSet::new();
        for level in &index {
            if batch.schema().column_with_name(level).is_none() {
                exn::bail!(ErrorKind::MissingColumn(level.clone()));
            }
            if !seen.insert(level.as_str()) {
                exn::bail!(ErrorKind::InvalidIndex(format!("index level '{level}' is repeated")));
            }
        }
        Ok(Self { batch, index })
    }

    /// Build a table from named columns; convenient for small in-memory tables.
    pub fn from_columns(
        index: &[&str],
        columns: impl IntoIterator<Item = (impl AsRef<str>, ArrayRef)>,
    ) -> Result<Self> {
        let batch = RecordBatch::try_from_iter(columns).or_raise(|| ErrorKind::InvalidData)?;
        Self::new(batch, index.iter().copied())
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Names of the index levels, outermost first.
    pub fn index_names(&self) -> &[String] {
        &self.index
    }

    fn is_index(&self, name: &str) -> bool {
        self.index.iter().any(|level| level == name)
    }

    /// Every column name in batch order, index levels included.
    pub fn column_names(&self) -> Vec<&str> {
        self.batch.schema_ref().fields().iter().map(|f| f.name().as_str()).collect()
    }

    /// Column names that are not index levels, in batch order.
    pub fn data_column_names(&self) -> Vec<&str> {
        self.column_names().into_iter().filter(|name| !self.is_index(name)).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.batch.column_by_name(name).is_some()
    }

    /// Look up a column (index level or data column) by name.
    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        self.batch.column_by_name(name).ok_or_raise(|| ErrorKind::MissingColumn(name.to_string()))
    }

    /// Read a column as 64-bit integers, casting numeric columns as needed.
    ///
    /// Values that cannot be represented exactly (overflow, non-numeric
    /// strings, floats with a fractional part) become nulls. Floats are never
    /// truncated.
    pub fn i64_column(&self, name: &str) -> Result<Int64Array> {
        let column = self.column(name)?;
        let values = cast(column.as_ref(), &DataType::Int64).or_raise(|| ErrorKind::InvalidData)?;
        let values = values.as_primitive::<Int64Type>().clone();
        if !column.data_type().is_floating() {
            return Ok(values);
        }
        let floats = cast(column.as_ref(), &DataType::Float64).or_raise(|| ErrorKind::InvalidData)?;
        let floats = floats.as_primitive::<Float64Type>();
        Ok(values
            .iter()
            .zip(floats.iter())
            .map(|(value, float)| value.filter(|_| float.is_some_and(|float| float.fract() == 0.0)))
            .collect())
    }

    /// Like [`i64_column`](Self::i64_column), but a non-null value that has
    /// no exact integer form is an [`ErrorKind::NotInteger`] instead of a null.
    pub fn exact_i64_column(&self, name: &str) -> Result<Int64Array> {
        let values = self.i64_column(name)?;
        if values.null_count() != self.column(name)?.null_count() {
            exn::bail!(ErrorKind::NotInteger(name.to_string()));
        }
        Ok(values)
    }

    /// Read a column as UTF-8 strings, casting if needed.
    pub fn string_column(&self, name: &str) -> Result<StringArray> {
        let column = self.column(name)?;
        let cast = cast(column.as_ref(), &DataType::Utf8).or_raise(|| ErrorKind::InvalidData)?;
        Ok(cast.as_string::<i32>().clone())
    }

    /// Return a copy of the table without the named data columns.
    ///
    /// Every name must be an existing data column; index levels cannot be
    /// dropped this way.
    pub fn drop_columns(&self, names: &[&str]) -> Result<Table> {
        for name in names {
            if !self.has_column(name) || self.is_index(name) {
                exn::bail!(ErrorKind::MissingColumn(name.to_string()));
            }
        }
        let keep: Vec<usize> = self
            .column_names()
            .iter()
            .enumerate()
            .filter(|(_, name)| !names.contains(*name))
            .map(|(i, _)| i)
            .collect();
        let batch = self.batch.project(&keep).or_raise(|| ErrorKind::InvalidData)?;
        Ok(Table { batch, index: self.index.clone() })
    }

    /// Return a copy of the table with its index levels renamed.
    ///
    /// `names` must supply one name per level. Renaming a level onto the
    /// name of another existing column is rejected.
    pub fn rename_index(&self, names: &[&str]) -> Result<Table> {
        if names.len() != self.index.len() {
            exn::bail!(ErrorKind::InvalidIndex(format!(
                "expected {} index names, got {}",
                self.index.len(),
                names.len()
            )));
        }
        let schema = self.batch.schema();
        let fields: Vec<Field> = schema
            .fields()
            .iter()
            .map(|field| match self.index.iter().position(|level| level == field.name()) {
                Some(level) => field.as_ref().clone().with_name(names[level]),
                None => field.as_ref().clone(),
            })
            .collect();
        let mut seen = HashSet::new();
        if let Some(duplicate) = fields.iter().find(|f| !seen.insert(f.name().as_str())) {
            exn::bail!(ErrorKind::InvalidIndex(format!("renamed index collides with column '{}'", duplicate.name())));
        }
        let schema = Schema::new_with_metadata(fields, schema.metadata().clone());
        let batch =
            RecordBatch::try_new(Arc::new(schema), self.batch.columns().to_vec()).or_raise(|| ErrorKind::InvalidData)?;
        Ok(Table { batch, index: names.iter().map(|n| n.to_string()).collect() })
    }

    /// Keep only the rows whose integer column equals `value`, in table order.
    ///
    /// Rows where the column is null never match.
    pub fn filter_eq_i64(&self, column: &str, value: i64) -> Result<Table> {
        let values = self.i64_column(column)?;
        let mask = eq(&values, &Int64Array::new_scalar(value)).or_raise(|| ErrorKind::InvalidData)?;
        let batch = filter_record_batch(&self.batch, &mask).or_raise(|| ErrorKind::InvalidData)?;
        Ok(Table { batch, index: self.index.clone() })
    }
}
