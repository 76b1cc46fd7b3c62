//! Index-aligned left joins.

use crate::Table;
use crate::error::{ErrorKind, Result};
use arrow::array::{Array, UInt32Array};
use arrow::compute::{cast, take};
use arrow::datatypes::{DataType, FieldRef, Schema};
use arrow::record_batch::RecordBatch;
use arrow::row::{RowConverter, SortField};
use exn::{OptionExt, ResultExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::instrument;

impl Table {
    /// Left-join the data columns of `other` onto this table's index.
    ///
    /// `other` must have exactly one index level. The join key on this side
    /// is the single index level when there is only one, or the level sharing
    /// `other`'s index name when this table has several.
    ///
    /// The result has exactly the rows of `self`, in the same order, with the
    /// same index. Rows without a match get nulls in every joined column;
    /// rows of `other` that match nothing are dropped. When `other` repeats a
    /// key, its first row for that key is used.
    ///
    /// Returns [`ErrorKind::ColumnOverlap`] if any data column of `other` is
    /// already a column of `self`: drop the collision before joining.
    #[instrument(level = "debug", skip_all, fields(left_rows = self.num_rows(), right_rows = other.num_rows()))]
    pub fn left_join(&self, other: &Table) -> Result<Table> {
        let right_key_name = match other.index_names() {
            [name] => name.as_str(),
            levels => exn::bail!(ErrorKind::InvalidIndex(format!(
                "joined table needs exactly one index level, found {}",
                levels.len()
            ))),
        };
        let left_key_name = match self.index_names() {
            [only] => only.as_str(),
            levels => levels
                .iter()
                .find(|level| *level == right_key_name)
                .map(String::as_str)
                .ok_or_raise(|| ErrorKind::InvalidIndex(format!("no index level named '{right_key_name}'")))?,
        };

        let existing: HashSet<&str> = self.column_names().into_iter().collect();
        let overlap: Vec<&str> = other.data_column_names().into_iter().filter(|c| existing.contains(c)).collect();
        if !overlap.is_empty() {
            exn::bail!(ErrorKind::ColumnOverlap(overlap.join(", ")));
        }

        let left_key = self.column(left_key_name)?;
        let right_key = other.column(right_key_name)?;
        let key_type = common_key_type(left_key.data_type(), right_key.data_type());
        let left_key = cast(left_key.as_ref(), &key_type).or_raise(|| ErrorKind::InvalidData)?;
        let right_key = cast(right_key.as_ref(), &key_type).or_raise(|| ErrorKind::InvalidData)?;
        // Encode both keys with the same converter so rows compare byte-wise.
        let converter = RowConverter::new(vec![SortField::new(key_type)]).or_raise(|| ErrorKind::InvalidData)?;
        let left_rows = converter.convert_columns(&[left_key.clone()]).or_raise(|| ErrorKind::InvalidData)?;
        let right_rows = converter.convert_columns(&[right_key.clone()]).or_raise(|| ErrorKind::InvalidData)?;

        let mut lookup = HashMap::with_capacity(right_rows.num_rows());
        for (position, row) in right_rows.iter().enumerate() {
            if right_key.is_null(position) {
                continue;
            }
            let position = u32::try_from(position).or_raise(|| ErrorKind::InvalidData)?;
            lookup.entry(row).or_insert(position);
        }
        let indices: UInt32Array = (0..self.num_rows())
            .map(|i| match left_key.is_null(i) {
                true => None,
                false => lookup.get(&left_rows.row(i)).copied(),
            })
            .collect();

        let left_schema = self.schema();
        let right_schema = other.schema();
        let mut fields: Vec<FieldRef> = left_schema.fields().iter().cloned().collect();
        let mut columns = self.batch().columns().to_vec();
        for name in other.data_column_names() {
            let (position, field) = right_schema
                .column_with_name(name)
                .ok_or_raise(|| ErrorKind::MissingColumn(name.to_string()))?;
            fields.push(Arc::new(field.clone().with_nullable(true)));
            columns.push(take(other.batch().column(position).as_ref(), &indices, None).or_raise(|| ErrorKind::InvalidData)?);
        }
        let schema = Schema::new_with_metadata(fields, left_schema.metadata().clone());
        let batch = RecordBatch::try_new(Arc::new(schema), columns).or_raise(|| ErrorKind::InvalidData)?;
        Table::new(batch, self.index_names().iter().cloned())
    }
}

/// The type both join keys are compared as.
///
/// Mixed numeric keys widen instead of casting one side onto the other, so
/// a float key is never truncated onto an integer one.
fn common_key_type(left: &DataType, right: &DataType) -> DataType {
    if left == right {
        left.clone()
    } else if left.is_floating() || right.is_floating() {
        DataType::Float64
    } else if left.is_integer() && right.is_integer() {
        DataType::Int64
    } else {
        left.clone()
    }
}
