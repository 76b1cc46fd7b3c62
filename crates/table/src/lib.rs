//! Indexed tables for behavior project data.
//!
//! Analysis tables (trials, stimulus presentations, per-cell responses) are
//! dataframes with a meaningful index: joins line rows up by index value,
//! not by position. This crate wraps Arrow [`RecordBatch`]es in a [`Table`]
//! that remembers which columns form the index, and provides the handful of
//! dataframe operations the project cache needs:
//!
//! - index-aligned left joins ([`Table::left_join`]),
//! - dropping data columns and renaming index levels,
//! - integer filtering and "first value per group" reductions,
//! - CSV manifests ([`csv`]) and keyed table stores ([`store`]).
//!
//! [`RecordBatch`]: arrow::record_batch::RecordBatch

pub mod csv;
pub mod error;
mod fs;
mod group;
mod join;
pub mod store;
mod table;

pub use crate::store::{ParquetStore, TableReader, TableWriter};
pub use crate::table::Table;
