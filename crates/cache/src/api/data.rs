use super::{AnalysisApi, BehaviorApi, SessionMetadata};
use crate::error::{ErrorKind, Result};
use crate::paths::SessionPaths;
use behavior_table::{Table, TableReader};
use std::path::Path;
use tracing::instrument;

/// Key every derived analysis table is stored under.
pub const DERIVED_TABLE_KEY: &str = "df";
/// Column present in both stimulus presentation tables; the base copy wins.
pub const OMITTED_COLUMN: &str = "omitted";

/// A base API extended with readers for the derived analysis tables.
///
/// Trials and metadata come straight from the base API. Stimulus
/// presentations are the base table with the extended presentation columns
/// left-joined onto its index.
#[derive(Debug, Clone)]
pub struct DataApi<B, R> {
    base: B,
    reader: R,
    paths: SessionPaths,
}

impl<B: BehaviorApi, R: TableReader> DataApi<B, R> {
    pub fn new(base: B, reader: R, paths: SessionPaths) -> Self {
        Self { base, reader, paths }
    }

    pub fn base(&self) -> &B {
        &self.base
    }

    pub fn paths(&self) -> &SessionPaths {
        &self.paths
    }

    #[instrument(level = "debug", skip(self, path), fields(path = %path.display()))]
    fn read_derived(&self, path: &Path) -> Result<Table> {
        self.reader.read_table(path, DERIVED_TABLE_KEY).map_err(ErrorKind::table)
    }
}

impl<B: BehaviorApi, R: TableReader> BehaviorApi for DataApi<B, R> {
    fn get_trials(&self) -> Result<Table> {
        self.base.get_trials()
    }

    /// Base presentations with the extended presentation columns joined on.
    ///
    /// The extended table's `omitted` column is dropped before the join; an
    /// extended table without one is a
    /// [`MissingColumn`](behavior_table::error::ErrorKind::MissingColumn)
    /// error. The result keeps exactly the base rows, in order; rows without
    /// extended data get nulls in the joined columns.
    #[instrument(level = "debug", skip(self))]
    fn get_stimulus_presentations(&self) -> Result<Table> {
        let presentations = self.base.get_stimulus_presentations()?;
        let extended = self
            .get_extended_stimulus_presentations_df()?
            .drop_columns(&[OMITTED_COLUMN])
            .map_err(ErrorKind::table)?;
        let joined = presentations.left_join(&extended).map_err(ErrorKind::table)?;
        tracing::debug!(rows = joined.num_rows(), columns = joined.column_names().len(), "Joined stimulus presentations");
        Ok(joined)
    }

    fn get_metadata(&self) -> Result<SessionMetadata> {
        self.base.get_metadata()
    }
}

impl<B: BehaviorApi, R: TableReader> AnalysisApi for DataApi<B, R> {
    fn get_trial_response_df(&self) -> Result<Table> {
        self.read_derived(&self.paths.trial_response)
    }

    fn get_flash_response_df(&self) -> Result<Table> {
        self.read_derived(&self.paths.flash_response)
    }

    fn get_extended_stimulus_presentations_df(&self) -> Result<Table> {
        self.read_derived(&self.paths.extended_stimulus_presentations)
    }
}
