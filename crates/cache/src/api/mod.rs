//! Read APIs for one experiment's session data.
//!
//! [`BehaviorApi`] is the base surface: the tables every session file
//! carries. [`AnalysisApi`] adds the precomputed analysis tables that live
//! in separate files. [`NwbApi`] implements the former over a primary
//! session file; [`DataApi`] wraps any base API to provide the latter.

mod data;
mod nwb;

pub use self::data::{DERIVED_TABLE_KEY, DataApi, OMITTED_COLUMN};
pub use self::nwb::{METADATA_KEY, NwbApi, STIMULUS_PRESENTATIONS_KEY, TRIALS_KEY};
use crate::error::{ErrorKind, Result};
use arrow::array::Array;
use behavior_table::Table;
use exn::OptionExt;

pub trait BehaviorApi {
    fn get_trials(&self) -> Result<Table>;
    fn get_stimulus_presentations(&self) -> Result<Table>;
    fn get_metadata(&self) -> Result<SessionMetadata>;
}

pub trait AnalysisApi: BehaviorApi {
    fn get_trial_response_df(&self) -> Result<Table>;
    fn get_flash_response_df(&self) -> Result<Table>;
    fn get_extended_stimulus_presentations_df(&self) -> Result<Table>;
}

impl<A: BehaviorApi + ?Sized> BehaviorApi for &A {
    fn get_trials(&self) -> Result<Table> {
        (**self).get_trials()
    }

    fn get_stimulus_presentations(&self) -> Result<Table> {
        (**self).get_stimulus_presentations()
    }

    fn get_metadata(&self) -> Result<SessionMetadata> {
        (**self).get_metadata()
    }
}

impl<A: AnalysisApi + ?Sized> AnalysisApi for &A {
    fn get_trial_response_df(&self) -> Result<Table> {
        (**self).get_trial_response_df()
    }

    fn get_flash_response_df(&self) -> Result<Table> {
        (**self).get_flash_response_df()
    }

    fn get_extended_stimulus_presentations_df(&self) -> Result<Table> {
        (**self).get_extended_stimulus_presentations_df()
    }
}

/// Descriptive fields of one experiment, taken from the first row of the
/// session's `metadata` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMetadata {
    pub ophys_experiment_id: u64,
    pub experiment_container_id: Option<u64>,
    pub session_type: Option<String>,
    pub rig_name: Option<String>,
}

impl SessionMetadata {
    /// Read the first row of a metadata table.
    ///
    /// `ophys_experiment_id` must be present and non-null; the other fields
    /// are optional columns.
    pub fn from_table(table: &Table) -> Result<Self> {
        if table.num_rows() == 0 {
            exn::bail!(ErrorKind::InvalidMetadata("metadata table is empty".to_string()));
        }
        let id = |column: &str| -> Result<Option<u64>> {
            if !table.has_column(column) {
                return Ok(None);
            }
            let values = table.i64_column(column).map_err(ErrorKind::table)?;
            if values.is_null(0) {
                return Ok(None);
            }
            let value = values.value(0);
            let id = u64::try_from(value)
                .ok()
                .ok_or_raise(|| ErrorKind::InvalidMetadata(format!("{column} is negative: {value}")))?;
            Ok(Some(id))
        };
        let text = |column: &str| -> Result<Option<String>> {
            if !table.has_column(column) {
                return Ok(None);
            }
            let values = table.string_column(column).map_err(ErrorKind::table)?;
            Ok(values.is_valid(0).then(|| values.value(0).to_string()))
        };
        Ok(Self {
            ophys_experiment_id: id("ophys_experiment_id")?
                .ok_or_raise(|| ErrorKind::InvalidMetadata("ophys_experiment_id is missing".to_string()))?,
            experiment_container_id: id("experiment_container_id")?,
            session_type: text("session_type")?,
            rig_name: text("rig_name")?,
        })
    }
}
