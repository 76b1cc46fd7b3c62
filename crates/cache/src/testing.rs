//! Small session tables shared by the unit tests.

use crate::paths::SessionPaths;
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use behavior_table::Table;
use behavior_table::store::MemoryStore;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

pub(crate) const EXPERIMENT_ID: u64 = 880961028;

pub(crate) fn i64s(values: &[i64]) -> ArrayRef {
    Arc::new(Int64Array::from(values.to_vec()))
}

pub(crate) fn f64s(values: &[f64]) -> ArrayRef {
    Arc::new(Float64Array::from(values.to_vec()))
}

pub(crate) fn bools(values: &[bool]) -> ArrayRef {
    Arc::new(BooleanArray::from(values.to_vec()))
}

pub(crate) fn strs(values: &[&str]) -> ArrayRef {
    Arc::new(StringArray::from(values.to_vec()))
}

pub(crate) fn trials() -> Table {
    Table::from_columns(
        &["trials_id"],
        [
            ("trials_id", i64s(&[0, 1, 2])),
            ("change_time", f64s(&[1.5, 9.0, 17.25])),
            ("hit", bools(&[true, false, true])),
        ],
    )
    .unwrap()
}

pub(crate) fn stimulus_presentations() -> Table {
    Table::from_columns(
        &["stimulus_presentations_id"],
        [
            ("stimulus_presentations_id", i64s(&[0, 1, 2, 3])),
            ("image_index", i64s(&[0, 1, 0, 1])),
            ("image_name", strs(&["im065", "im077", "im065", "im077"])),
            ("omitted", bools(&[false, false, false, true])),
        ],
    )
    .unwrap()
}

/// Covers presentations 0..=2, misses 3 and adds an unmatched 9.
pub(crate) fn extended_stimulus_presentations() -> Table {
    Table::from_columns(
        &["stimulus_presentations_id"],
        [
            ("stimulus_presentations_id", i64s(&[0, 1, 2, 9])),
            ("omitted", bools(&[false, false, false, false])),
            ("change", bools(&[false, true, false, true])),
            ("mean_running_speed", f64s(&[12.5, 3.0, 0.0, 7.75])),
        ],
    )
    .unwrap()
}

/// Two index levels; trial 5 has no matching trial.
pub(crate) fn trial_response() -> Table {
    Table::from_columns(
        &["trial_id", "cell_specimen_id"],
        [
            ("trial_id", i64s(&[0, 0, 1, 5])),
            ("cell_specimen_id", i64s(&[10, 11, 10, 10])),
            ("mean_response", f64s(&[0.25, 0.5, 0.125, 1.0])),
        ],
    )
    .unwrap()
}

pub(crate) fn flash_response() -> Table {
    Table::from_columns(
        &["flash_id"],
        [("flash_id", i64s(&[0, 1])), ("mean_response", f64s(&[0.1, 0.2]))],
    )
    .unwrap()
}

pub(crate) fn metadata(experiment_id: i64, container_id: i64) -> Table {
    Table::from_columns(
        &[],
        [
            ("ophys_experiment_id", i64s(&[experiment_id])),
            ("experiment_container_id", i64s(&[container_id])),
            ("session_type", strs(&["OPHYS_1_images_A"])),
            ("rig_name", strs(&["CAM2P.5"])),
        ],
    )
    .unwrap()
}

pub(crate) fn paths(experiment_id: u64) -> SessionPaths {
    SessionPaths::new(Path::new("/nwb"), Path::new("/analysis"), experiment_id)
}

/// A store holding every table of one experiment at its usual paths.
pub(crate) fn populated_store(experiment_id: u64) -> Rc<MemoryStore> {
    let paths = paths(experiment_id);
    Rc::new(MemoryStore::with_tables([
        (paths.nwb.clone(), "trials", trials()),
        (paths.nwb.clone(), "stimulus_presentations", stimulus_presentations()),
        (paths.nwb.clone(), "metadata", metadata(experiment_id as i64, 7)),
        (paths.trial_response.clone(), "df", trial_response()),
        (paths.flash_response.clone(), "df", flash_response()),
        (paths.extended_stimulus_presentations.clone(), "df", extended_stimulus_presentations()),
    ]))
}
