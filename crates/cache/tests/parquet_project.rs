//! End-to-end: a project laid out on disk as CSV manifest plus Parquet files.

use arrow::array::{Array, ArrayRef, AsArray, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::Float64Type;
use behavior_cache::error::ErrorKind;
use behavior_cache::{FileCategory, ProjectCache};
use behavior_config::CacheConfig;
use behavior_table::csv::write_csv;
use behavior_table::error::ErrorKind as TableErrorKind;
use behavior_table::{ParquetStore, Table, TableWriter};
use rstest::{fixture, rstest};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn i64s(values: &[i64]) -> ArrayRef {
    Arc::new(Int64Array::from(values.to_vec()))
}

fn f64s(values: &[f64]) -> ArrayRef {
    Arc::new(Float64Array::from(values.to_vec()))
}

fn bools(values: &[bool]) -> ArrayRef {
    Arc::new(BooleanArray::from(values.to_vec()))
}

fn strs(values: &[&str]) -> ArrayRef {
    Arc::new(StringArray::from(values.to_vec()))
}

/// Writes every file of one experiment, as the analysis pipeline would.
fn write_experiment(cache: &ProjectCache, experiment_id: u64, container_id: i64) {
    let store = ParquetStore::new();
    let nwb = cache.path_for(experiment_id, FileCategory::Nwb);
    std::fs::create_dir_all(&nwb).unwrap();

    let trials = Table::from_columns(
        &["trials_id"],
        [("trials_id", i64s(&[0, 1])), ("change_time", f64s(&[2.25, 8.5])), ("hit", bools(&[true, false]))],
    )
    .unwrap();
    let presentations = Table::from_columns(
        &["stimulus_presentations_id"],
        [
            ("stimulus_presentations_id", i64s(&[0, 1, 2])),
            ("image_index", i64s(&[3, 3, 5])),
            ("image_name", strs(&["im061", "im061", "im062"])),
            ("omitted", bools(&[false, true, false])),
        ],
    )
    .unwrap();
    let metadata = Table::from_columns(
        &[],
        [
            ("ophys_experiment_id", i64s(&[experiment_id as i64])),
            ("experiment_container_id", i64s(&[container_id])),
        ],
    )
    .unwrap();
    store.write_table(&nwb, "trials", &trials).unwrap();
    store.write_table(&nwb, "stimulus_presentations", &presentations).unwrap();
    store.write_table(&nwb, "metadata", &metadata).unwrap();

    let extended = Table::from_columns(
        &["stimulus_presentations_id"],
        [
            ("stimulus_presentations_id", i64s(&[0, 1, 2])),
            ("omitted", bools(&[false, true, false])),
            ("change", bools(&[false, false, true])),
        ],
    )
    .unwrap();
    let trial_response = Table::from_columns(
        &["trial_id", "cell_specimen_id"],
        [
            ("trial_id", i64s(&[0, 1, 1])),
            ("cell_specimen_id", i64s(&[100, 100, 101])),
            ("mean_response", f64s(&[0.5, 0.25, 0.75])),
        ],
    )
    .unwrap();
    let flash_response = Table::from_columns(
        &["flash_id", "cell_specimen_id"],
        [("flash_id", i64s(&[0])), ("cell_specimen_id", i64s(&[100])), ("mean_response", f64s(&[0.125]))],
    )
    .unwrap();
    let analysis = |category| cache.path_for(experiment_id, category);
    store.write_table(&analysis(FileCategory::ExtendedStimulusPresentations), "df", &extended).unwrap();
    store.write_table(&analysis(FileCategory::TrialResponse), "df", &trial_response).unwrap();
    store.write_table(&analysis(FileCategory::FlashResponse), "df", &flash_response).unwrap();
}

fn write_manifest(path: &Path, rows: &[(i64, i64)]) {
    let experiments: Vec<i64> = rows.iter().map(|(experiment, _)| *experiment).collect();
    let containers: Vec<i64> = rows.iter().map(|(_, container)| *container).collect();
    let positions: Vec<i64> = (0..rows.len() as i64).collect();
    let manifest = Table::from_columns(
        &["Unnamed: 0"],
        [("Unnamed: 0", i64s(&positions)), ("ophys_experiment_id", i64s(&experiments)), ("container_id", i64s(&containers))],
    )
    .unwrap();
    write_csv(path, &manifest).unwrap();
}

struct Project {
    dir: TempDir,
    cache: ProjectCache,
}

#[fixture]
fn project() -> Project {
    let dir = tempfile::tempdir().unwrap();
    let manifest_path = dir.path().join("visual_behavior_data_manifest.csv");
    write_manifest(&manifest_path, &[(1, 7), (2, 7), (3, 9)]);
    let nwb = dir.path().join("nwb_files");
    let analysis = dir.path().join("analysis_files");
    std::fs::create_dir_all(&nwb).unwrap();
    std::fs::create_dir_all(&analysis).unwrap();

    let cache = ProjectCache::new(CacheConfig::new(manifest_path, nwb, analysis)).unwrap();
    write_experiment(&cache, 1, 7);
    write_experiment(&cache, 2, 7);
    Project { dir, cache }
}

#[rstest]
fn test_container_sessions_from_disk(project: Project) {
    let sessions = project.cache.get_container_sessions(7).unwrap();
    let ids: Vec<u64> = sessions.iter().map(|session| session.metadata().unwrap().ophys_experiment_id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[rstest]
fn test_session_tables_from_disk(project: Project) {
    let session = project.cache.get_session(1);

    let presentations = session.stimulus_presentations().unwrap();
    assert_eq!(presentations.num_rows(), 3);
    assert_eq!(presentations.index_names(), ["stimulus_presentations_id"]);
    assert_eq!(presentations.column_names().iter().filter(|name| **name == "omitted").count(), 1);
    assert!(presentations.column("change").unwrap().as_boolean().value(2));

    let responses = session.trial_response_df().unwrap();
    assert_eq!(responses.num_rows(), 3);
    let change_time = responses.column("change_time").unwrap().as_primitive::<Float64Type>();
    assert_eq!(change_time.values().to_vec(), vec![2.25, 8.5, 8.5]);
    assert_eq!(change_time.null_count(), 0);

    assert_eq!(session.flash_response_df().unwrap().index_names(), ["flash_id", "cell_specimen_id"]);
    assert_eq!(
        session.image_index().unwrap(),
        &BTreeMap::from([(3, "im061".to_string()), (5, "im062".to_string())])
    );
}

#[rstest]
fn test_missing_files_surface_on_access(project: Project) {
    let sessions = project.cache.get_container_sessions(9).unwrap();
    assert_eq!(sessions.len(), 1);
    let err = sessions[0].flash_response_df().unwrap_err();
    assert!(matches!(*err, ErrorKind::Table(TableErrorKind::NotFound(_))), "unexpected error: {err:?}");
}

#[rstest]
fn test_cache_from_config_file(project: Project) {
    let config = project.cache.config();
    let path = project.dir.path().join("cache.json");
    let json = format!(
        r#"{{"manifest_path": {:?}, "nwb_base_dir": {:?}, "analysis_files_base_dir": {:?}}}"#,
        config.manifest_path, config.nwb_base_dir, config.analysis_files_base_dir,
    );
    std::fs::write(&path, json).unwrap();

    let cache = ProjectCache::from_config_file(&path).unwrap();
    assert_eq!(cache.experiment_ids().unwrap(), vec![1, 2, 3]);
    assert_eq!(cache.container_experiment_ids(9).unwrap(), vec![3]);
}
