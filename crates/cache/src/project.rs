//! The project cache: experiment manifest plus file layout.

use crate::api::{DataApi, NwbApi};
use crate::error::{ErrorKind, Result};
use crate::paths::{FileCategory, SessionPaths};
use crate::session::ExtendedSession;
use arrow::array::Array;
use behavior_config::CacheConfig;
use behavior_table::csv::{UNNAMED_INDEX, read_csv};
use behavior_table::{ParquetStore, Table, TableReader};
use exn::{OptionExt, ResultExt};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Manifest column holding each experiment's id.
pub const EXPERIMENT_ID_COLUMN: &str = "ophys_experiment_id";
/// Manifest column grouping experiments into containers.
pub const CONTAINER_ID_COLUMN: &str = "container_id";

/// A session as handed out by [`ProjectCache`].
pub type Session<R = ParquetStore> = ExtendedSession<DataApi<NwbApi<R>, R>>;

/// Entry point for a project's experiments.
///
/// The manifest is read once, when the cache is built. Sessions are cheap to
/// create: nothing is read from their files until a table is first asked for.
#[derive(Debug, Clone)]
pub struct ProjectCache<R = ParquetStore> {
    config: CacheConfig,
    manifest: Table,
    reader: R,
}

impl ProjectCache<ParquetStore> {
    pub fn new(config: CacheConfig) -> Result<Self> {
        Self::with_reader(config, ParquetStore::new())
    }

    /// Build a cache from a JSON, YAML or TOML configuration file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = CacheConfig::load(path).map_err(ErrorKind::config)?;
        Self::new(config)
    }
}

impl<R: TableReader + Clone> ProjectCache<R> {
    /// Read the manifest and build a cache whose sessions use `reader`.
    #[instrument(skip_all, fields(manifest = %config.manifest_path.display()))]
    pub fn with_reader(config: CacheConfig, reader: R) -> Result<Self> {
        let manifest = load_manifest(&config.manifest_path)?;
        tracing::info!(experiments = manifest.num_rows(), "Loaded project manifest");
        Ok(Self { config, manifest, reader })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn manifest(&self) -> &Table {
        &self.manifest
    }

    /// Where the file of one category for one experiment lives. The file is
    /// not checked for existence.
    pub fn path_for(&self, experiment_id: u64, category: FileCategory) -> PathBuf {
        category.path(&self.config.nwb_base_dir, &self.config.analysis_files_base_dir, experiment_id)
    }

    pub fn session_paths(&self, experiment_id: u64) -> SessionPaths {
        SessionPaths::new(&self.config.nwb_base_dir, &self.config.analysis_files_base_dir, experiment_id)
    }

    /// Build a session for one experiment.
    ///
    /// Neither the manifest nor the files are consulted; a missing file
    /// surfaces when the session first reads from it.
    #[instrument(level = "debug", skip(self))]
    pub fn get_session(&self, experiment_id: u64) -> Session<R> {
        let paths = self.session_paths(experiment_id);
        let base = NwbApi::new(paths.nwb.clone(), self.reader.clone());
        ExtendedSession::new(DataApi::new(base, self.reader.clone(), paths))
    }

    /// Every experiment id, in manifest order.
    pub fn experiment_ids(&self) -> Result<Vec<u64>> {
        experiment_ids(&self.manifest)
    }

    /// Ids of the experiments in one container, in manifest order.
    ///
    /// Returns [`ErrorKind::ContainerNotFound`] if no manifest row belongs
    /// to the container.
    pub fn container_experiment_ids(&self, container_id: u64) -> Result<Vec<u64>> {
        let value = i64::try_from(container_id).or_raise(|| ErrorKind::ContainerNotFound(container_id))?;
        let rows = self.manifest.filter_eq_i64(CONTAINER_ID_COLUMN, value).map_err(ErrorKind::table)?;
        if rows.num_rows() == 0 {
            exn::bail!(ErrorKind::ContainerNotFound(container_id));
        }
        experiment_ids(&rows)
    }

    /// One session per experiment in the container, in manifest order.
    #[instrument(skip(self))]
    pub fn get_container_sessions(&self, container_id: u64) -> Result<Vec<Session<R>>> {
        let ids = self.container_experiment_ids(container_id)?;
        tracing::debug!(sessions = ids.len(), "Building container sessions");
        Ok(ids.into_iter().map(|id| self.get_session(id)).collect())
    }
}

/// Read the manifest CSV, using the unnamed leading column as the index
/// when there is one.
fn load_manifest(path: &Path) -> Result<Table> {
    let raise = |err: behavior_table::error::Error| err.raise(ErrorKind::ManifestUnreadable(path.to_path_buf()));
    let table = read_csv(path, None).map_err(raise)?;
    let table = match table.has_column(UNNAMED_INDEX) {
        true => Table::new(table.into_batch(), [UNNAMED_INDEX]).map_err(raise)?,
        false => table,
    };
    for column in [EXPERIMENT_ID_COLUMN, CONTAINER_ID_COLUMN] {
        if !table.has_column(column) {
            exn::bail!(ErrorKind::InvalidManifest(format!("missing column '{column}'")));
        }
    }
    // Surface bad ids now rather than on first lookup.
    experiment_ids(&table)?;
    Ok(table)
}

fn experiment_ids(table: &Table) -> Result<Vec<u64>> {
    let ids = table.i64_column(EXPERIMENT_ID_COLUMN).map_err(ErrorKind::table)?;
    (0..ids.len())
        .map(|row| -> Result<u64> {
            let id = ids
                .is_valid(row)
                .then(|| ids.value(row))
                .ok_or_raise(|| ErrorKind::InvalidManifest(format!("row {row} has no {EXPERIMENT_ID_COLUMN}")))?;
            u64::try_from(id).or_raise(|| ErrorKind::InvalidManifest(format!("row {row} has a negative {EXPERIMENT_ID_COLUMN}")))
        })
        .collect()
}
