use super::{BehaviorApi, SessionMetadata};
use crate::error::{ErrorKind, Result};
use behavior_table::{Table, TableReader};
use std::path::{Path, PathBuf};
use tracing::instrument;

pub const TRIALS_KEY: &str = "trials";
pub const STIMULUS_PRESENTATIONS_KEY: &str = "stimulus_presentations";
pub const METADATA_KEY: &str = "metadata";

/// Base API over a primary session file.
///
/// Every call reads from storage; nothing is cached here.
#[derive(Debug, Clone)]
pub struct NwbApi<R> {
    path: PathBuf,
    reader: R,
}

impl<R: TableReader> NwbApi<R> {
    pub fn new(path: impl Into<PathBuf>, reader: R) -> Self {
        Self { path: path.into(), reader }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn read(&self, key: &str) -> Result<Table> {
        self.reader.read_table(&self.path, key).map_err(ErrorKind::table)
    }
}

impl<R: TableReader> BehaviorApi for NwbApi<R> {
    fn get_trials(&self) -> Result<Table> {
        self.read(TRIALS_KEY)
    }

    fn get_stimulus_presentations(&self) -> Result<Table> {
        self.read(STIMULUS_PRESENTATIONS_KEY)
    }

    fn get_metadata(&self) -> Result<SessionMetadata> {
        SessionMetadata::from_table(&self.read(METADATA_KEY)?)
    }
}
