//! Project cache configuration.

use crate::error::{ErrorKind, Result};
use crate::provider;
use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::Env;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Environment variables with this prefix override file values, e.g.
/// `BEHAVIOR_CACHE_NWB_BASE_DIR`.
pub const ENV_PREFIX: &str = "BEHAVIOR_CACHE_";
/// File name looked up in the platform configuration directory.
pub const DEFAULT_FILE_NAME: &str = "cache.toml";

/// Where the project cache finds its manifest and data files.
///
/// ```
/// use behavior_config::CacheConfig;
/// use figment::{Figment, providers::{Format, Json}};
///
/// let json = r#"{
///     "manifest_path": "/data/visual_behavior_data_manifest.csv",
///     "nwb_base_dir": "/data/nwb_files",
///     "analysis_files_base_dir": "/data/analysis_files"
/// }"#;
/// let config = CacheConfig::from_figment(Figment::from(Json::string(json))).unwrap();
/// assert_eq!(config.nwb_base_dir.to_str(), Some("/data/nwb_files"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// CSV manifest listing every experiment and its container.
    pub manifest_path: PathBuf,
    /// Directory holding the primary per-session files.
    pub nwb_base_dir: PathBuf,
    /// Directory holding the derived analysis tables.
    pub analysis_files_base_dir: PathBuf,
}

impl CacheConfig {
    pub fn new(
        manifest_path: impl Into<PathBuf>,
        nwb_base_dir: impl Into<PathBuf>,
        analysis_files_base_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            nwb_base_dir: nwb_base_dir.into(),
            analysis_files_base_dir: analysis_files_base_dir.into(),
        }
    }

    /// Load from a JSON, YAML or TOML file, with [`ENV_PREFIX`] environment
    /// variables taking precedence over the file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let figment = provider::file(path.as_ref())?.merge(Env::prefixed(ENV_PREFIX));
        Self::from_figment(figment)
    }

    /// Extract from an already assembled [`Figment`].
    pub fn from_figment(figment: Figment) -> Result<Self> {
        figment.extract().or_raise(|| ErrorKind::Invalid)
    }

    /// `cache.toml` inside the platform configuration directory, if the
    /// platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "Allen Institute", "behavior-cache").map(|dirs| dirs.config_dir().join(DEFAULT_FILE_NAME))
    }

    /// Load from [`default_path`](Self::default_path).
    pub fn discover() -> Result<Self> {
        let path = Self::default_path().ok_or_raise(|| ErrorKind::NoConfigDir)?;
        tracing::debug!(path = %path.display(), "Loading cache configuration from default location");
        Self::load(path)
    }
}
