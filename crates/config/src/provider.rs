use crate::error::{ErrorKind, Result};
use figment::Figment;
use figment::providers::{Format, Json, Toml, Yaml};
use std::path::Path;

/// Build a [`Figment`] from a single configuration file, picking the format
/// from the file extension.
///
/// Figment quietly treats a missing file as an empty provider; a missing file
/// is a mistake here, so it is rejected up front.
pub(crate) fn file(path: &Path) -> Result<Figment> {
    if !path.is_file() {
        exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
    }
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
    let figment = match extension.as_deref() {
        Some("json") => Figment::from(Json::file(path)),
        Some("yaml" | "yml") => Figment::from(Yaml::file(path)),
        Some("toml") => Figment::from(Toml::file(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    };
    Ok(figment)
}
