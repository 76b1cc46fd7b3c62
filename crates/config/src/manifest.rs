//! Symbolic path manifest.
//!
//! A manifest names the files and directories a configuration refers to, so
//! the rest of a description can say `"BASEDIR"` instead of repeating a path.
//! Entries may hang off a parent entry; resolving a key walks up the parent
//! chain and joins the specs together.
//!
//! Two equivalent layouts are accepted by [`Manifest::load_config`]:
//!
//! ```json
//! {"BASEDIR": "/data", "NWB": {"spec": "session_{}.nwb", "type": "file", "parent_key": "BASEDIR"}}
//! ```
//!
//! ```json
//! [
//!     {"key": "BASEDIR", "type": "dir", "spec": "/data"},
//!     {"key": "NWB", "type": "file", "spec": "session_{}.nwb", "parent_key": "BASEDIR"}
//! ]
//! ```

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;
use std::path::PathBuf;

/// Anything that can take the `manifest` section of a description.
///
/// The section's schema belongs to the resolver; a resolver that can't make
/// sense of it must fail rather than load part of it.
pub trait ManifestResolver {
    fn load_config(&mut self, config: &Value) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    #[default]
    Dir,
    File,
}

/// One manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestEntry {
    pub spec: String,
    #[serde(default, rename = "type")]
    pub kind: PathKind,
    #[serde(default)]
    pub parent_key: Option<String>,
    /// Free-form file format hint, carried but never interpreted.
    #[serde(default)]
    pub format: Option<String>,
}

impl ManifestEntry {
    fn from_spec(spec: impl Into<String>) -> Self {
        Self { spec: spec.into(), kind: PathKind::Dir, parent_key: None, format: None }
    }
}

#[derive(Deserialize)]
struct KeyedEntry {
    key: String,
    #[serde(flatten)]
    entry: ManifestEntry,
}

/// Default [`ManifestResolver`]: a table of named path specs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    paths: BTreeMap<String, ManifestEntry>,
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Loaded keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }

    pub fn entry(&self, key: &str) -> Option<&ManifestEntry> {
        self.paths.get(key)
    }

    /// Add (or replace) a single entry. The parent, if any, must already exist.
    pub fn add_path(
        &mut self,
        key: impl Into<String>,
        spec: impl Into<String>,
        kind: PathKind,
        parent_key: Option<&str>,
    ) -> Result<()> {
        let entry = ManifestEntry { kind, parent_key: parent_key.map(str::to_string), ..ManifestEntry::from_spec(spec) };
        self.merge(vec![(key.into(), entry)])
    }

    /// Resolve a key to a path, substituting each `{}` in order with `args`.
    ///
    /// Placeholders without a matching argument are left as they are; extra
    /// arguments are ignored.
    pub fn get_path(&self, key: &str, args: &[&dyn Display]) -> Result<PathBuf> {
        let chain = Self::chain(&self.paths, key)?;
        let mut path = PathBuf::new();
        // Absolute specs further down the chain replace their parents, same as `PathBuf::push`.
        for entry in chain.iter().rev() {
            path.push(&entry.spec);
        }
        let mut rendered = path.to_string_lossy().into_owned();
        let mut from = 0;
        for arg in args {
            let Some(offset) = rendered[from..].find("{}") else {
                break;
            };
            let value = arg.to_string();
            rendered.replace_range(from + offset..from + offset + 2, &value);
            from += offset + value.len();
        }
        Ok(PathBuf::from(rendered))
    }

    /// Entries from `key` up to its root.
    fn chain<'a>(paths: &'a BTreeMap<String, ManifestEntry>, key: &str) -> Result<Vec<&'a ManifestEntry>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(key);
        while let Some(name) = current {
            if !visited.insert(name) {
                exn::bail!(ErrorKind::ManifestCycle(key.to_string()));
            }
            let entry = paths.get(name).ok_or_raise(|| ErrorKind::UnknownManifestKey(name.to_string()))?;
            chain.push(entry);
            current = entry.parent_key.as_deref();
        }
        Ok(chain)
    }

    /// Merge entries into a copy, validate every parent chain, then commit.
    fn merge(&mut self, entries: Vec<(String, ManifestEntry)>) -> Result<()> {
        let mut paths = self.paths.clone();
        paths.extend(entries);
        for key in paths.keys() {
            if let Err(err) = Self::chain(&paths, key) {
                let reason = match &*err {
                    ErrorKind::UnknownManifestKey(parent) => format!("entry '{key}' has unknown parent '{parent}'"),
                    ErrorKind::ManifestCycle(_) => format!("entry '{key}' is part of a parent cycle"),
                    other => other.to_string(),
                };
                return Err(err.raise(ErrorKind::InvalidManifest(reason)));
            }
        }
        self.paths = paths;
        Ok(())
    }

    fn parse(config: &Value) -> Result<Vec<(String, ManifestEntry)>> {
        match config {
            Value::Object(map) => map
                .iter()
                .map(|(key, value)| -> Result<(String, ManifestEntry)> {
                    let entry = match value {
                        Value::String(spec) => ManifestEntry::from_spec(spec),
                        Value::Object(_) => serde_json::from_value(value.clone())
                            .or_raise(|| ErrorKind::InvalidManifest(format!("entry '{key}' is malformed")))?,
                        other => exn::bail!(ErrorKind::InvalidManifest(format!(
                            "entry '{key}' should be a path or a mapping, found {}",
                            describe(other)
                        ))),
                    };
                    Ok((key.clone(), entry))
                })
                .collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(position, item)| -> Result<(String, ManifestEntry)> {
                    let keyed: KeyedEntry = serde_json::from_value(item.clone())
                        .or_raise(|| ErrorKind::InvalidManifest(format!("entry #{position} is malformed")))?;
                    Ok((keyed.key, keyed.entry))
                })
                .collect(),
            other => exn::bail!(ErrorKind::InvalidManifest(format!(
                "expected a mapping or a list, found {}",
                describe(other)
            ))),
        }
    }
}

impl ManifestResolver for Manifest {
    /// Load entries additively. Nothing is kept if any entry is invalid.
    fn load_config(&mut self, config: &Value) -> Result<()> {
        let entries = Self::parse(config)?;
        tracing::debug!(entries = entries.len(), "Loading manifest entries");
        self.merge(entries)
    }
}
