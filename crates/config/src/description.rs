//! Merged configuration descriptions.
//!
//! A [`Description`] accumulates configuration from one or more sources.
//! Each source may carry a `manifest` section, which is handed to the
//! [`ManifestResolver`] instead of being stored with the rest of the data.

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::{ErrorKind, Result};
use crate::manifest::{Manifest, ManifestResolver};
use crate::provider;
use exn::ResultExt;
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use tracing::instrument;

/// Key of the section routed to the manifest resolver.
pub const MANIFEST_KEY: &str = "manifest";

/// A flat mapping of top-level configuration keys to arbitrary values.
pub type Data = Map<String, Value>;

pub struct Description<M = Manifest> {
    data: Data,
    reserved_data: Vec<Data>,
    manifest: M,
    sink: Box<dyn DiagnosticSink>,
}

impl Default for Description<Manifest> {
    fn default() -> Self {
        Self::with_manifest(Manifest::new())
    }
}

impl Description<Manifest> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: fmt::Debug> fmt::Debug for Description<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Description")
            .field("data", &self.data)
            .field("reserved_data", &self.reserved_data)
            .field("manifest", &self.manifest)
            .finish_non_exhaustive()
    }
}

impl<M: ManifestResolver> Description<M> {
    /// Start an empty description around a specific manifest resolver.
    pub fn with_manifest(manifest: M) -> Self {
        Self { data: Data::new(), reserved_data: Vec::new(), manifest, sink: Box::new(TracingSink) }
    }

    /// Replace the sink that receives normalization warnings.
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Every manifest section seen by [`unpack`](Self::unpack), oldest first,
    /// each as a single-key `{"manifest": …}` mapping.
    pub fn reserved_data(&self) -> &[Data] {
        &self.reserved_data
    }

    pub fn manifest(&self) -> &M {
        &self.manifest
    }

    /// Shallow merge: top-level keys in `data` replace existing ones wholesale.
    pub fn update(&mut self, data: Data) {
        self.data.extend(data);
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Route the `manifest` section to the resolver, then merge the rest.
    ///
    /// A missing manifest section counts as an empty mapping. If the resolver
    /// rejects the section, the section stays in the history but none of the
    /// remaining data is merged.
    pub fn unpack(&mut self, mut data: Data) -> Result<()> {
        self.unpack_manifest(&mut data)?;
        self.update(data);
        Ok(())
    }

    /// Remove the `manifest` section from `data` and load it into the resolver.
    pub fn unpack_manifest(&mut self, data: &mut Data) -> Result<()> {
        let manifest = data.remove(MANIFEST_KEY).unwrap_or_else(|| Value::Object(Map::new()));
        let result = self.manifest.load_config(&manifest);
        self.reserved_data.push(Data::from_iter([(MANIFEST_KEY.to_string(), manifest)]));
        result
    }

    /// Read a JSON, YAML or TOML file (chosen by extension) and unpack it.
    ///
    /// The file must hold a mapping at the top level.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn unpack_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let data: Data = provider::file(path.as_ref())?.extract().or_raise(|| ErrorKind::Invalid)?;
        self.unpack(data)
    }

    /// Wrap each named section that holds a single mapping in a one-element list.
    ///
    /// Sections that are already lists (or anything other than a mapping),
    /// and sections that are absent, are left alone, so running this again is
    /// a no-op. A warning naming each wrapped section goes to the sink.
    /// Returns the names of the sections that were wrapped.
    pub fn normalize_sections(&mut self, sections: &[&str]) -> Vec<String> {
        let mut normalized = Vec::new();
        for section in sections {
            let Some(value) = self.data.get_mut(*section) else {
                continue;
            };
            if value.is_object() {
                let single = value.take();
                *value = Value::Array(vec![single]);
                self.sink.warn(&format!("wrapped description section {section} in an array."));
                normalized.push(section.to_string());
            }
        }
        normalized
    }
}
