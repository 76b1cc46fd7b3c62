//! Configuration for behavior project tooling.
//!
//! - [`CacheConfig`]: where the project cache finds its manifest and files.
//! - [`Description`]: layered configuration with a routed `manifest` section.
//! - [`Manifest`]: the default resolver for that section, mapping symbolic
//!   keys to paths.

mod cache;
mod description;
mod diagnostics;
pub mod error;
mod manifest;
mod provider;

pub use crate::cache::{CacheConfig, DEFAULT_FILE_NAME, ENV_PREFIX};
pub use crate::description::{Data, Description, MANIFEST_KEY};
pub use crate::diagnostics::{DiagnosticSink, TracingSink};
pub use crate::manifest::{Manifest, ManifestEntry, ManifestResolver, PathKind};
