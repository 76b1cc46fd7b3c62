//! Project cache for visual behavior experiments.
//!
//! A [`ProjectCache`] reads the project manifest (one row per experiment,
//! grouped into containers) and hands out [`Session`]s. A session reads its
//! tables lazily from two kinds of file:
//!
//! - the primary session file, with trials, stimulus presentations and
//!   metadata ([`NwbApi`]);
//! - separate analysis files holding precomputed response tables, stored
//!   under the key `df` ([`DataApi`]).
//!
//! Derived views (trial responses joined with trials, image names per image
//! index) are computed on first access and cached for the life of the
//! session.

pub mod api;
pub mod error;
mod lazy;
mod paths;
mod project;
mod session;
#[cfg(test)]
mod testing;

pub use crate::api::{AnalysisApi, BehaviorApi, DataApi, NwbApi, SessionMetadata};
pub use crate::lazy::LazyProperty;
pub use crate::paths::{FileCategory, SessionPaths};
pub use crate::project::{CONTAINER_ID_COLUMN, EXPERIMENT_ID_COLUMN, ProjectCache, Session};
pub use crate::session::{BehaviorSession, ExtendedSession};
