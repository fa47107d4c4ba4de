//! Diff engine for the design token pipeline.
//!
//! # Key Types
//!
//! - [`TokenDiff`] — Lock-step walk of a working tree against its baseline
//! - [`ReferenceIndex`] — Per-source merged tree references resolve against
//! - [`DiffRecord`] / [`FileDiff`] — What changed, per token and per file
//! - [`RemovalReport`] — Files and tokens gone since the baseline
//! - [`DeprecationReport`] — Orphaned deprecated files and misplaced flags

pub mod deprecated;
pub mod error;
pub mod index;
pub mod record;
pub mod removals;
pub mod sources;
pub mod tree_diff;

pub use deprecated::{check_deprecated, DeprecationReport, MisplacedToken};
pub use error::{DiffError, DiffResult};
pub use index::{ReferenceIndex, ResolvedColor};
pub use record::{Change, ColorChange, DiffRecord, FileDiff, ValueChange};
pub use removals::{check_removals, RemovalReport, RemovedTokens};
pub use sources::diff_sources;
pub use tree_diff::{diff_trees, TokenDiff};
