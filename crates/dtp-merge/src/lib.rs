//! Tree merging for the design token pipeline.
//!
//! Provides the token-aware recursive merge, the flat per-tier combine, and
//! the [`TokenSource`] abstraction token files are read through.

pub mod classify;
pub mod combine;
pub mod error;
pub mod merge;
pub mod source;

pub use classify::{
    classify, deprecated_counterpart, is_deprecated_path, is_metadata_file, main_counterpart,
    token_files, FileScope, TokenFileKind,
};
pub use combine::{accumulate, combine_tokens, in_tier_folder, tier_files, TierSources};
pub use error::{MergeError, MergeResult};
pub use merge::{merge_groups, merge_nodes, merge_trees};
pub use source::{FsTokenSource, InMemoryTokenSource, TokenSource};
