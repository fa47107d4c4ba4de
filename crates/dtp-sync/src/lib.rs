//! Collaborators outside the token build: the source host exported configs
//! are synced into, and the design tool variables are imported from.
//!
//! Both services sit behind async traits ([`SourceHost`],
//! [`DesignToolClient`]) with in-memory implementations for tests.

pub mod changes;
pub mod design_tool;
pub mod error;
pub mod host;
pub mod types;
pub mod workflow;

pub use changes::{changed_tiers, join_tiers};
pub use design_tool::{
    token_files_from_variables, DesignToolClient, LocalVariablesResponse, StaticDesignTool,
    Variable, VariableCollection,
};
pub use error::{SyncError, SyncResult};
pub use host::{InMemorySourceHost, SourceHost};
pub use types::{Branch, FileUpdate, PullRequest, RemoteFile, SyncReport, SyncTarget};
pub use workflow::{commit_message, encode_config, SyncWorkflow, PULL_REQUEST_TEMPLATE, PULL_REQUEST_TITLE};
