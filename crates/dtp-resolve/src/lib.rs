//! Reference resolution for the design token pipeline.
//!
//! # Modules
//!
//! - [`classifier`] — [`PathClassifier`] and the per-run [`BaseIndex`]
//! - [`resolver`] — [`ReferenceResolver`], namespace qualification of references
//! - [`lookup`] — Following alias chains with a cycle guard

pub mod classifier;
pub mod error;
pub mod lookup;
pub mod resolver;

pub use classifier::{BaseIndex, PathClassifier};
pub use error::{ResolveError, ResolveResult};
pub use lookup::{find_token, follow, Resolution};
pub use resolver::{kebab_case, ReferenceResolver};
