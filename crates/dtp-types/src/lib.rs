//! Foundation types for the design token pipeline (DTP).
//!
//! This crate provides the tree model and the small value types shared by
//! every other DTP crate.
//!
//! # Key Types
//!
//! - [`TokenNode`] — Token leaf, namespace group, or stray literal
//! - [`Token`] / [`Group`] — The leaf and branch of a token tree
//! - [`TokenTree`] — A parsed file or merged tier, optionally tier-wrapped
//! - [`Tier`] / [`Variant`] / [`Platform`] — Where tokens come from and go to
//! - [`OklchColor`] — Structured color values and their CSS forms
//! - [`PipelineConfig`] / [`RootPaths`] — Explicit run configuration

pub mod color;
pub mod config;
pub mod error;
pub mod node;
pub mod number;
pub mod reference;
pub mod tier;
pub mod tree;

pub use color::{parse_lightness, OklchColor};
pub use config::{PipelineConfig, RootPaths};
pub use error::TypeError;
pub use node::{join_path, Group, Token, TokenNode, VALUE_KEY};
pub use number::{format_f64, format_number, format_scalar};
pub use tier::{Platform, Tier, Variant};
pub use tree::TokenTree;
