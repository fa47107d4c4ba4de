//! `{dotted.path}` references embedded in token text fields.
//!
//! A string may carry any number of references, e.g.
//! `oklch(from {palette.blue.100} l c h / {opacity.half})`. After export every
//! reference is namespace-qualified: its first segment is `base`, `brand` or
//! `sys`.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::tier::Tier;

static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("reference pattern is valid"));

/// Paths of every reference in `text`, in order of appearance.
pub fn references(text: &str) -> impl Iterator<Item = &str> {
    REFERENCE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Whether `text` contains at least one reference.
pub fn has_references(text: &str) -> bool {
    REFERENCE.is_match(text)
}

/// Rewrite every reference path in `text` with `f`, keeping the braces.
pub fn replace_references(text: &str, mut f: impl FnMut(&str) -> String) -> String {
    REFERENCE
        .replace_all(text, |caps: &Captures| format!("{{{}}}", f(&caps[1])))
        .into_owned()
}

/// If `text` is exactly one reference (`{a.b}`), its path.
pub fn single_reference(text: &str) -> Option<&str> {
    let inner = text.trim().strip_prefix('{')?.strip_suffix('}')?;
    (!inner.is_empty() && !inner.contains(['{', '}'])).then_some(inner)
}

/// The namespace tier named by the first segment of `path`, if any.
pub fn namespace_of(path: &str) -> Option<Tier> {
    path.split('.').next().and_then(Tier::from_namespace)
}

/// Whether `path` already starts with a recognized namespace.
pub fn is_qualified(path: &str) -> bool {
    namespace_of(path).is_some()
}

/// `path` without its leading namespace segment, if it has one.
pub fn strip_namespace(path: &str) -> &str {
    match namespace_of(path) {
        Some(tier) => path
            .strip_prefix(tier.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(path),
        None => path,
    }
}

/// Prefix `path` with a namespace.
pub fn qualify(tier: Tier, path: &str) -> String {
    format!("{}.{}", tier.as_str(), path)
}

/// Drop namespace prefixes from every reference in `text`, so that
/// `{base.palette.blue.100}` and `{palette.blue.100}` compare equal.
pub fn strip_namespaces(text: &str) -> String {
    replace_references(text, |path| strip_namespace(path).to_string())
}
