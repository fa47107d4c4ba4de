//! Namespace qualification of `{dotted.path}` references.
//!
//! A reference whose first segment is already `base`, `brand` or `sys` is
//! left alone. Anything else is prefixed with `base.` when the classifier
//! knows the path as a base token, and with `sys.` otherwise.

use dtp_types::reference::{is_qualified, qualify, replace_references};
use dtp_types::Tier;
use serde_json::{Map, Value};

use crate::classifier::PathClassifier;

/// Rewrites references inside token fields.
pub struct ReferenceResolver<'a> {
    classifier: &'a dyn PathClassifier,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(classifier: &'a dyn PathClassifier) -> Self {
        Self { classifier }
    }

    /// Qualify a single reference path.
    pub fn qualify_path(&self, path: &str) -> String {
        if is_qualified(path) {
            return path.to_string();
        }
        let tier = if self.classifier.is_base_token(path) {
            Tier::Base
        } else {
            Tier::Sys
        };
        qualify(tier, path)
    }

    /// Qualify every reference in a string independently.
    pub fn qualify_str(&self, text: &str) -> String {
        replace_references(text, |path| self.qualify_path(path))
    }

    /// Qualify a token `value`.
    ///
    /// Strings are rewritten directly. Lists of objects and plain objects
    /// have their keys kebab-cased and their string entries rewritten.
    /// Numbers, booleans and null pass through.
    pub fn qualify_value(&self, value: &Value) -> Value {
        match value {
            Value::String(text) => Value::String(self.qualify_str(text)),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| match item {
                        Value::Object(entries) => Value::Object(self.qualify_entries(entries)),
                        Value::String(text) => Value::String(self.qualify_str(text)),
                        other => other.clone(),
                    })
                    .collect(),
            ),
            Value::Object(entries) => Value::Object(self.qualify_entries(entries)),
            other => other.clone(),
        }
    }

    fn qualify_entries(&self, entries: &Map<String, Value>) -> Map<String, Value> {
        entries
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(text) => Value::String(self.qualify_str(text)),
                    other => other.clone(),
                };
                (kebab_case(key), value)
            })
            .collect()
    }
}

/// `offsetX` -> `offset-x`. Every capital, including a leading one, becomes
/// `-` plus its lowercase form, so `Spread` -> `-spread`. Only ASCII and
/// Latin-1 capitals are converted.
pub fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if matches!(c, 'A'..='Z' | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{DE}') {
            out.push('-');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
