//! Deciding whether a dotted path names a base token.

use dtp_types::{Group, Tier, TokenNode, TokenTree};
use serde_json::Value;

/// Decides which namespace an unqualified reference belongs to.
pub trait PathClassifier {
    /// `true` if `path` (without a namespace) names something under `base`.
    fn is_base_token(&self, path: &str) -> bool;
}

/// The merged `base` namespace (main and deprecated) a run classifies
/// references against. Built once per run.
#[derive(Clone, Debug, Default)]
pub struct BaseIndex {
    base: Group,
}

impl BaseIndex {
    /// Index the `base` namespace of an already merged tree.
    pub fn from_tree(tree: &TokenTree) -> Self {
        Self {
            base: tree.namespace(Tier::Base).cloned().unwrap_or_default(),
        }
    }

    pub fn base(&self) -> &Group {
        &self.base
    }
}

impl PathClassifier for BaseIndex {
    /// Walks the path through groups, then into token fields and plain JSON.
    /// The path counts only if the value at its end is truthy in the
    /// JavaScript sense, so `unit.value` holding `0` is not a base token.
    fn is_base_token(&self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }
        let mut segments = path.split('.');
        let mut group = &self.base;
        while let Some(segment) = segments.next() {
            match group.get(segment) {
                None => return false,
                Some(TokenNode::Group(inner)) => group = inner,
                Some(TokenNode::Token(token)) => {
                    let Some(field) = segments.next() else {
                        return true;
                    };
                    return walk_value(token.get(field), segments).is_some_and(is_truthy);
                }
                Some(TokenNode::Literal(value)) => {
                    return walk_value(Some(value), segments).is_some_and(is_truthy);
                }
            }
        }
        true
    }
}

fn walk_value<'a, 'b>(
    mut value: Option<&'a Value>,
    segments: impl Iterator<Item = &'b str>,
) -> Option<&'a Value> {
    for segment in segments {
        value = match value? {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
    }
    value
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl<F> PathClassifier for F
where
    F: Fn(&str) -> bool,
{
    fn is_base_token(&self, path: &str) -> bool {
        self(path)
    }
}
