//! Lock-step diff of a working tree against its baseline.
//!
//! The walk follows the working tree. Tokens that are new or whose value
//! changed produce a [`DiffRecord`]; tokens that only exist in the baseline
//! are not reported.

use dtp_types::reference::strip_namespaces;
use dtp_types::{format_scalar, join_path, Group, OklchColor, Token, TokenNode, TokenTree};
use serde_json::Value;

use crate::error::DiffResult;
use crate::index::ReferenceIndex;
use crate::record::{ColorChange, DiffRecord};

/// One side of a color comparison.
struct ColorSide {
    color: String,
    label: String,
    /// What must match for the two sides to count as unchanged.
    key: (String, String),
}

/// Diffs trees whose references resolve against their own source.
pub struct TokenDiff<'a> {
    new_index: &'a ReferenceIndex,
    baseline_index: &'a ReferenceIndex,
}

impl<'a> TokenDiff<'a> {
    pub fn new(new_index: &'a ReferenceIndex, baseline_index: &'a ReferenceIndex) -> Self {
        Self {
            new_index,
            baseline_index,
        }
    }

    /// Records for every new or changed token of `new`, depth first.
    pub fn diff(&self, new: &TokenTree, baseline: &TokenTree) -> DiffResult<Vec<DiffRecord>> {
        let mut records = Vec::new();
        self.diff_group(new.root(), baseline.root(), "", &mut records)?;
        Ok(records)
    }

    fn diff_group(
        &self,
        new: &Group,
        baseline: &Group,
        path: &str,
        out: &mut Vec<DiffRecord>,
    ) -> DiffResult<()> {
        for (key, node) in new.iter() {
            self.diff_node(node, baseline.get(key), &join_path(path, key), out)?;
        }
        Ok(())
    }

    fn diff_node(
        &self,
        new: &TokenNode,
        baseline: Option<&TokenNode>,
        path: &str,
        out: &mut Vec<DiffRecord>,
    ) -> DiffResult<()> {
        match (new, baseline) {
            (TokenNode::Token(new), Some(TokenNode::Token(prev))) => {
                if let Some(record) = self.compare(path, new, prev)? {
                    out.push(record);
                }
            }
            (TokenNode::Token(new), _) => out.push(self.new_token(path, new)?),
            (TokenNode::Group(new), Some(TokenNode::Group(prev))) => {
                self.diff_group(new, prev, path, out)?;
            }
            (TokenNode::Group(new), _) => {
                for (sub_path, token) in new.tokens() {
                    out.push(self.new_token(&join_path(path, &sub_path), token)?);
                }
            }
            (TokenNode::Literal(_), _) => {}
        }
        Ok(())
    }

    /// The record for a token absent from the baseline.
    fn new_token(&self, path: &str, token: &Token) -> DiffResult<DiffRecord> {
        if is_color(token) {
            let side = color_side(token, self.new_index)?;
            return Ok(DiffRecord::color(
                path,
                ColorChange {
                    new_color: side.color,
                    new_color_label: side.label,
                    ..ColorChange::default()
                },
            ));
        }
        Ok(DiffRecord::value(path, format_scalar(token.value()), String::new()))
    }

    fn compare(&self, path: &str, new: &Token, prev: &Token) -> DiffResult<Option<DiffRecord>> {
        if is_color(new) {
            let new_side = color_side(new, self.new_index)?;
            let prev_side = color_side(prev, self.baseline_index)?;
            if new_side.key == prev_side.key {
                return Ok(None);
            }
            return Ok(Some(DiffRecord::color(
                path,
                ColorChange {
                    new_color: new_side.color,
                    new_color_label: new_side.label,
                    prev_color: prev_side.color,
                    prev_color_label: prev_side.label,
                },
            )));
        }

        let changed = match (new.value(), prev.value()) {
            (Value::String(a), Value::String(b)) => strip_namespaces(a) != strip_namespaces(b),
            (a, b) => format_scalar(a) != format_scalar(b),
        };
        Ok(changed.then(|| {
            DiffRecord::value(path, format_scalar(new.value()), format_scalar(prev.value()))
        }))
    }
}

fn is_color(token: &Token) -> bool {
    token.is_color() || OklchColor::is_oklch(token.value())
}

fn color_side(token: &Token, index: &ReferenceIndex) -> DiffResult<ColorSide> {
    let value = token.value();
    if let Some(color) = OklchColor::from_value(value).ok().flatten() {
        let label = color.css();
        return Ok(ColorSide {
            color: color.css_with_commas(),
            key: (label.clone(), label.clone()),
            label,
        });
    }
    if let Value::String(text) = value {
        let resolved = index.resolve(text)?;
        return Ok(ColorSide {
            key: (strip_namespaces(text), strip_namespaces(&resolved.color)),
            color: resolved.color,
            label: resolved.label,
        });
    }
    let text = format_scalar(value);
    Ok(ColorSide {
        color: text.clone(),
        label: text.clone(),
        key: (text.clone(), text),
    })
}

/// Diff two trees, each resolving references against its own index.
pub fn diff_trees(
    new: &TokenTree,
    baseline: &TokenTree,
    new_index: &ReferenceIndex,
    baseline_index: &ReferenceIndex,
) -> DiffResult<Vec<DiffRecord>> {
    TokenDiff::new(new_index, baseline_index).diff(new, baseline)
}
