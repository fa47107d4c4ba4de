//! Recursive, token-aware merge of two token trees.
//!
//! For a key present on both sides:
//!
//! - if either side is a token, the two field sets are spread together with
//!   the right-hand side winning per field (tokens are atomic, never deep
//!   merged);
//! - if both sides are groups, they are merged recursively;
//! - otherwise the right-hand side wins outright.
//!
//! Keys present on one side only are carried over unchanged.

use dtp_types::{Group, Token, TokenNode, TokenTree};
use serde_json::{Map, Value};

/// Merge two trees, `right` taking precedence.
pub fn merge_trees(left: TokenTree, right: TokenTree) -> TokenTree {
    TokenTree::from_group(merge_groups(left.into_root(), right.into_root()))
}

/// Merge two groups, `right` taking precedence.
pub fn merge_groups(left: Group, right: Group) -> Group {
    let mut result = left;
    for (key, right_node) in right.into_entries() {
        match result.get_mut(&key) {
            Some(slot) => {
                let left_node = std::mem::replace(slot, TokenNode::Literal(Value::Null));
                *slot = merge_nodes(left_node, right_node);
            }
            None => {
                result.insert(key, right_node);
            }
        }
    }
    result
}

/// Merge two nodes found under the same key.
pub fn merge_nodes(left: TokenNode, right: TokenNode) -> TokenNode {
    match (left, right) {
        (TokenNode::Group(left), TokenNode::Group(right)) => {
            TokenNode::Group(merge_groups(left, right))
        }
        (TokenNode::Token(mut left), TokenNode::Token(right)) => {
            left.merge_from(right);
            TokenNode::Token(left)
        }
        (TokenNode::Token(left), TokenNode::Group(right)) => {
            spread(left.into_fields(), group_fields(right))
        }
        (TokenNode::Group(left), TokenNode::Token(right)) => {
            spread(group_fields(left), right.into_fields())
        }
        // A literal contributes no fields to a token spread.
        (left @ TokenNode::Token(_), TokenNode::Literal(_)) => left,
        (_, right) => right,
    }
}

fn group_fields(group: Group) -> Map<String, Value> {
    match group.into_value() {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// `{...left, ...right}`. One side is a token, so the result has a `value`.
fn spread(mut left: Map<String, Value>, right: Map<String, Value>) -> TokenNode {
    for (key, value) in right {
        left.insert(key, value);
    }
    match Token::from_fields(left) {
        Some(token) => TokenNode::Token(token),
        None => TokenNode::Group(Group::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn tree(value: Value) -> TokenTree {
        TokenTree::from_value(value).unwrap()
    }

    #[test]
    fn disjoint_keys_are_unioned_in_order() {
        let merged = merge_trees(
            tree(json!({"a": {"value": 1}, "b": {"value": 2}})),
            tree(json!({"c": {"value": 3}, "a": {"value": 9}})),
        );
        assert_eq!(
            merged.to_value(),
            json!({"a": {"value": 9}, "b": {"value": 2}, "c": {"value": 3}})
        );
        let keys: Vec<&str> = merged.root().keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn groups_merge_recursively() {
        let merged = merge_trees(
            tree(json!({"sys": {"color": {"fg": {"value": "{a}"}}}})),
            tree(json!({"sys": {"color": {"bg": {"value": "{b}"}}, "shape": {"xs": {"value": 2}}}})),
        );
        assert_eq!(
            merged.to_value(),
            json!({"sys": {
                "color": {"fg": {"value": "{a}"}, "bg": {"value": "{b}"}},
                "shape": {"xs": {"value": 2}}
            }})
        );
    }

    #[test]
    fn tokens_merge_shallowly_right_wins() {
        let merged = merge_trees(
            tree(json!({"t": {"value": {"colorSpace": "oklch", "components": [1, 0, 0]}, "type": "color", "description": "old"}})),
            tree(json!({"t": {"value": "#000", "deprecated": true}})),
        );
        assert_eq!(
            merged.to_value(),
            json!({"t": {"value": "#000", "type": "color", "description": "old", "deprecated": true}})
        );
    }

    #[test]
    fn token_value_objects_are_not_deep_merged() {
        let merged = merge_trees(
            tree(json!({"t": {"value": {"a": 1, "b": 2}}})),
            tree(json!({"t": {"value": {"a": 5}}})),
        );
        assert_eq!(merged.to_value(), json!({"t": {"value": {"a": 5}}}));
    }

    #[test]
    fn token_against_group_spreads_fields() {
        let merged = merge_trees(
            tree(json!({"t": {"value": 1}})),
            tree(json!({"t": {"nested": {"value": 2}}})),
        );
        let token = merged.root().get("t").unwrap().as_token().unwrap();
        assert_eq!(token.value(), &json!(1));
        assert_eq!(token.get("nested"), Some(&json!({"value": 2})));
    }

    #[test]
    fn type_mismatch_right_wins() {
        let merged = merge_trees(
            tree(json!({"x": {"inner": {"value": 1}}, "y": "text"})),
            tree(json!({"x": 5, "y": {"inner": {"value": 2}}})),
        );
        assert_eq!(merged.to_value(), json!({"x": 5, "y": {"inner": {"value": 2}}}));
    }

    #[test]
    fn literal_does_not_replace_token() {
        let merged = merge_trees(tree(json!({"t": {"value": 1}})), tree(json!({"t": 7})));
        assert_eq!(merged.to_value(), json!({"t": {"value": 1}}));
    }

    /// Tokens only at the leaves, so a path never mixes groups and tokens.
    fn arb_group(depth: u32) -> BoxedStrategy<Value> {
        if depth == 0 {
            let token = (0i64..4, proptest::option::of("[xy]")).prop_map(|(v, extra)| match extra {
                Some(field) => json!({"value": v, field: v + 10}),
                None => json!({"value": v}),
            });
            return proptest::collection::btree_map("[abc]", token, 0..3)
                .prop_map(|m| Value::Object(m.into_iter().collect()))
                .boxed();
        }
        proptest::collection::btree_map("[abc]", arb_group(depth - 1), 0..3)
            .prop_map(|m| Value::Object(m.into_iter().collect()))
            .boxed()
    }

    proptest! {
        #[test]
        fn merge_is_associative(
            a in arb_group(2), b in arb_group(2), c in arb_group(2),
        ) {
            let left = merge_trees(merge_trees(tree(a.clone()), tree(b.clone())), tree(c.clone()));
            let right = merge_trees(tree(a), merge_trees(tree(b), tree(c)));
            prop_assert_eq!(left, right);
        }

        #[test]
        fn right_token_fields_always_win(a in arb_group(1), b in arb_group(1)) {
            let merged = merge_trees(tree(a), tree(b.clone()));
            for (path, token) in tree(b).root().tokens() {
                let out = merged.root().lookup(&path).and_then(TokenNode::as_token);
                prop_assert!(out.is_some());
                for (field, value) in token.fields() {
                    prop_assert_eq!(out.unwrap().get(field), Some(value));
                }
            }
        }
    }
}
