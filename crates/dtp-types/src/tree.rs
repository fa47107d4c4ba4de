//! A whole parsed token file or merged tier.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::TypeError;
use crate::node::{Group, TokenNode};
use crate::tier::Tier;

/// A root namespace group, optionally wrapped under its tier name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenTree {
    root: Group,
}

impl TokenTree {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_group(root: Group) -> Self {
        Self { root }
    }

    /// Parse a JSON document. The root must be an object.
    pub fn parse(text: &str) -> Result<Self, TypeError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn from_value(value: Value) -> Result<Self, TypeError> {
        match TokenNode::from_value(value) {
            TokenNode::Group(root) => Ok(Self { root }),
            TokenNode::Token(_) => Err(TypeError::NotAnObject("a token")),
            TokenNode::Literal(_) => Err(TypeError::NotAnObject("a scalar")),
        }
    }

    /// Wrap a group under a tier key: `{ "<tier>": group }`.
    pub fn wrap(tier: Tier, group: Group) -> Self {
        let mut root = Group::new();
        root.insert(tier.as_str(), TokenNode::Group(group));
        Self { root }
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Group {
        &mut self.root
    }

    pub fn into_root(self) -> Group {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// The wrapper key, if the root has exactly one child and it is a group.
    pub fn wrapper_key(&self) -> Option<&str> {
        if self.root.len() != 1 {
            return None;
        }
        self.root
            .iter()
            .next()
            .filter(|(_, node)| node.is_group())
            .map(|(key, _)| key)
    }

    /// Drop the `<tier>` wrapper if present, returning the inner group.
    pub fn strip_wrapper(self, tier: Tier) -> Group {
        if self.wrapper_key() != Some(tier.as_str()) {
            return self.root;
        }
        match self.root.into_entries().pop() {
            Some((_, TokenNode::Group(inner))) => inner,
            _ => Group::new(),
        }
    }

    /// The group under a tier namespace key, if any.
    pub fn namespace(&self, tier: Tier) -> Option<&Group> {
        self.root.get(tier.as_str()).and_then(TokenNode::as_group)
    }

    pub fn to_value(&self) -> Value {
        self.root.to_value()
    }

    /// Two-space indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, TypeError> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }
}

impl Serialize for TokenTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TokenTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Group::deserialize(deserializer).map(Self::from_group)
    }
}
