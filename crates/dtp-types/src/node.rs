//! The token tree node model.
//!
//! Every JSON object is classified exactly once, at parse time: an object
//! carrying a `value` key is a [`Token`], any other object is a [`Group`],
//! and anything that is not an object is kept as a [`TokenNode::Literal`].
//! Tree walks match on the variant instead of re-inspecting keys.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// The key whose presence turns an object into a token.
pub const VALUE_KEY: &str = "value";

/// Join a dotted path prefix with one more segment.
pub fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

// ---------------------------------------------------------------------------
// TokenNode
// ---------------------------------------------------------------------------

/// A node in a token tree.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenNode {
    /// A leaf carrying a `value`.
    Token(Token),
    /// A namespace group of named children.
    Group(Group),
    /// A non-object value sitting directly in a group (e.g. `_comment`).
    Literal(Value),
}

impl TokenNode {
    /// Classify a raw JSON value.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) if map.contains_key(VALUE_KEY) => Self::Token(Token { fields: map }),
            Value::Object(map) => Self::Group(Group::from_map(map)),
            other => Self::Literal(other),
        }
    }

    /// Convert back into raw JSON.
    pub fn into_value(self) -> Value {
        match self {
            Self::Token(token) => Value::Object(token.fields),
            Self::Group(group) => group.into_value(),
            Self::Literal(value) => value,
        }
    }

    /// Raw JSON copy of this node.
    pub fn to_value(&self) -> Value {
        self.clone().into_value()
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Self::Token(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Self::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn as_token_mut(&mut self) -> Option<&mut Token> {
        match self {
            Self::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Short name of the variant, for logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Token(_) => "token",
            Self::Group(_) => "group",
            Self::Literal(_) => "literal",
        }
    }
}

impl Serialize for TokenNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Token(token) => token.serialize(serializer),
            Self::Group(group) => group.serialize(serializer),
            Self::Literal(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for TokenNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A token leaf: an ordered field map that always contains `value`.
///
/// Besides `value`, the usual fields are `type`, `description`, `fallback`,
/// `deprecated`, `deprecatedComment` and the tool-vendor `$extensions` block,
/// but any field is preserved as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    fields: Map<String, Value>,
}

impl Token {
    /// Create a token holding only a value.
    pub fn new(value: Value) -> Self {
        let mut fields = Map::new();
        fields.insert(VALUE_KEY.to_string(), value);
        Self { fields }
    }

    /// Builder-style setter for the `type` field.
    pub fn with_type(mut self, token_type: &str) -> Self {
        self.fields
            .insert("type".to_string(), Value::String(token_type.to_string()));
        self
    }

    /// Wrap a field map. Returns `None` when the map has no `value` key.
    pub fn from_fields(fields: Map<String, Value>) -> Option<Self> {
        fields.contains_key(VALUE_KEY).then_some(Self { fields })
    }

    pub fn value(&self) -> &Value {
        self.fields.get(VALUE_KEY).unwrap_or(&Value::Null)
    }

    pub fn value_mut(&mut self) -> &mut Value {
        self.fields
            .entry(VALUE_KEY.to_string())
            .or_insert(Value::Null)
    }

    pub fn set_value(&mut self, value: Value) {
        *self.value_mut() = value;
    }

    /// The declared `type`, if it is a string.
    pub fn token_type(&self) -> Option<&str> {
        self.get_str("type")
    }

    /// Whether the declared type is `"color"`.
    pub fn is_color(&self) -> bool {
        self.token_type() == Some("color")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// A field's value when it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Set a field, returning the previous value. New fields go last.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    /// Remove a field, keeping the order of the remaining ones.
    ///
    /// The `value` key is never removed.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        if key == VALUE_KEY {
            return None;
        }
        self.fields.shift_remove(key)
    }

    /// Shallow merge: every field of `other` overwrites the same field here.
    pub fn merge_from(&mut self, other: Token) {
        for (key, value) in other.fields {
            self.fields.insert(key, value);
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::deserialize(deserializer)?;
        Token::from_fields(fields).ok_or_else(|| D::Error::missing_field(VALUE_KEY))
    }
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// An ordered namespace group.
///
/// Entries keep insertion order of first encounter; replacing an existing
/// key keeps its original position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    entries: Vec<(String, TokenNode)>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify every member of a raw JSON object.
    pub fn from_map(map: Map<String, Value>) -> Self {
        map.into_iter()
            .map(|(key, value)| (key, TokenNode::from_value(value)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&TokenNode> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut TokenNode> {
        self.entries
            .iter_mut()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace a child. A replaced child keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, node: TokenNode) -> Option<TokenNode> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, node)),
            None => {
                self.entries.push((key, node));
                None
            }
        }
    }

    /// Remove a child, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<TokenNode> {
        let index = self.entries.iter().position(|(name, _)| name == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenNode)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn into_entries(self) -> Vec<(String, TokenNode)> {
        self.entries
    }

    /// Walk a path of segments. Every intermediate segment must be a group.
    pub fn get_path<S: AsRef<str>>(&self, segments: &[S]) -> Option<&TokenNode> {
        let (first, rest) = segments.split_first()?;
        let node = self.get(first.as_ref())?;
        if rest.is_empty() {
            return Some(node);
        }
        node.as_group()?.get_path(rest)
    }

    pub fn get_path_mut<S: AsRef<str>>(&mut self, segments: &[S]) -> Option<&mut TokenNode> {
        let (first, rest) = segments.split_first()?;
        let node = self.get_mut(first.as_ref())?;
        if rest.is_empty() {
            return Some(node);
        }
        node.as_group_mut()?.get_path_mut(rest)
    }

    /// Look up a dotted path such as `palette.blue.100`.
    pub fn lookup(&self, dotted: &str) -> Option<&TokenNode> {
        let segments: Vec<&str> = dotted.split('.').collect();
        self.get_path(&segments)
    }

    /// Every token in the subtree with its dotted path, depth first.
    pub fn tokens(&self) -> Vec<(String, &Token)> {
        let mut out = Vec::new();
        self.collect_tokens("", &mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a Token)>) {
        for (key, node) in &self.entries {
            let path = join_path(prefix, key);
            match node {
                TokenNode::Token(token) => out.push((path, token)),
                TokenNode::Group(group) => group.collect_tokens(&path, out),
                TokenNode::Literal(_) => {}
            }
        }
    }

    /// Dotted paths of every leaf (tokens and literals), depth first.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_leaf_paths("", &mut out);
        out
    }

    fn collect_leaf_paths(&self, prefix: &str, out: &mut Vec<String>) {
        for (key, node) in &self.entries {
            let path = join_path(prefix, key);
            match node {
                TokenNode::Group(group) => group.collect_leaf_paths(&path, out),
                TokenNode::Token(_) | TokenNode::Literal(_) => out.push(path),
            }
        }
    }

    /// Build a new group by passing every token through `f`.
    ///
    /// `f` receives the token's own key, its dotted path from this group,
    /// and an owned copy of the token. Groups and literals are copied as-is;
    /// `self` is left untouched.
    pub fn try_map_tokens<E, F>(&self, mut f: F) -> Result<Group, E>
    where
        F: FnMut(&str, &str, Token) -> Result<Token, E>,
    {
        self.map_tokens_inner("", &mut f)
    }

    fn map_tokens_inner<E, F>(&self, prefix: &str, f: &mut F) -> Result<Group, E>
    where
        F: FnMut(&str, &str, Token) -> Result<Token, E>,
    {
        let mut entries = Vec::with_capacity(self.entries.len());
        for (key, node) in &self.entries {
            let path = join_path(prefix, key);
            let mapped = match node {
                TokenNode::Token(token) => TokenNode::Token(f(key, &path, token.clone())?),
                TokenNode::Group(group) => TokenNode::Group(group.map_tokens_inner(&path, f)?),
                TokenNode::Literal(value) => TokenNode::Literal(value.clone()),
            };
            entries.push((key.clone(), mapped));
        }
        Ok(Group { entries })
    }

    pub fn into_value(self) -> Value {
        Value::Object(
            self.entries
                .into_iter()
                .map(|(key, node)| (key, node.into_value()))
                .collect(),
        )
    }

    pub fn to_value(&self) -> Value {
        self.clone().into_value()
    }
}

impl FromIterator<(String, TokenNode)> for Group {
    fn from_iter<I: IntoIterator<Item = (String, TokenNode)>>(iter: I) -> Self {
        let mut group = Group::new();
        for (key, node) in iter {
            group.insert(key, node);
        }
        group
    }
}

impl Serialize for Group {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, node) in &self.entries {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Group {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(map) => Ok(Group::from_map(map)),
            _ => Err(D::Error::custom("a token group must be a JSON object")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn group(value: Value) -> Group {
        match TokenNode::from_value(value) {
            TokenNode::Group(group) => group,
            other => panic!("expected group, got {}", other.kind()),
        }
    }

    #[test]
    fn object_with_value_is_token() {
        let node = TokenNode::from_value(json!({"value": "#fff", "type": "color"}));
        let token = node.as_token().expect("token");
        assert_eq!(token.value(), &json!("#fff"));
        assert!(token.is_color());
    }

    #[test]
    fn null_value_still_marks_a_token() {
        let node = TokenNode::from_value(json!({"value": null}));
        assert!(node.is_token());
    }

    #[test]
    fn value_key_one_level_down_does_not_mark_the_parent() {
        let tree = group(json!({
            "primary": {
                "fill": {"value": "{palette.blue.100}"},
                "valueScale": {"small": {"value": 1}}
            }
        }));
        let primary = tree.get("primary").unwrap();
        assert!(primary.is_group());
        let scale = primary.as_group().unwrap().get("valueScale").unwrap();
        assert!(scale.is_group());
        assert_eq!(tree.tokens().len(), 2);
    }

    #[test]
    fn scalars_are_literals() {
        let tree = group(json!({"_comment": "generated", "n": 3}));
        assert!(matches!(tree.get("_comment"), Some(TokenNode::Literal(_))));
        assert_eq!(tree.leaf_paths(), vec!["_comment", "n"]);
    }

    #[test]
    fn insertion_order_survives_round_trip() {
        let raw = r#"{"zeta":{"value":1},"alpha":{"b":{"value":2},"a":{"value":3}}}"#;
        let parsed: Group = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), raw);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut g = group(json!({"a": {"value": 1}, "b": {"value": 2}}));
        g.insert("a", TokenNode::Token(Token::new(json!(9))));
        g.insert("c", TokenNode::Token(Token::new(json!(3))));
        assert_eq!(g.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(g.lookup("a").unwrap().as_token().unwrap().value(), &json!(9));
    }

    #[test]
    fn lookup_stops_at_tokens() {
        let g = group(json!({"palette": {"blue": {"100": {"value": "x"}}}}));
        assert!(g.lookup("palette.blue.100").unwrap().is_token());
        assert!(g.lookup("palette.blue.100.value").is_none());
        assert!(g.lookup("palette.red").is_none());
    }

    #[test]
    fn token_remove_keeps_value_and_order() {
        let mut token = Token::from_fields(
            json!({"value": 1, "a": 1, "b": 2, "c": 3})
                .as_object()
                .cloned()
                .unwrap(),
        )
        .unwrap();
        assert_eq!(token.remove("value"), None);
        token.remove("a");
        let keys: Vec<&String> = token.fields().keys().collect();
        assert_eq!(keys, vec!["value", "b", "c"]);
    }

    #[test]
    fn merge_from_is_shallow_right_biased() {
        let mut left = Token::new(json!({"colorSpace": "oklch"})).with_type("color");
        let mut right = Token::new(json!("#000"));
        right.insert("description", json!("dark"));
        left.merge_from(right);
        assert_eq!(left.value(), &json!("#000"));
        assert_eq!(left.token_type(), Some("color"));
        assert_eq!(left.get_str("description"), Some("dark"));
    }

    #[test]
    fn map_tokens_leaves_source_untouched() {
        let source = group(json!({"a": {"b": {"value": 1}}, "note": "x"}));
        let mapped = source
            .try_map_tokens::<(), _>(|key, path, mut token| {
                assert_eq!(key, "b");
                assert_eq!(path, "a.b");
                token.set_value(json!(2));
                Ok(token)
            })
            .unwrap();
        assert_eq!(source.lookup("a.b").unwrap().to_value(), json!({"value": 1}));
        assert_eq!(mapped.lookup("a.b").unwrap().to_value(), json!({"value": 2}));
        assert!(mapped.contains_key("note"));
    }

    proptest! {
        #[test]
        fn discriminator_depends_only_on_value_key(
            keys in proptest::collection::btree_set("[a-z]{1,6}", 0..6),
            with_value in any::<bool>(),
        ) {
            let mut map = Map::new();
            for key in &keys {
                map.insert(key.clone(), json!({"value": 1}));
            }
            if with_value {
                map.insert(VALUE_KEY.to_string(), json!(0));
            }
            let has_value = map.contains_key(VALUE_KEY);
            let node = TokenNode::from_value(Value::Object(map));
            prop_assert_eq!(node.is_token(), has_value);
            prop_assert_eq!(node.is_group(), !has_value);
        }
    }
}
