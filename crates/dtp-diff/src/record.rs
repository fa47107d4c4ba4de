//! Change records produced by the visual diff.

use serde::{Deserialize, Serialize};

/// Old and new swatches of a color token.
///
/// `*_color` is the form used to render a swatch, `*_label` the text shown
/// on it. An empty previous side means the token is new.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorChange {
    pub new_color: String,
    pub new_color_label: String,
    pub prev_color: String,
    pub prev_color_label: String,
}

/// Old and new serialized values of a non-color token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueChange {
    pub new_value: String,
    pub prev_value: String,
}

/// Exactly one pair is populated, depending on whether the token is a color.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Change {
    Color(ColorChange),
    Value(ValueChange),
}

/// One changed or new token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRecord {
    /// Dotted path of the token.
    pub token: String,
    #[serde(flatten)]
    pub change: Change,
}

impl DiffRecord {
    pub fn color(token: impl Into<String>, change: ColorChange) -> Self {
        Self {
            token: token.into(),
            change: Change::Color(change),
        }
    }

    pub fn value(token: impl Into<String>, new_value: String, prev_value: String) -> Self {
        Self {
            token: token.into(),
            change: Change::Value(ValueChange {
                new_value,
                prev_value,
            }),
        }
    }

    pub fn is_color(&self) -> bool {
        matches!(self.change, Change::Color(_))
    }

    /// Whether the token did not exist in the baseline.
    pub fn is_new(&self) -> bool {
        match &self.change {
            Change::Color(c) => c.prev_color.is_empty(),
            Change::Value(v) => v.prev_value.is_empty(),
        }
    }
}

/// The records of one token file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    /// Path relative to the token root.
    pub filename: String,
    pub records: Vec<DiffRecord>,
}

impl FileDiff {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn additions(&self) -> usize {
        self.records.iter().filter(|r| r.is_new()).count()
    }

    pub fn modifications(&self) -> usize {
        self.records.iter().filter(|r| !r.is_new()).count()
    }
}
