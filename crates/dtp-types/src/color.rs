//! Structured OKLCH color values.
//!
//! Source files carry colors as
//! `{"colorSpace": "oklch", "components": [L, C, H], "alpha": A, "hex": "#..."}`.
//! Exports and reports use the CSS string forms.

use serde_json::{json, Value};

use crate::error::TypeError;
use crate::number::format_scalar;

pub const OKLCH: &str = "oklch";

/// A parsed OKLCH color object.
#[derive(Clone, Debug, PartialEq)]
pub struct OklchColor {
    /// Lightness, chroma, hue. Usually numbers; kept verbatim.
    pub components: Vec<Value>,
    /// A number or string; anything else has been defaulted to `1`.
    pub alpha: Value,
    /// The hex fallback carried by the source object.
    pub hex: Option<String>,
}

impl OklchColor {
    /// Whether `value` is an object with `colorSpace: "oklch"`.
    pub fn is_oklch(value: &Value) -> bool {
        value.get("colorSpace").and_then(Value::as_str) == Some(OKLCH)
    }

    /// Parse a structured color.
    ///
    /// Returns `Ok(None)` for anything that is not an OKLCH object and an
    /// error for an OKLCH object without a `components` list.
    pub fn from_value(value: &Value) -> Result<Option<Self>, TypeError> {
        if !Self::is_oklch(value) {
            return Ok(None);
        }
        let components = value
            .get("components")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| TypeError::MalformedColor("missing components list".into()))?;
        let alpha = match value.get("alpha") {
            Some(alpha @ (Value::Number(_) | Value::String(_))) => alpha.clone(),
            _ => json!(1),
        };
        let hex = value.get("hex").and_then(Value::as_str).map(str::to_string);
        Ok(Some(Self {
            components,
            alpha,
            hex,
        }))
    }

    fn joined(&self, separator: &str) -> String {
        self.components
            .iter()
            .map(format_scalar)
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// `oklch(L C H / A)`
    pub fn css(&self) -> String {
        format!("oklch({} / {})", self.joined(" "), format_scalar(&self.alpha))
    }

    /// `oklch(L,C,H,A)`, the form used in swatch URLs.
    pub fn css_with_commas(&self) -> String {
        format!("oklch({},{})", self.joined(","), format_scalar(&self.alpha))
    }

    /// Replace the alpha component.
    pub fn with_alpha(mut self, alpha: Value) -> Self {
        self.alpha = alpha;
        self
    }

    /// The lightness component as a number, if it is one.
    pub fn lightness(&self) -> Option<f64> {
        self.components.first().and_then(|l| match l {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_component(s),
            _ => None,
        })
    }
}

/// Lightness of a CSS `oklch(...)` string in either the space or comma form.
pub fn parse_lightness(css: &str) -> Option<f64> {
    let inner = css.trim().strip_prefix("oklch(")?;
    let first = inner
        .split(|c: char| c == ' ' || c == ',' || c == '/' || c == ')')
        .find(|part| !part.is_empty())?;
    parse_component(first)
}

fn parse_component(text: &str) -> Option<f64> {
    match text.strip_suffix('%') {
        Some(percent) => percent.parse::<f64>().ok().map(|p| p / 100.0),
        None => text.parse::<f64>().ok(),
    }
}
