//! # Input and Value Types
//!
//! [`InputMap`] is what the form layer hands to the engine: field name to the
//! raw value typed by the user, exactly as JSON would carry it. The validator
//! coerces raw values into [`FieldValue`]s, collected in [`ValidatedInputs`].
//!
//! ```rust
//! use bridge_core::input::{InputMap, RawValue};
//!
//! let input = InputMap::new()
//!     .with("span", 30.0)
//!     .with("footpath", "Both");
//!
//! assert_eq!(input.get("span"), Some(&RawValue::Number(30.0)));
//!
//! let json = serde_json::to_string(&input).unwrap();
//! assert_eq!(json, r#"{"footpath":"Both","span":30.0}"#);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A value as submitted by the form, before any coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// JSON `null`, treated the same as an absent key
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    /// True for `null` and for blank text (an emptied text box)
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Null => write!(f, "null"),
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(value as f64)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// Field name to raw value, as collected from the form widgets.
///
/// Ordered by name so serialization and iteration are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputMap(BTreeMap<String, RawValue>);

impl InputMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value (builder pattern)
    pub fn with(mut self, field: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<RawValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<RawValue> {
        self.0.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.0.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RawValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for InputMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = InputMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// A coerced field value, or a derived value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric view (integers widen to f64)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Coerced values of the fields that passed their own checks.
///
/// Optional fields that were left empty carry their default, or are absent
/// when they have none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatedInputs(BTreeMap<String, FieldValue>);

impl ValidatedInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.0.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_f64)
    }

    pub fn integer(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(FieldValue::as_i64)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_str)
    }

    /// True when the field holds exactly this text
    pub fn is(&self, field: &str, expected: &str) -> bool {
        self.text(field) == Some(expected)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_value_from_json() {
        let json = r#"{"span": 25, "footpath": "None", "skew": null, "flag": true}"#;
        let input: InputMap = serde_json::from_str(json).unwrap();
        assert_eq!(input.get("span"), Some(&RawValue::Number(25.0)));
        assert_eq!(input.get("footpath"), Some(&RawValue::Text("None".to_string())));
        assert_eq!(input.get("skew"), Some(&RawValue::Null));
        assert_eq!(input.get("flag"), Some(&RawValue::Bool(true)));
    }

    #[test]
    fn test_blank_values() {
        assert!(RawValue::Null.is_blank());
        assert!(RawValue::from("   ").is_blank());
        assert!(!RawValue::from("0").is_blank());
        assert!(!RawValue::from(0.0).is_blank());
    }

    #[test]
    fn test_collect_input_map() {
        let input: InputMap = vec![("a", 1.0), ("b", 2.0)].into_iter().collect();
        assert_eq!(input.len(), 2);
        assert_eq!(input.get("b"), Some(&RawValue::Number(2.0)));
    }

    #[test]
    fn test_field_value_views() {
        assert_eq!(FieldValue::Integer(4).as_f64(), Some(4.0));
        assert_eq!(FieldValue::Number(4.5).as_i64(), None);
        assert_eq!(FieldValue::from("Yes").as_str(), Some("Yes"));
    }

    #[test]
    fn test_validated_inputs_accessors() {
        let mut values = ValidatedInputs::new();
        values.insert("span", FieldValue::Number(30.0));
        values.insert("footpath", FieldValue::from("Both"));
        assert_eq!(values.number("span"), Some(30.0));
        assert!(values.is("footpath", "Both"));
        assert!(!values.contains("skew_angle"));
    }
}
