//! # Validator
//!
//! Checks a submitted [`InputMap`] against a [`Schema`] in two passes:
//!
//! 1. **Field checks.** Every field is checked on its own: presence when
//!    required, coercion to its kind, then bounds. All field problems are
//!    reported together.
//! 2. **Cross-field rules.** Rules run in dependency order over the coerced
//!    values. A rule that reads a field with a field error is skipped, so a
//!    bad value is reported once and not again as a rule violation.
//!
//! Validation never fails: malformed input produces a [`ValidationResult`]
//! with errors, not an `Err`.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::catalog::Catalog;
//! use bridge_core::input::InputMap;
//! use bridge_core::schema::{FieldSpec, Schema};
//! use bridge_core::validator::{validate, FieldErrorKind};
//!
//! let schema = Schema::new(
//!     vec![FieldSpec::number("span_length", "Span").with_range(0.0, 50.0).required()],
//!     vec![],
//! )
//! .unwrap();
//!
//! let input = InputMap::new().with("span_length", "abc");
//! let result = validate(&input, &schema, &Catalog::standard());
//!
//! assert!(!result.ok);
//! assert_eq!(result.field_errors["span_length"].kind, FieldErrorKind::InvalidType);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::input::{FieldValue, InputMap, RawValue, ValidatedInputs};
use crate::schema::{FieldKind, FieldSpec, RuleContext, Schema};

// ============================================================================
// Result Types
// ============================================================================

/// Why a single field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldErrorKind {
    #[serde(rename = "missing")]
    Missing,
    #[serde(rename = "invalid type")]
    InvalidType,
    #[serde(rename = "invalid value")]
    InvalidValue,
    #[serde(rename = "out of range")]
    OutOfRange,
}

impl FieldErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldErrorKind::Missing => "missing",
            FieldErrorKind::InvalidType => "invalid type",
            FieldErrorKind::InvalidValue => "invalid value",
            FieldErrorKind::OutOfRange => "out of range",
        }
    }
}

impl std::fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    /// Message for display next to the field
    pub message: String,
}

impl FieldError {
    fn new(kind: FieldErrorKind, message: impl Into<String>) -> Self {
        FieldError {
            kind,
            message: message.into(),
        }
    }
}

/// A violated cross-field rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalError {
    /// Rule identifier
    pub rule: String,
    /// Fields the rule reads
    pub fields: Vec<String>,
    pub message: String,
}

/// Outcome of one validation call
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff there are no field errors and no global errors
    pub ok: bool,
    pub field_errors: BTreeMap<String, FieldError>,
    /// In rule evaluation order
    pub global_errors: Vec<GlobalError>,
}

impl ValidationResult {
    pub fn error_count(&self) -> usize {
        self.field_errors.len() + self.global_errors.len()
    }

    /// Global errors raised by a given rule
    pub fn rule_error(&self, rule: &str) -> Option<&GlobalError> {
        self.global_errors.iter().find(|e| e.rule == rule)
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Validate an input map against a schema.
pub fn validate(input: &InputMap, schema: &Schema, catalog: &Catalog) -> ValidationResult {
    for (key, _) in input.iter() {
        if schema.field(key).is_none() {
            tracing::debug!(field = %key, "ignoring input not in schema");
        }
    }

    let (values, field_errors) = coerce_inputs(input, schema);

    let ctx = RuleContext {
        values: &values,
        catalog,
    };
    let mut global_errors = Vec::new();
    for rule in schema.rules() {
        if let Some(bad) = rule.fields.iter().find(|f| field_errors.contains_key(f.as_str())) {
            tracing::trace!(rule = %rule.id, field = %bad, "rule skipped");
            continue;
        }
        if let Err(message) = (rule.check)(&ctx) {
            global_errors.push(GlobalError {
                rule: rule.id.clone(),
                fields: rule.fields.clone(),
                message,
            });
        }
    }

    let ok = field_errors.is_empty() && global_errors.is_empty();
    tracing::debug!(
        ok,
        field_errors = field_errors.len(),
        global_errors = global_errors.len(),
        "validation finished"
    );

    ValidationResult {
        ok,
        field_errors,
        global_errors,
    }
}

/// Run the field checks alone: coerced values of the fields that passed,
/// and errors for the ones that did not.
pub(crate) fn coerce_inputs(
    input: &InputMap,
    schema: &Schema,
) -> (ValidatedInputs, BTreeMap<String, FieldError>) {
    let mut values = ValidatedInputs::new();
    let mut errors = BTreeMap::new();

    for spec in schema.fields() {
        let raw = input.get(&spec.name).filter(|raw| !raw.is_blank());
        let Some(raw) = raw else {
            if spec.required {
                errors.insert(
                    spec.name.clone(),
                    FieldError::new(FieldErrorKind::Missing, format!("{} is required", spec.label)),
                );
            } else if let Some(default) = &spec.default {
                values.insert(spec.name.clone(), default.clone());
            }
            continue;
        };

        match coerce(spec, raw).and_then(|value| check_bounds(spec, value)) {
            Ok(value) => values.insert(spec.name.clone(), value),
            Err(error) => {
                errors.insert(spec.name.clone(), error);
            }
        }
    }

    (values, errors)
}

fn coerce(spec: &FieldSpec, raw: &RawValue) -> Result<FieldValue, FieldError> {
    match spec.kind {
        FieldKind::Number | FieldKind::Integer => {
            let number = match raw {
                RawValue::Number(n) => Some(*n),
                RawValue::Text(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }
            .filter(|n| n.is_finite());
            let Some(number) = number else {
                return Err(FieldError::new(
                    FieldErrorKind::InvalidType,
                    format!("{} must be a number, got {}", spec.label, raw),
                ));
            };
            if spec.kind == FieldKind::Number {
                return Ok(FieldValue::Number(number));
            }
            if number.fract() != 0.0 || number.abs() > i64::MAX as f64 {
                return Err(FieldError::new(
                    FieldErrorKind::InvalidType,
                    format!("{} must be a whole number, got {}", spec.label, raw),
                ));
            }
            Ok(FieldValue::Integer(number as i64))
        }
        FieldKind::Choice => {
            let text = match raw {
                RawValue::Text(s) => Some(s.trim().to_string()),
                RawValue::Number(n) => Some(canonical_number(*n)),
                _ => None,
            };
            match text {
                Some(text) if spec.choices.contains(&text) => Ok(FieldValue::Text(text)),
                _ => Err(FieldError::new(
                    FieldErrorKind::InvalidValue,
                    format!("{} is not an allowed {}", raw, spec.label),
                )),
            }
        }
        FieldKind::Text => match raw {
            RawValue::Text(s) => Ok(FieldValue::Text(s.trim().to_string())),
            _ => Err(FieldError::new(
                FieldErrorKind::InvalidType,
                format!("{} must be text, got {}", spec.label, raw),
            )),
        },
    }
}

fn check_bounds(spec: &FieldSpec, value: FieldValue) -> Result<FieldValue, FieldError> {
    let Some(number) = value.as_f64() else {
        return Ok(value);
    };
    let below = spec.min.is_some_and(|min| number < min);
    let above = spec.max.is_some_and(|max| number > max);
    if below || above {
        return Err(FieldError::new(
            FieldErrorKind::OutOfRange,
            format!("{} {} is outside {}", spec.label, number, spec.range_text()),
        ));
    }
    Ok(value)
}

/// Text a number would have been typed as: "12" rather than "12.0"
fn canonical_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
