//! # Field Schema
//!
//! Declarative description of every form input: its kind, unit, bounds or
//! choices, which fields it depends on, and whether it must be filled in.
//! Cross-field rules sit beside the field specs and are evaluated by the
//! validator once every field has passed its own checks.
//!
//! A [`Schema`] is checked once when it is built. Duplicate names, dangling
//! dependencies, rules naming unknown fields, defaults that fail their own
//! field, and dependency cycles are configuration errors: the engine refuses
//! to start rather than validating against a broken schema.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::schema::{CrossFieldRule, FieldSpec, Schema};
//! use bridge_core::units::Unit;
//!
//! let schema = Schema::new(
//!     vec![
//!         FieldSpec::number("span_length", "Span")
//!             .with_unit(Unit::Meter)
//!             .with_range(0.0, 50.0)
//!             .required(),
//!         FieldSpec::choice("support_type", "Support", &["fixed", "pinned"])
//!             .required(),
//!     ],
//!     vec![CrossFieldRule::new(
//!         "pinned_span",
//!         &["span_length", "support_type"],
//!         |ctx| match (ctx.values.text("support_type"), ctx.values.number("span_length")) {
//!             (Some("pinned"), Some(span)) if span > 20.0 => {
//!                 Err(format!("span_length {} m exceeds 20 m for a pinned support_type", span))
//!             }
//!             _ => Ok(()),
//!         },
//!     )],
//! )
//! .unwrap();
//!
//! assert_eq!(schema.fields().len(), 2);
//! ```

pub mod bridge;

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::errors::{EngineError, EngineResult};
use crate::input::{FieldValue, ValidatedInputs};
use crate::units::Unit;

pub use bridge::bridge_schema;

// ============================================================================
// Field Specs
// ============================================================================

/// What kind of value a field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Any finite real number
    Number,
    /// A whole number
    Integer,
    /// One of a fixed list of strings
    Choice,
    /// Free text
    Text,
}

impl FieldKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Number | FieldKind::Integer)
    }
}

/// Declarative description of one input field. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Key in the input map
    pub name: String,
    /// Human-readable label
    pub label: String,
    /// Form section the field belongs to
    pub group: String,
    pub kind: FieldKind,
    pub unit: Unit,
    /// Inclusive lower bound (numeric kinds)
    pub min: Option<f64>,
    /// Inclusive upper bound (numeric kinds)
    pub max: Option<f64>,
    /// Allowed values (choice kind), in display order
    pub choices: Vec<String>,
    /// Fields whose values this field's rules read
    pub depends_on: Vec<String>,
    pub required: bool,
    /// Value used when an optional field is left empty
    pub default: Option<FieldValue>,
}

impl FieldSpec {
    fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        FieldSpec {
            name: name.to_string(),
            label: label.to_string(),
            group: String::new(),
            kind,
            unit: Unit::None,
            min: None,
            max: None,
            choices: Vec::new(),
            depends_on: Vec::new(),
            required: false,
            default: None,
        }
    }

    pub fn number(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn integer(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Integer)
    }

    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn choice<S: AsRef<str>>(name: &str, label: &str, choices: &[S]) -> Self {
        let mut spec = Self::new(name, label, FieldKind::Choice);
        spec.choices = choices.iter().map(|c| c.as_ref().to_string()).collect();
        spec
    }

    pub fn with_group(mut self, group: &str) -> Self {
        self.group = group.to_string();
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn depends_on(mut self, fields: &[&str]) -> Self {
        for field in fields {
            if !self.depends_on.iter().any(|d| d == field) {
                self.depends_on.push(field.to_string());
            }
        }
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Bounds as text for messages, e.g. "[20, 45] m"
    pub fn range_text(&self) -> String {
        let unit = if self.unit == Unit::None {
            String::new()
        } else {
            format!(" {}", self.unit.symbol())
        };
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("[{}, {}]{}", min, max, unit),
            (Some(min), None) => format!(">= {}{}", min, unit),
            (None, Some(max)) => format!("<= {}{}", max, unit),
            (None, None) => "any value".to_string(),
        }
    }

    /// Check the field's own default against its kind, bounds and choices
    fn check_default(&self) -> EngineResult<()> {
        let Some(default) = &self.default else {
            return Ok(());
        };
        let reason = match (self.kind, default) {
            (FieldKind::Choice, FieldValue::Text(s)) if !self.choices.contains(s) => {
                Some(format!("'{}' is not one of the choices", s))
            }
            (FieldKind::Choice | FieldKind::Text, FieldValue::Text(_)) => None,
            (FieldKind::Integer, FieldValue::Integer(_))
            | (FieldKind::Number, FieldValue::Number(_)) => {
                let value = default.as_f64().unwrap_or_default();
                let below = self.min.is_some_and(|min| value < min);
                let above = self.max.is_some_and(|max| value > max);
                (below || above).then(|| format!("{} is outside {}", value, self.range_text()))
            }
            _ => Some(format!("{} does not match kind {:?}", default, self.kind)),
        };
        match reason {
            Some(reason) => Err(EngineError::invalid_default(&self.name, reason)),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Cross-Field Rules
// ============================================================================

/// What a rule sees when it runs
pub struct RuleContext<'a> {
    /// Coerced values of fields that passed their own checks
    pub values: &'a ValidatedInputs,
    pub catalog: &'a Catalog,
}

/// Rule body: `Err(message)` when the combination of values is inconsistent
pub type RuleCheck = fn(&RuleContext<'_>) -> Result<(), String>;

/// A constraint over several fields
#[derive(Clone)]
pub struct CrossFieldRule {
    /// Stable identifier reported with violations
    pub id: String,
    /// Fields the rule reads; it is skipped if any of them failed its own checks
    pub fields: Vec<String>,
    pub check: RuleCheck,
}

impl CrossFieldRule {
    pub fn new(id: &str, fields: &[&str], check: RuleCheck) -> Self {
        CrossFieldRule {
            id: id.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            check,
        }
    }
}

impl std::fmt::Debug for CrossFieldRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossFieldRule")
            .field("id", &self.id)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Schema
// ============================================================================

/// A checked set of field specs and rules.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    rules: Vec<CrossFieldRule>,
    /// Field indices in dependency order
    order: Vec<usize>,
    /// Rule indices in evaluation order
    rule_order: Vec<usize>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Check and build a schema.
    ///
    /// # Errors
    ///
    /// A configuration error on duplicate names, dangling dependencies, rules
    /// naming unknown fields, invalid defaults, or a dependency cycle.
    pub fn new(fields: Vec<FieldSpec>, rules: Vec<CrossFieldRule>) -> EngineResult<Self> {
        let mut index = HashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            if index.insert(field.name.clone(), i).is_some() {
                return Err(EngineError::duplicate_field(&field.name));
            }
        }

        for field in &fields {
            for dep in &field.depends_on {
                if !index.contains_key(dep) {
                    return Err(EngineError::dangling_dependency(&field.name, dep));
                }
            }
            field.check_default()?;
        }

        for rule in &rules {
            for name in &rule.fields {
                if !index.contains_key(name) {
                    return Err(EngineError::unknown_rule_field(&rule.id, name));
                }
            }
        }

        let order = topological_order(&fields, &index)?;

        // A rule runs once the last of its fields (in dependency order) is settled
        let mut position = vec![0; fields.len()];
        for (pos, &i) in order.iter().enumerate() {
            position[i] = pos;
        }
        let mut rule_order: Vec<usize> = (0..rules.len()).collect();
        rule_order.sort_by_key(|&r| {
            let last = rules[r]
                .fields
                .iter()
                .filter_map(|f| index.get(f))
                .map(|&i| position[i])
                .max()
                .unwrap_or(0);
            (last, r)
        });

        tracing::debug!(fields = fields.len(), rules = rules.len(), "schema checked");

        Ok(Schema {
            fields,
            rules,
            order,
            rule_order,
            index,
        })
    }

    /// Field specs in declaration order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Field specs in dependency order (every field after the fields it depends on)
    pub fn dependency_order(&self) -> impl Iterator<Item = &FieldSpec> {
        self.order.iter().map(move |&i| &self.fields[i])
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> impl Iterator<Item = &CrossFieldRule> {
        self.rule_order.iter().map(move |&r| &self.rules[r])
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

/// Kahn's algorithm, always releasing the lowest declaration index first so
/// the order is deterministic.
fn topological_order(
    fields: &[FieldSpec],
    index: &HashMap<String, usize>,
) -> EngineResult<Vec<usize>> {
    let n = fields.len();
    let mut indegree = vec![0usize; n];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, field) in fields.iter().enumerate() {
        for dep in &field.depends_on {
            let d = index[dep];
            dependents[d].push(i);
            indegree[i] += 1;
        }
    }

    let mut ready: std::collections::BTreeSet<usize> =
        (0..n).filter(|&i| indegree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(i) = ready.pop_first() {
        order.push(i);
        for &j in &dependents[i] {
            indegree[j] -= 1;
            if indegree[j] == 0 {
                ready.insert(j);
            }
        }
    }

    if order.len() < n {
        let remaining: HashSet<usize> = (0..n).filter(|&i| indegree[i] > 0).collect();
        return Err(EngineError::DependencyCycle {
            cycle: find_cycle(fields, index, &remaining),
        });
    }
    Ok(order)
}

/// Walk dependency edges among the unsorted fields until a field repeats.
/// Every unsorted field has at least one unsorted dependency, so the walk
/// always closes a cycle.
fn find_cycle(
    fields: &[FieldSpec],
    index: &HashMap<String, usize>,
    remaining: &HashSet<usize>,
) -> Vec<String> {
    let Some(&start) = remaining.iter().min() else {
        return Vec::new();
    };
    let mut seen: BTreeMap<usize, usize> = BTreeMap::new();
    let mut path = Vec::new();
    let mut current = start;
    loop {
        if let Some(&at) = seen.get(&current) {
            let mut cycle: Vec<String> =
                path[at..].iter().map(|&i: &usize| fields[i].name.clone()).collect();
            cycle.push(fields[current].name.clone());
            return cycle;
        }
        seen.insert(current, path.len());
        path.push(current);
        let next = fields[current]
            .depends_on
            .iter()
            .map(|d| index[d])
            .find(|d| remaining.contains(d));
        match next {
            Some(next) => current = next,
            None => return path.iter().map(|&i| fields[i].name.clone()).collect(),
        }
    }
}
