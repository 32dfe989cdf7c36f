//! # Session
//!
//! [`Engine`] is the single entry point for the form layer. It owns the
//! checked schema, the shared catalog and a derivation, and keeps the most
//! recent submission as an immutable [`Snapshot`].
//!
//! `submit` holds the session lock for the whole validate, derive, replace
//! cycle. Two submissions never interleave, and `current` only ever sees a
//! complete snapshot.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::input::InputMap;
//! use bridge_core::session::Engine;
//! use bridge_core::settings::EngineSettings;
//!
//! let engine = Engine::bridge(EngineSettings::default()).unwrap();
//! assert!(engine.current().is_none());
//!
//! let snapshot = engine.submit(InputMap::new().with("span", 30.0)).unwrap();
//! assert!(!snapshot.validation.ok);
//! assert!(snapshot.derived.is_none());
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::derivation::{derive, Derivation, DerivedResult, GirderBridgeDerivation};
use crate::errors::EngineResult;
use crate::input::InputMap;
use crate::schema::{bridge_schema, FieldSpec, Schema};
use crate::settings::EngineSettings;
use crate::validator::{validate, ValidationResult};

/// One accepted submission: inputs, their validation, and derived values
/// when validation passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Increments with every stored submission, starting at 1
    pub revision: u64,
    pub submitted_at: DateTime<Utc>,
    pub inputs: InputMap,
    pub validation: ValidationResult,
    /// Present iff `validation.ok`
    pub derived: Option<DerivedResult>,
}

pub struct Engine {
    schema: Schema,
    catalog: Arc<Catalog>,
    derivation: Box<dyn Derivation>,
    state: Mutex<Option<Arc<Snapshot>>>,
}

impl Engine {
    pub fn new(schema: Schema, catalog: Arc<Catalog>, derivation: Box<dyn Derivation>) -> Self {
        Engine {
            schema,
            catalog,
            derivation,
            state: Mutex::new(None),
        }
    }

    /// Engine for the highway bridge form on the standard catalog.
    ///
    /// # Errors
    ///
    /// `InvalidSetting` for unusable densities or clearance, or a
    /// configuration error if the bridge schema fails its checks.
    pub fn bridge(settings: EngineSettings) -> EngineResult<Self> {
        settings.check()?;
        let catalog = Catalog::shared();
        let schema = bridge_schema(&catalog)?;
        tracing::info!(
            fields = schema.fields().len(),
            rules = schema.rule_count(),
            code = %settings.design_code,
            "bridge engine ready"
        );
        Ok(Engine::new(schema, catalog, Box::new(GirderBridgeDerivation::new(settings))))
    }

    /// Field specs in declaration order, for rendering the form
    pub fn get_schema(&self) -> &[FieldSpec] {
        self.schema.fields()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Validate, derive on success, and store the result as the current snapshot.
    ///
    /// # Errors
    ///
    /// [`EngineError::Internal`](crate::errors::EngineError::Internal) when
    /// derivation fails on validated input. The previous snapshot is kept.
    pub fn submit(&self, inputs: InputMap) -> EngineResult<Arc<Snapshot>> {
        let mut state = self.state.lock();

        let validation = validate(&inputs, &self.schema, &self.catalog);
        let derived = if validation.ok {
            Some(derive(&inputs, &self.schema, &self.catalog, self.derivation.as_ref())?)
        } else {
            None
        };

        let revision = state.as_ref().map_or(0, |s| s.revision) + 1;
        let snapshot = Arc::new(Snapshot {
            revision,
            submitted_at: Utc::now(),
            inputs,
            validation,
            derived,
        });
        tracing::info!(
            revision,
            ok = snapshot.validation.ok,
            errors = snapshot.validation.error_count(),
            "submission stored"
        );
        *state = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// The last stored snapshot, if anything has been submitted
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.state.lock().clone()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("fields", &self.schema.fields().len())
            .field("rules", &self.schema.rule_count())
            .field("revision", &self.current().map(|s| s.revision))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;
    use crate::input::ValidatedInputs;
    use crate::schema::bridge::{keys, sample_input};
    use crate::schema::{CrossFieldRule, RuleContext};
    use crate::units::Unit;

    /// Doubles the span; fails when asked to
    struct SpanDerivation;

    impl Derivation for SpanDerivation {
        fn derive(
            &self,
            values: &ValidatedInputs,
            _catalog: &Catalog,
        ) -> EngineResult<DerivedResult> {
            let span = values.number("span_length").unwrap_or_default();
            if span == 13.0 {
                return Err(EngineError::internal("unlucky span"));
            }
            let mut out = DerivedResult::new();
            out.insert("double_span", span * 2.0, Unit::Meter, &["span_length"]);
            Ok(out)
        }
    }

    fn pinned_span(ctx: &RuleContext<'_>) -> Result<(), String> {
        match (ctx.values.text("support_type"), ctx.values.number("span_length")) {
            (Some("pinned"), Some(span)) if span > 20.0 => {
                Err("span_length must not exceed 20 when support_type is pinned".to_string())
            }
            _ => Ok(()),
        }
    }

    fn span_engine() -> Engine {
        let schema = Schema::new(
            vec![
                FieldSpec::number("span_length", "Span").with_range(0.0, 50.0).required(),
                FieldSpec::choice("support_type", "Support", &["fixed", "pinned"]).required(),
            ],
            vec![CrossFieldRule::new("pinned_span", &["span_length", "support_type"], pinned_span)],
        )
        .unwrap();
        Engine::new(schema, Catalog::shared(), Box::new(SpanDerivation))
    }

    fn span_input(span: f64, support: &str) -> InputMap {
        InputMap::new().with("span_length", span).with("support_type", support)
    }

    #[test]
    fn test_nothing_submitted_yet() {
        assert!(span_engine().current().is_none());
    }

    #[test]
    fn test_submit_then_current_returns_same_snapshot() {
        let engine = span_engine();
        let snapshot = engine.submit(span_input(25.0, "fixed")).unwrap();
        assert!(snapshot.validation.ok);
        assert_eq!(snapshot.derived.as_ref().unwrap().number("double_span"), Some(50.0));

        let current = engine.current().unwrap();
        assert!(Arc::ptr_eq(&snapshot, &current));
        assert_eq!(current.inputs, span_input(25.0, "fixed"));
    }

    #[test]
    fn test_failed_validation_stores_no_derived() {
        let engine = span_engine();
        let snapshot = engine.submit(span_input(25.0, "pinned")).unwrap();
        assert!(!snapshot.validation.ok);
        assert!(snapshot.derived.is_none());
        assert_eq!(engine.current().unwrap().revision, 1);
    }

    #[test]
    fn test_each_submit_replaces_snapshot() {
        let engine = span_engine();
        engine.submit(span_input(10.0, "fixed")).unwrap();
        let second = engine.submit(span_input(30.0, "pinned")).unwrap();
        assert_eq!(second.revision, 2);
        let current = engine.current().unwrap();
        assert_eq!(current.revision, 2);
        assert!(current.derived.is_none());
    }

    #[test]
    fn test_internal_error_keeps_previous_snapshot() {
        let engine = span_engine();
        engine.submit(span_input(10.0, "fixed")).unwrap();
        let err = engine.submit(span_input(13.0, "fixed")).unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        let current = engine.current().unwrap();
        assert_eq!(current.revision, 1);
        assert_eq!(current.derived.as_ref().unwrap().number("double_span"), Some(20.0));
    }

    #[test]
    fn test_concurrent_submits_never_interleave() {
        let engine = Arc::new(span_engine());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    for j in 0..10 {
                        let span = 20.0 + f64::from(i) + f64::from(j % 5);
                        let snapshot = engine.submit(span_input(span, "fixed")).unwrap();
                        let derived = snapshot.derived.as_ref().unwrap();
                        assert_eq!(derived.number("double_span"), Some(span * 2.0));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let current = engine.current().unwrap();
        assert_eq!(current.revision, 80);
        assert_eq!(current.derived.is_some(), current.validation.ok);
    }

    #[test]
    fn test_bridge_engine() {
        let engine = Engine::bridge(EngineSettings::default()).unwrap();
        assert_eq!(engine.get_schema()[2].name, keys::SPAN);

        let snapshot = engine.submit(sample_input()).unwrap();
        assert!(snapshot.validation.ok, "{:#?}", snapshot.validation);
        let derived = snapshot.derived.as_ref().unwrap();
        assert_eq!(derived.integer("no_of_girders"), Some(5));

        let json = serde_json::to_string(snapshot.as_ref()).unwrap();
        let roundtrip: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.revision, 1);
        assert!(roundtrip.derived.is_some());
    }

    #[test]
    fn test_bridge_engine_refuses_bad_settings() {
        let settings = EngineSettings {
            steel_density: -78.5,
            ..EngineSettings::default()
        };
        let err = Engine::bridge(settings).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SETTING");
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }
}
