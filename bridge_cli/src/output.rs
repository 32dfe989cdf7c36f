//! Plain-text rendering for terminal output.

use std::fmt::Write;

use bridge_core::catalog::Catalog;
use bridge_core::schema::{FieldKind, FieldSpec, Schema};
use bridge_core::session::Snapshot;

const RULE: &str = "════════════════════════════════════════════════════════════";

/// Fields grouped by form section, in declaration order
pub fn schema_text(fields: &[FieldSpec]) -> String {
    let mut out = String::new();
    let mut group = None;
    for field in fields {
        if group != Some(field.group.as_str()) {
            group = Some(field.group.as_str());
            let _ = writeln!(out, "\n{}\n{RULE}", field.group);
        }
        let marker = if field.required { "*" } else { " " };
        let constraint = match field.kind {
            FieldKind::Choice => format!("one of {}", field.choices.join(" | ")),
            FieldKind::Text => "text".to_string(),
            FieldKind::Number | FieldKind::Integer => field.range_text(),
        };
        let _ = writeln!(out, "{marker} {:<28} {:<32} {constraint}", field.name, field.label);
        if let Some(default) = &field.default {
            let _ = writeln!(out, "  {:<28} default {default}", "");
        }
    }
    out
}

pub fn catalog_text(catalog: &Catalog) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Steel grades (IS 2062)\n{RULE}");
    for grade in &catalog.steel_grades {
        let _ = writeln!(
            out,
            "  {:<10} fy {:>4.0} MPa   fu {:>4.0} MPa",
            grade.designation, grade.yield_strength.0, grade.ultimate_strength.0
        );
    }

    let _ = writeln!(out, "\nConcrete grades\n{RULE}");
    for grade in &catalog.concrete_grades {
        let _ = writeln!(out, "  {:<10} fck {:>3.0} MPa", grade.designation, grade.fck.0);
    }

    let _ = writeln!(out, "\nReinforcement\n{RULE}");
    for grade in &catalog.reinforcement_grades {
        let _ = writeln!(out, "  {:<10} fy {:>4.0} MPa", grade.designation, grade.fy.0);
    }

    let _ = writeln!(out, "\nRolled sections (IS 808)\n{RULE}");
    for section in &catalog.rolled_sections {
        let _ = writeln!(
            out,
            "  {:<10} {:>6.1} kg/m   D {:>4.0} mm   bf {:>4.0} mm",
            section.designation, section.mass_kg_per_m, section.depth.0, section.flange_width.0
        );
    }
    out
}

/// Errors when validation failed, derived values when it passed
pub fn snapshot_text(snapshot: &Snapshot, schema: &Schema) -> String {
    let mut out = String::new();
    let validation = &snapshot.validation;

    if validation.ok {
        let _ = writeln!(out, "{RULE}\n  INPUTS VALID (revision {})\n{RULE}", snapshot.revision);
    } else {
        let _ = writeln!(out, "{RULE}\n  {} VALIDATION ERROR(S)\n{RULE}", validation.error_count());
    }

    for (name, error) in &validation.field_errors {
        let label = schema.field(name).map_or(name.as_str(), |f| f.label.as_str());
        let _ = writeln!(out, "  ✗ {label} [{}]: {}", error.kind, error.message);
    }
    for error in &validation.global_errors {
        let fields = error.fields.join(", ");
        let _ = writeln!(out, "  ✗ {} ({}): {}", error.rule, fields, error.message);
    }

    if let Some(derived) = &snapshot.derived {
        let _ = writeln!(out, "\nDerived values\n{RULE}");
        for (name, value) in derived.iter() {
            let _ = writeln!(out, "  {:<28} {} {}", name, value.value, value.unit);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::input::InputMap;
    use bridge_core::session::Engine;
    use bridge_core::settings::EngineSettings;

    #[test]
    fn test_schema_text_lists_groups_and_fields() {
        let engine = Engine::bridge(EngineSettings::default()).unwrap();
        let text = schema_text(engine.get_schema());
        assert!(text.contains("span"));
        assert!(text.contains("one of No | Yes"));
        for field in engine.get_schema() {
            assert!(text.contains(&field.group));
        }
    }

    #[test]
    fn test_catalog_text() {
        let catalog = Catalog::standard();
        let text = catalog_text(&catalog);
        assert!(text.contains("E 250A"));
        assert!(text.contains("M 30"));
        assert!(text.contains("ISMB 600"));
    }

    #[test]
    fn test_failed_snapshot_text_uses_labels() {
        let engine = Engine::bridge(EngineSettings::default()).unwrap();
        let snapshot = engine.submit(InputMap::new().with("span", 60.0)).unwrap();
        let text = snapshot_text(&snapshot, engine.schema());
        assert!(text.contains("VALIDATION ERROR(S)"));
        assert!(text.contains("Span [out of range]"));
        assert!(!text.contains("Derived values"));
    }
}
