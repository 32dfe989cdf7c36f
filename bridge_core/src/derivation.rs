//! # Derivation Engine
//!
//! Computes dependent quantities from inputs that passed validation. Every
//! derived value records which input fields it was computed from, so the UI
//! can explain a number or grey it out when one of its inputs changes.
//!
//! [`derive`] re-coerces the input map through the schema and hands the
//! coerced values to a [`Derivation`]. A derivation is a pure function of
//! those values and the catalog: no clock, no randomness, ordered output.
//!
//! A failure here means validation let through something derivation cannot
//! handle (for example a choice with no catalog row). That is a defect, so it
//! comes back as [`EngineError::Internal`] rather than as a validation error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::steel::STEEL_MODULUS_E;
use crate::catalog::{footpath_count, Catalog, GIRDER_PLATE, UNSYMMETRICAL};
use crate::errors::{EngineError, EngineResult};
use crate::geometry::{
    effective_girder_spacing, girder_count, ComponentKind, CrossSectionLayout, LoadPlacement,
};
use crate::input::{FieldValue, InputMap, ValidatedInputs};
use crate::schema::bridge::keys::*;
use crate::schema::Schema;
use crate::sections::{PlateGirder, SectionProperties};
use crate::settings::EngineSettings;
use crate::units::{KnPerM2, KnPerM3, Meters, Millimeters, Unit};
use crate::validator::coerce_inputs;

// ============================================================================
// Derived Results
// ============================================================================

/// A computed quantity and where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedValue {
    pub value: FieldValue,
    pub unit: Unit,
    /// Input fields that contributed
    pub inputs: Vec<String>,
}

/// Derived name to value, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DerivedResult(BTreeMap<String, DerivedValue>);

impl DerivedResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
        unit: Unit,
        inputs: &[&str],
    ) {
        self.0.insert(
            name.to_string(),
            DerivedValue {
                value: value.into(),
                unit,
                inputs: inputs.iter().map(|s| s.to_string()).collect(),
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&DerivedValue> {
        self.0.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|d| d.value.as_f64())
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|d| d.value.as_i64())
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|d| d.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DerivedValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// Derivation Seam
// ============================================================================

/// Computes derived quantities from validated values
pub trait Derivation: Send + Sync {
    fn derive(&self, values: &ValidatedInputs, catalog: &Catalog) -> EngineResult<DerivedResult>;
}

/// Derive quantities for an input map that passed validation.
///
/// # Errors
///
/// [`EngineError::Internal`] when the input fails re-coercion or the
/// derivation cannot complete.
pub fn derive(
    input: &InputMap,
    schema: &Schema,
    catalog: &Catalog,
    derivation: &dyn Derivation,
) -> EngineResult<DerivedResult> {
    let (values, errors) = coerce_inputs(input, schema);
    if let Some((field, error)) = errors.iter().next() {
        let err = EngineError::internal(format!(
            "derivation called with invalid input: {} ({}: {})",
            field, error.kind, error.message
        ));
        tracing::error!(error = %err, "derivation rejected input");
        return Err(err);
    }

    derivation.derive(&values, catalog).inspect_err(|err| {
        tracing::error!(error = %err, "derivation failed on validated input");
    })
}

fn number(values: &ValidatedInputs, field: &str) -> EngineResult<f64> {
    values
        .number(field)
        .ok_or_else(|| EngineError::internal(format!("validated value for '{}' is missing", field)))
}

fn text<'a>(values: &'a ValidatedInputs, field: &str) -> EngineResult<&'a str> {
    values
        .text(field)
        .ok_or_else(|| EngineError::internal(format!("validated value for '{}' is missing", field)))
}

fn lookup<'a, T>(entry: Option<&'a T>, table: &str, name: &str) -> EngineResult<&'a T> {
    entry.ok_or_else(|| {
        EngineError::internal(format!(
            "'{}' passed validation but is not in the {} table",
            name, table
        ))
    })
}

// ============================================================================
// Girder Bridge
// ============================================================================

/// Derived quantities of the plate girder highway bridge form
#[derive(Debug, Clone, Default)]
pub struct GirderBridgeDerivation {
    pub settings: EngineSettings,
}

impl GirderBridgeDerivation {
    pub fn new(settings: EngineSettings) -> Self {
        GirderBridgeDerivation { settings }
    }

    fn geometry(&self, values: &ValidatedInputs, out: &mut DerivedResult) -> EngineResult<()> {
        let span = Meters(number(values, SPAN)?);
        let layout = CrossSectionLayout::from_values(values);
        let width = layout.total_width();
        let placement = LoadPlacement::new(span, &layout);

        let carriageway = layout
            .components()
            .iter()
            .filter(|c| {
                matches!(c.kind, ComponentKind::CarriagewayLeft | ComponentKind::CarriagewayRight)
            })
            .map(|c| c.width.0)
            .sum::<f64>();
        out.insert(
            "effective_carriageway_width",
            carriageway,
            Unit::Meter,
            &[CARRIAGEWAY_WIDTH, INCLUDE_MEDIAN],
        );
        out.insert("overall_bridge_width", width.0, Unit::Meter, &WIDTH_FIELDS);
        out.insert("cross_section_layout", layout.describe(), Unit::None, &WIDTH_FIELDS);

        let footpaths = values.text(FOOTPATH).map(footpath_count).unwrap_or(0);
        out.insert("footpath_count", footpaths as i64, Unit::None, &[FOOTPATH]);

        let line_loads = [
            (ComponentKind::CrashBarrierLeft, "crash_barrier_left_x"),
            (ComponentKind::CrashBarrierRight, "crash_barrier_right_x"),
            (ComponentKind::RailingLeft, "railing_left_x"),
            (ComponentKind::RailingRight, "railing_right_x"),
            (ComponentKind::Median, "median_x"),
        ];
        for (kind, name) in line_loads {
            if let Some(line) = placement.line_load(kind) {
                out.insert(name, line.start.x.0, Unit::Meter, &WIDTH_FIELDS);
            }
        }

        let clearance = Meters(self.settings.overlay_edge_clearance_m);
        if let Some(overlay) = placement.overlay_load(clearance) {
            out.insert("overlay_width", overlay.width().0, Unit::Meter, &WIDTH_FIELDS);
        }
        out.insert("deck_slab_width", placement.deck_load().width().0, Unit::Meter, &WIDTH_FIELDS);

        let footpath_patches = [
            (ComponentKind::FootpathLeft, "footpath_left"),
            (ComponentKind::FootpathRight, "footpath_right"),
        ];
        for (kind, prefix) in footpath_patches {
            if let Some(patch) = placement.footpath_load(kind) {
                let [start, end, _, _] = patch.corners;
                out.insert(&format!("{}_x_start", prefix), start.x.0, Unit::Meter, &WIDTH_FIELDS);
                out.insert(&format!("{}_x_end", prefix), end.x.0, Unit::Meter, &WIDTH_FIELDS);
            }
        }

        let spacing = number(values, GIRDER_SPACING)?;
        let overhang = number(values, DECK_OVERHANG)?;
        let mut layout_inputs = vec![GIRDER_SPACING, DECK_OVERHANG];
        layout_inputs.extend_from_slice(&WIDTH_FIELDS);

        let count = girder_count(width.0, overhang, spacing);
        let effective = effective_girder_spacing(width.0, overhang, count).ok_or_else(|| {
            EngineError::internal(format!(
                "girder layout gives {} girder(s) across {:.3} m",
                count, width.0
            ))
        })?;
        out.insert("no_of_girders", count, Unit::None, &layout_inputs);
        out.insert("effective_girder_spacing", effective, Unit::Meter, &layout_inputs);
        Ok(())
    }

    fn girder(
        &self,
        values: &ValidatedInputs,
        catalog: &Catalog,
        out: &mut DerivedResult,
    ) -> EngineResult<()> {
        let plate = values.is(GIRDER_TYPE, GIRDER_PLATE);
        let (props, inputs): (SectionProperties, Vec<&str>) = if plate {
            let unsymmetrical = values.is(GIRDER_SYMMETRY, UNSYMMETRICAL);
            let top_width = number(values, TOP_FLANGE_WIDTH)?;
            let top_thickness = number(values, TOP_FLANGE_THICKNESS)?;
            let depth = number(values, GIRDER_DEPTH)?;
            let web = number(values, WEB_THICKNESS)?;
            let girder = if unsymmetrical {
                PlateGirder {
                    depth: Millimeters(depth),
                    web_thickness: Millimeters(web),
                    top_flange_width: Millimeters(top_width),
                    top_flange_thickness: Millimeters(top_thickness),
                    bottom_flange_width: Millimeters(number(values, BOTTOM_FLANGE_WIDTH)?),
                    bottom_flange_thickness: Millimeters(number(values, BOTTOM_FLANGE_THICKNESS)?),
                }
            } else {
                PlateGirder::symmetrical(depth, web, top_width, top_thickness)
            };
            let props = girder
                .properties()
                .ok_or_else(|| EngineError::internal("plate girder dimensions leave no web"))?;
            let mut inputs = vec![
                GIRDER_TYPE,
                GIRDER_SYMMETRY,
                GIRDER_DEPTH,
                WEB_THICKNESS,
                TOP_FLANGE_WIDTH,
                TOP_FLANGE_THICKNESS,
            ];
            if unsymmetrical {
                inputs.extend([BOTTOM_FLANGE_WIDTH, BOTTOM_FLANGE_THICKNESS]);
            }
            (props, inputs)
        } else {
            let designation = text(values, GIRDER_IS_SECTION)?;
            let section =
                lookup(catalog.rolled_section(designation), "rolled section", designation)?;
            (SectionProperties::from(section), vec![GIRDER_TYPE, GIRDER_IS_SECTION])
        };

        out.insert("girder_area", props.area.0, Unit::SquareMillimeter, &inputs);
        out.insert("girder_depth", props.depth.0, Unit::Millimeter, &inputs);
        out.insert("girder_centroid", props.centroid.0, Unit::Millimeter, &inputs);
        out.insert("girder_ixx", props.ixx.0, Unit::QuarticMillimeter, &inputs);
        out.insert("girder_z_top", props.z_top.0, Unit::CubicMillimeter, &inputs);
        out.insert("girder_z_bottom", props.z_bottom.0, Unit::CubicMillimeter, &inputs);

        let factor = number(values, SELF_WEIGHT_FACTOR)?;
        let weight = props.self_weight(KnPerM3(self.settings.steel_density)) * factor;
        let mut weight_inputs = inputs.clone();
        weight_inputs.push(SELF_WEIGHT_FACTOR);
        out.insert("girder_self_weight", weight.0, Unit::KilonewtonPerMeter, &weight_inputs);
        Ok(())
    }

    fn materials(
        &self,
        values: &ValidatedInputs,
        catalog: &Catalog,
        out: &mut DerivedResult,
    ) -> EngineResult<()> {
        let steels = [(GIRDER_MATERIAL, "girder"), (CROSS_BRACING_MATERIAL, "cross_bracing")];
        for (field, prefix) in steels {
            let designation = text(values, field)?;
            let grade = lookup(catalog.steel_grade(designation), "steel grade", designation)?;
            let (fy, fu) = (grade.yield_strength.0, grade.ultimate_strength.0);
            out.insert(&format!("{}_fy", prefix), fy, Unit::Megapascal, &[field]);
            out.insert(&format!("{}_fu", prefix), fu, Unit::Megapascal, &[field]);
        }
        out.insert("steel_elastic_modulus", STEEL_MODULUS_E.0, Unit::Gigapascal, &[]);

        let designation = text(values, DECK_CONCRETE_GRADE)?;
        let concrete = lookup(catalog.concrete_grade(designation), "concrete grade", designation)?;
        let label = text(values, ECM_AGGREGATE)?;
        let aggregate = lookup(catalog.ecm_aggregate(label), "Ecm aggregate", label)?;
        let (factor, factor_inputs): (f64, &[&str]) = match aggregate.factor {
            Some(factor) => (factor, &[ECM_AGGREGATE][..]),
            None => (number(values, ECM_CUSTOM_FACTOR)?, &[ECM_AGGREGATE, ECM_CUSTOM_FACTOR][..]),
        };
        let mut ecm_inputs = vec![DECK_CONCRETE_GRADE];
        ecm_inputs.extend_from_slice(factor_inputs);

        out.insert("deck_fck", concrete.fck.0, Unit::Megapascal, &[DECK_CONCRETE_GRADE]);
        out.insert(
            "deck_fctm",
            concrete.mean_tensile_strength().0,
            Unit::Megapascal,
            &[DECK_CONCRETE_GRADE],
        );
        out.insert("ecm_factor", factor, Unit::None, factor_inputs);
        out.insert("deck_ecm", concrete.secant_modulus(factor).0, Unit::Gigapascal, &ecm_inputs);

        let designation = text(values, DECK_REINFORCEMENT_MATERIAL)?;
        let rebar = lookup(
            catalog.reinforcement_grade(designation),
            "reinforcement grade",
            designation,
        )?;
        out.insert(
            "reinforcement_fy",
            rebar.fy.0,
            Unit::Megapascal,
            &[DECK_REINFORCEMENT_MATERIAL],
        );

        let size = text(values, DECK_REINFORCEMENT_SIZE)?;
        let diameter: f64 = size
            .parse()
            .map_err(|_| EngineError::internal(format!("bar size '{}' is not a diameter", size)))?;
        out.insert(
            "bar_area",
            crate::catalog::concrete::bar_area(Millimeters(diameter)).0,
            Unit::SquareMillimeter,
            &[DECK_REINFORCEMENT_SIZE],
        );
        Ok(())
    }

    fn loads(
        &self,
        values: &ValidatedInputs,
        catalog: &Catalog,
        out: &mut DerivedResult,
    ) -> EngineResult<()> {
        let concrete = KnPerM3(self.settings.concrete_density);

        let deck = concrete.over_thickness(Millimeters(number(values, DECK_THICKNESS)?).into());
        out.insert("deck_slab_load", deck.0, Unit::KilonewtonPerSquareMeter, &[DECK_THICKNESS]);

        if values.text(FOOTPATH).map(footpath_count).unwrap_or(0) > 0 {
            let thickness = values.number(FOOTPATH_THICKNESS).unwrap_or(0.0);
            let footpath = concrete.over_thickness(Millimeters(thickness).into());
            out.insert(
                "footpath_load",
                footpath.0,
                Unit::KilonewtonPerSquareMeter,
                &[FOOTPATH, FOOTPATH_THICKNESS],
            );
        }

        let material = text(values, WEARING_COAT_MATERIAL)?;
        let coat = lookup(catalog.wearing_coat(material), "wearing coat", material)?;
        let density = match coat.density {
            Some(density) => density,
            None => number(values, WEARING_COAT_DENSITY)?,
        };
        let thickness = number(values, WEARING_COAT_THICKNESS)?;
        let wearing = KnPerM3(density).over_thickness(Millimeters(thickness).into());
        let coat_inputs = [WEARING_COAT_MATERIAL, WEARING_COAT_DENSITY, WEARING_COAT_THICKNESS];
        out.insert("wearing_coat_load", wearing.0, Unit::KilonewtonPerSquareMeter, &coat_inputs);

        let code = self.settings.design_code.code();
        let factored: KnPerM2 = code.factored_load(deck + wearing);
        out.insert(
            "factored_deck_load",
            factored.0,
            Unit::KilonewtonPerSquareMeter,
            &[DECK_THICKNESS, WEARING_COAT_MATERIAL, WEARING_COAT_DENSITY, WEARING_COAT_THICKNESS],
        );
        out.insert("design_code", code.code_name(), Unit::None, &[]);
        Ok(())
    }
}

impl Derivation for GirderBridgeDerivation {
    fn derive(&self, values: &ValidatedInputs, catalog: &Catalog) -> EngineResult<DerivedResult> {
        let mut out = DerivedResult::new();
        self.geometry(values, &mut out)?;
        self.girder(values, catalog, &mut out)?;
        self.materials(values, catalog, &mut out)?;
        self.loads(values, catalog, &mut out)?;
        tracing::debug!(derived = out.len(), "girder bridge derivation finished");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::bridge::{bridge_schema, sample_input};

    fn run(input: &InputMap) -> EngineResult<DerivedResult> {
        let catalog = Catalog::standard();
        let schema = bridge_schema(&catalog).unwrap();
        derive(input, &schema, &catalog, &GirderBridgeDerivation::default())
    }

    fn close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("derived value present");
        assert!((actual - expected).abs() < 1e-6, "{} != {}", actual, expected);
    }

    #[test]
    fn test_sample_geometry() {
        let derived = run(&sample_input()).unwrap();
        close(derived.number("overall_bridge_width"), 11.8);
        close(derived.number("effective_carriageway_width"), 7.5);
        assert_eq!(derived.integer("footpath_count"), Some(2));
        // (11.8 - 2) / 2.5 = 3.92 -> 4 bays
        assert_eq!(derived.integer("no_of_girders"), Some(5));
        close(derived.number("effective_girder_spacing"), 2.45);
        close(derived.number("railing_left_x"), 0.075);
        close(derived.number("crash_barrier_left_x"), 1.9);
        close(derived.number("crash_barrier_right_x"), 9.9);
        close(derived.number("overlay_width"), 11.2);
        close(derived.number("deck_slab_width"), 11.8);
        close(derived.number("footpath_left_x_start"), 0.15);
        close(derived.number("footpath_left_x_end"), 1.65);
        close(derived.number("footpath_right_x_start"), 10.15);
        close(derived.number("footpath_right_x_end"), 11.65);
        assert!(derived.get("median_x").is_none());
        assert!(derived.text("cross_section_layout").unwrap().starts_with("railing_left(0.15)"));
    }

    #[test]
    fn test_sample_materials_and_loads() {
        let derived = run(&sample_input()).unwrap();
        close(derived.number("girder_fy"), 250.0);
        close(derived.number("girder_fu"), 410.0);
        close(derived.number("deck_fck"), 30.0);
        close(derived.number("deck_fctm"), 3.8);
        close(derived.number("deck_ecm"), 27.4);
        close(derived.number("reinforcement_fy"), 415.0);
        close(derived.number("girder_area"), 15621.0);
        close(derived.number("girder_self_weight"), 15621.0e-6 * 78.5);

        close(derived.number("deck_slab_load"), 5.0);
        close(derived.number("footpath_load"), 6.25);
        close(derived.number("wearing_coat_load"), 2.0);
        close(derived.number("factored_deck_load"), 10.5);
        assert_eq!(derived.text("design_code"), Some("IRC:6-2017"));
    }

    #[test]
    fn test_half_bay_girder_count_rounds_to_even() {
        // (11.8 - 1.8) / 4 = 2.5 bays
        let input = sample_input().with(DECK_OVERHANG, 0.9).with(GIRDER_SPACING, 4.0);
        let derived = run(&input).unwrap();
        assert_eq!(derived.integer("no_of_girders"), Some(3));
        close(derived.number("effective_girder_spacing"), 5.0);
    }

    #[test]
    fn test_provenance() {
        let derived = run(&sample_input()).unwrap();
        let fy = derived.get("girder_fy").unwrap();
        assert_eq!(fy.inputs, vec![GIRDER_MATERIAL]);
        assert_eq!(fy.unit, Unit::Megapascal);
        let girders = derived.get("no_of_girders").unwrap();
        assert!(girders.inputs.contains(&GIRDER_SPACING.to_string()));
        assert!(girders.inputs.contains(&FOOTPATH_WIDTH.to_string()));
    }

    #[test]
    fn test_derivation_is_deterministic() {
        assert_eq!(run(&sample_input()).unwrap(), run(&sample_input()).unwrap());
    }

    #[test]
    fn test_plate_girder_and_custom_inputs() {
        let input = sample_input()
            .with(GIRDER_TYPE, "Plate Girder")
            .with(GIRDER_DEPTH, 1000.0)
            .with(WEB_THICKNESS, 12.0)
            .with(TOP_FLANGE_WIDTH, 300.0)
            .with(TOP_FLANGE_THICKNESS, 20.0)
            .with(ECM_AGGREGATE, "Custom")
            .with(ECM_CUSTOM_FACTOR, 1.1)
            .with(WEARING_COAT_MATERIAL, "Other")
            .with(WEARING_COAT_DENSITY, 23.0)
            .with(SELF_WEIGHT_FACTOR, 1.2);
        let derived = run(&input).unwrap();
        close(derived.number("girder_area"), 23520.0);
        close(derived.number("girder_centroid"), 500.0);
        close(derived.number("girder_self_weight"), 23520.0e-6 * 78.5 * 1.2);
        close(derived.number("ecm_factor"), 1.1);
        assert!(derived.get("deck_ecm").unwrap().inputs.contains(&ECM_CUSTOM_FACTOR.to_string()));
        close(derived.number("wearing_coat_load"), 23.0 * 0.08);
    }

    #[test]
    fn test_median_layout() {
        let input = sample_input()
            .with(INCLUDE_MEDIAN, "Yes")
            .with(MEDIAN_WIDTH, 1.0)
            .with(FOOTPATH, "None");
        let derived = run(&input).unwrap();
        close(derived.number("effective_carriageway_width"), 15.0);
        close(derived.number("overall_bridge_width"), 17.0);
        close(derived.number("median_x"), 8.5);
        assert!(derived.get("footpath_load").is_none());
        assert!(derived.get("footpath_left_x_start").is_none());
    }

    #[test]
    fn test_invalid_input_is_internal_error() {
        let mut input = sample_input();
        input.remove(SPAN);
        let err = run(&input).unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert!(err.to_string().contains("span"));
    }

    #[test]
    fn test_catalog_miss_is_internal_error() {
        let full = Catalog::standard();
        let schema = bridge_schema(&full).unwrap();
        let mut partial = full.clone();
        partial.rolled_sections.clear();
        let derivation = GirderBridgeDerivation::default();
        let err = derive(&sample_input(), &schema, &partial, &derivation).unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert!(err.to_string().contains("ISMB 600"));
    }

    #[test]
    fn test_settings_change_loads() {
        let catalog = Catalog::standard();
        let schema = bridge_schema(&catalog).unwrap();
        let settings = EngineSettings {
            concrete_density: 24.0,
            overlay_edge_clearance_m: 0.5,
            ..EngineSettings::default()
        };
        let derivation = GirderBridgeDerivation::new(settings);
        let derived = derive(&sample_input(), &schema, &catalog, &derivation).unwrap();
        close(derived.number("deck_slab_load"), 4.8);
        close(derived.number("overlay_width"), 10.8);
    }
}
