//! # Highway Bridge Form Schema
//!
//! Field specs and cross-field rules for the plate girder highway bridge
//! form: the basic inputs (structure, location, geometry, materials) plus
//! the additional inputs (deck, barriers, girder layout and section, loads,
//! supports).
//!
//! Clause references are to IRC 5 unless noted otherwise.

use crate::catalog::limits::*;
use crate::catalog::{
    self, concrete::BAR_SIZES, Catalog, FOOTPATH_BOTH, FOOTPATH_NONE, FOOTPATH_OPTIONS,
    GIRDER_PLATE, GIRDER_ROLLED, GIRDER_TYPES, NO, PROJECT_LOCATIONS, RAILING_TYPES,
    STRUCTURE_OTHER, STRUCTURE_TYPES, SUPPORT_FIXED, SUPPORT_ROLLER, SUPPORT_TYPES, UNSYMMETRICAL,
    YES, YES_NO,
};
use crate::errors::EngineResult;
use crate::geometry::CrossSectionLayout;
use crate::units::Unit;

use super::{CrossFieldRule, FieldSpec, RuleContext, Schema};

/// Input field names
pub mod keys {
    pub const STRUCTURE_TYPE: &str = "structure_type";
    pub const PROJECT_LOCATION: &str = "project_location";
    pub const SPAN: &str = "span";
    pub const INCLUDE_MEDIAN: &str = "include_median";
    pub const CARRIAGEWAY_WIDTH: &str = "carriageway_width";
    pub const FOOTPATH: &str = "footpath";
    pub const SKEW_ANGLE: &str = "skew_angle";

    pub const GIRDER_MATERIAL: &str = "girder_material";
    pub const CROSS_BRACING_MATERIAL: &str = "cross_bracing_material";
    pub const DECK_CONCRETE_GRADE: &str = "deck_concrete_grade";
    pub const ECM_AGGREGATE: &str = "ecm_aggregate";
    pub const ECM_CUSTOM_FACTOR: &str = "ecm_custom_factor";
    pub const DECK_THICKNESS: &str = "deck_thickness";
    pub const DECK_REINFORCEMENT_MATERIAL: &str = "deck_reinforcement_material";
    pub const DECK_REINFORCEMENT_SIZE: &str = "deck_reinforcement_size";

    pub const MEDIAN_WIDTH: &str = "median_width";
    pub const CRASH_BARRIER_TYPE: &str = "crash_barrier_type";
    pub const CRASH_BARRIER_WIDTH: &str = "crash_barrier_width";
    pub const RAILING_TYPE: &str = "railing_type";
    pub const RAILING_WIDTH: &str = "railing_width";
    pub const RAILING_HEIGHT: &str = "railing_height";
    pub const FOOTPATH_WIDTH: &str = "footpath_width";
    pub const FOOTPATH_THICKNESS: &str = "footpath_thickness";

    pub const GIRDER_SPACING: &str = "girder_spacing";
    pub const DECK_OVERHANG: &str = "deck_overhang";

    pub const GIRDER_TYPE: &str = "girder_type";
    pub const GIRDER_IS_SECTION: &str = "girder_is_section";
    pub const GIRDER_SYMMETRY: &str = "girder_symmetry";
    pub const GIRDER_DEPTH: &str = "girder_depth";
    pub const WEB_THICKNESS: &str = "web_thickness";
    pub const TOP_FLANGE_WIDTH: &str = "top_flange_width";
    pub const TOP_FLANGE_THICKNESS: &str = "top_flange_thickness";
    pub const BOTTOM_FLANGE_WIDTH: &str = "bottom_flange_width";
    pub const BOTTOM_FLANGE_THICKNESS: &str = "bottom_flange_thickness";

    pub const WEARING_COAT_MATERIAL: &str = "wearing_coat_material";
    pub const WEARING_COAT_DENSITY: &str = "wearing_coat_density";
    pub const WEARING_COAT_THICKNESS: &str = "wearing_coat_thickness";
    pub const SELF_WEIGHT_FACTOR: &str = "self_weight_factor";

    pub const LEFT_SUPPORT: &str = "left_support";
    pub const RIGHT_SUPPORT: &str = "right_support";
    pub const BEARING_LENGTH: &str = "bearing_length";

    /// Fields that set the overall deck width
    pub const WIDTH_FIELDS: [&str; 7] = [
        CARRIAGEWAY_WIDTH,
        INCLUDE_MEDIAN,
        MEDIAN_WIDTH,
        CRASH_BARRIER_WIDTH,
        FOOTPATH,
        FOOTPATH_WIDTH,
        RAILING_WIDTH,
    ];
}

use keys::*;

const GROUP_STRUCTURE: &str = "Type of Structure";
const GROUP_LOCATION: &str = "Project Location";
const GROUP_GEOMETRY: &str = "Geometric Details";
const GROUP_MATERIAL: &str = "Material Inputs";
const GROUP_DECK: &str = "Deck";
const GROUP_BARRIERS: &str = "Crash Barrier, Median and Railing";
const GROUP_FOOTPATH: &str = "Footpath";
const GROUP_LAYOUT: &str = "Girder Layout";
const GROUP_GIRDER: &str = "Girder Section";
const GROUP_LOADS: &str = "Dead Loads";
const GROUP_SUPPORTS: &str = "Supports";

/// Build the highway bridge schema, taking material choices from the catalog.
///
/// Choice fields with a default take the first option, which is what the
/// form shows before the user touches it.
pub fn bridge_schema(catalog: &Catalog) -> EngineResult<Schema> {
    let steel = catalog.steel_grade_names();
    let first_steel = steel.first().cloned().unwrap_or_default();
    let concrete = catalog.concrete_grade_names();
    let aggregates = catalog.ecm_aggregate_labels();
    let first_aggregate = aggregates.first().cloned().unwrap_or_default();
    let rebar = catalog.reinforcement_grade_names();
    let first_rebar = rebar.first().cloned().unwrap_or_default();
    let barriers = catalog.crash_barrier_names();
    let first_barrier = barriers.first().cloned().unwrap_or_default();
    let coats = catalog.wearing_coat_names();
    let first_coat = coats.first().cloned().unwrap_or_default();
    let sections = catalog.rolled_section_names();

    let width_deps: &[&str] = &keys::WIDTH_FIELDS;

    let fields = vec![
        // Basic inputs
        FieldSpec::choice(STRUCTURE_TYPE, "Structure Type", &STRUCTURE_TYPES)
            .with_group(GROUP_STRUCTURE)
            .required(),
        FieldSpec::choice(PROJECT_LOCATION, "City in India", &PROJECT_LOCATIONS)
            .with_group(GROUP_LOCATION)
            .required(),
        FieldSpec::number(SPAN, "Span")
            .with_group(GROUP_GEOMETRY)
            .with_unit(Unit::Meter)
            .with_range(SPAN_MIN, SPAN_MAX)
            .required(),
        FieldSpec::choice(INCLUDE_MEDIAN, "Include Median", &YES_NO)
            .with_group(GROUP_GEOMETRY)
            .with_default(NO),
        FieldSpec::number(CARRIAGEWAY_WIDTH, "Carriageway Width")
            .with_group(GROUP_GEOMETRY)
            .with_unit(Unit::Meter)
            .with_range(CARRIAGEWAY_WIDTH_MIN, CARRIAGEWAY_WIDTH_MAX)
            .depends_on(&[INCLUDE_MEDIAN])
            .required(),
        FieldSpec::choice(FOOTPATH, "Footpath", &FOOTPATH_OPTIONS)
            .with_group(GROUP_GEOMETRY)
            .with_default(FOOTPATH_NONE),
        FieldSpec::number(SKEW_ANGLE, "Skew Angle")
            .with_group(GROUP_GEOMETRY)
            .with_unit(Unit::Degree)
            .with_range(SKEW_ANGLE_MIN, SKEW_ANGLE_MAX)
            .with_default(SKEW_ANGLE_DEFAULT),
        FieldSpec::choice(GIRDER_MATERIAL, "Girder", &steel)
            .with_group(GROUP_MATERIAL)
            .required(),
        FieldSpec::choice(CROSS_BRACING_MATERIAL, "Cross Bracing", &steel)
            .with_group(GROUP_MATERIAL)
            .with_default(first_steel),
        FieldSpec::choice(DECK_CONCRETE_GRADE, "Deck Concrete Grade", &concrete)
            .with_group(GROUP_MATERIAL)
            .required(),
        // Deck
        FieldSpec::choice(ECM_AGGREGATE, "Ecm Aggregate Factor", &aggregates)
            .with_group(GROUP_DECK)
            .with_default(first_aggregate),
        FieldSpec::number(ECM_CUSTOM_FACTOR, "Custom Ecm Factor")
            .with_group(GROUP_DECK)
            .with_range(ECM_CUSTOM_FACTOR_MIN, ECM_CUSTOM_FACTOR_MAX)
            .depends_on(&[ECM_AGGREGATE]),
        FieldSpec::number(DECK_THICKNESS, "Deck Thickness")
            .with_group(GROUP_DECK)
            .with_unit(Unit::Millimeter)
            .with_range(0.0, MAX_DECK_THICKNESS_MM)
            .required(),
        FieldSpec::choice(DECK_REINFORCEMENT_MATERIAL, "Reinforcement Material", &rebar)
            .with_group(GROUP_DECK)
            .with_default(first_rebar),
        FieldSpec::choice(DECK_REINFORCEMENT_SIZE, "Reinforcement Size", &BAR_SIZES)
            .with_group(GROUP_DECK)
            .with_unit(Unit::Millimeter)
            .with_default(BAR_SIZES[0]),
        // Barriers
        FieldSpec::number(MEDIAN_WIDTH, "Median Width")
            .with_group(GROUP_BARRIERS)
            .with_unit(Unit::Meter)
            .with_range(0.0, MAX_MEDIAN_WIDTH)
            .with_default(DEFAULT_MEDIAN_WIDTH)
            .depends_on(&[INCLUDE_MEDIAN]),
        FieldSpec::choice(CRASH_BARRIER_TYPE, "Crash Barrier Type", &barriers)
            .with_group(GROUP_BARRIERS)
            .with_default(first_barrier)
            .depends_on(&[FOOTPATH]),
        FieldSpec::number(CRASH_BARRIER_WIDTH, "Crash Barrier Width")
            .with_group(GROUP_BARRIERS)
            .with_unit(Unit::Meter)
            .with_range(0.0, MAX_CRASH_BARRIER_WIDTH)
            .with_default(DEFAULT_CRASH_BARRIER_WIDTH),
        FieldSpec::choice(RAILING_TYPE, "Railing Type", &RAILING_TYPES)
            .with_group(GROUP_BARRIERS)
            .with_default(RAILING_TYPES[0])
            .depends_on(&[FOOTPATH]),
        FieldSpec::number(RAILING_WIDTH, "Railing Width")
            .with_group(GROUP_BARRIERS)
            .with_unit(Unit::Millimeter)
            .with_range(0.0, MAX_RAILING_WIDTH_MM)
            .with_default(DEFAULT_RAILING_WIDTH_MM)
            .depends_on(&[FOOTPATH]),
        FieldSpec::number(RAILING_HEIGHT, "Railing Height")
            .with_group(GROUP_BARRIERS)
            .with_unit(Unit::Meter)
            .with_range(0.0, MAX_RAILING_HEIGHT)
            .depends_on(&[FOOTPATH]),
        // Footpath
        FieldSpec::number(FOOTPATH_WIDTH, "Footpath Width")
            .with_group(GROUP_FOOTPATH)
            .with_unit(Unit::Meter)
            .with_range(0.0, MAX_FOOTPATH_WIDTH)
            .depends_on(&[FOOTPATH]),
        FieldSpec::number(FOOTPATH_THICKNESS, "Footpath Thickness")
            .with_group(GROUP_FOOTPATH)
            .with_unit(Unit::Millimeter)
            .with_range(0.0, MAX_DECK_THICKNESS_MM)
            .with_default(0.0)
            .depends_on(&[FOOTPATH]),
        // Layout
        FieldSpec::number(GIRDER_SPACING, "Girder Spacing")
            .with_group(GROUP_LAYOUT)
            .with_unit(Unit::Meter)
            .with_range(GIRDER_SPACING_MIN, GIRDER_SPACING_MAX)
            .with_default(DEFAULT_GIRDER_SPACING)
            .depends_on(width_deps),
        FieldSpec::number(DECK_OVERHANG, "Deck Overhang Width")
            .with_group(GROUP_LAYOUT)
            .with_unit(Unit::Meter)
            .with_range(0.0, DECK_OVERHANG_MAX)
            .with_default(DEFAULT_DECK_OVERHANG)
            .depends_on(width_deps),
        // Girder section
        FieldSpec::choice(GIRDER_TYPE, "Girder Type", &GIRDER_TYPES)
            .with_group(GROUP_GIRDER)
            .with_default(GIRDER_ROLLED),
        FieldSpec::choice(GIRDER_IS_SECTION, "IS Section", &sections)
            .with_group(GROUP_GIRDER)
            .depends_on(&[GIRDER_TYPE]),
        FieldSpec::choice(GIRDER_SYMMETRY, "Symmetry", &catalog::GIRDER_SYMMETRY)
            .with_group(GROUP_GIRDER)
            .with_default(catalog::SYMMETRICAL)
            .depends_on(&[GIRDER_TYPE]),
        FieldSpec::number(GIRDER_DEPTH, "Total Depth")
            .with_group(GROUP_GIRDER)
            .with_unit(Unit::Millimeter)
            .with_range(0.0, MAX_GIRDER_DEPTH_MM)
            .depends_on(&[GIRDER_TYPE]),
        FieldSpec::number(WEB_THICKNESS, "Web Thickness")
            .with_group(GROUP_GIRDER)
            .with_unit(Unit::Millimeter)
            .with_range(0.0, MAX_PLATE_THICKNESS_MM)
            .depends_on(&[GIRDER_DEPTH]),
        FieldSpec::number(TOP_FLANGE_WIDTH, "Top Flange Width")
            .with_group(GROUP_GIRDER)
            .with_unit(Unit::Millimeter)
            .with_range(0.0, MAX_PLATE_WIDTH_MM)
            .depends_on(&[GIRDER_TYPE]),
        FieldSpec::number(TOP_FLANGE_THICKNESS, "Top Flange Thickness")
            .with_group(GROUP_GIRDER)
            .with_unit(Unit::Millimeter)
            .with_range(0.0, MAX_PLATE_THICKNESS_MM)
            .depends_on(&[GIRDER_DEPTH]),
        FieldSpec::number(BOTTOM_FLANGE_WIDTH, "Bottom Flange Width")
            .with_group(GROUP_GIRDER)
            .with_unit(Unit::Millimeter)
            .with_range(0.0, MAX_PLATE_WIDTH_MM)
            .depends_on(&[GIRDER_SYMMETRY]),
        FieldSpec::number(BOTTOM_FLANGE_THICKNESS, "Bottom Flange Thickness")
            .with_group(GROUP_GIRDER)
            .with_unit(Unit::Millimeter)
            .with_range(0.0, MAX_PLATE_THICKNESS_MM)
            .depends_on(&[GIRDER_SYMMETRY, GIRDER_DEPTH]),
        // Loads
        FieldSpec::choice(WEARING_COAT_MATERIAL, "Wearing Coat Material", &coats)
            .with_group(GROUP_LOADS)
            .with_default(first_coat),
        FieldSpec::number(WEARING_COAT_DENSITY, "Wearing Coat Density")
            .with_group(GROUP_LOADS)
            .with_unit(Unit::KilonewtonPerCubicMeter)
            .with_range(0.0, MAX_WEARING_COAT_DENSITY)
            .depends_on(&[WEARING_COAT_MATERIAL]),
        FieldSpec::number(WEARING_COAT_THICKNESS, "Wearing Coat Thickness")
            .with_group(GROUP_LOADS)
            .with_unit(Unit::Millimeter)
            .with_range(0.0, MAX_WEARING_COAT_THICKNESS_MM)
            .with_default(DEFAULT_WEARING_COAT_THICKNESS_MM),
        FieldSpec::number(SELF_WEIGHT_FACTOR, "Self Weight Factor")
            .with_group(GROUP_LOADS)
            .with_range(SELF_WEIGHT_FACTOR_MIN, SELF_WEIGHT_FACTOR_MAX)
            .with_default(DEFAULT_SELF_WEIGHT_FACTOR),
        // Supports
        FieldSpec::choice(LEFT_SUPPORT, "Left Support", &SUPPORT_TYPES)
            .with_group(GROUP_SUPPORTS)
            .with_default(SUPPORT_FIXED),
        FieldSpec::choice(RIGHT_SUPPORT, "Right Support", &SUPPORT_TYPES)
            .with_group(GROUP_SUPPORTS)
            .with_default(SUPPORT_FIXED),
        FieldSpec::number(BEARING_LENGTH, "Bearing Length")
            .with_group(GROUP_SUPPORTS)
            .with_unit(Unit::Millimeter)
            .with_range(0.0, MAX_BEARING_LENGTH_MM)
            .with_default(DEFAULT_BEARING_LENGTH_MM)
            .depends_on(&[SPAN]),
    ];

    let mut layout_fields = vec![GIRDER_SPACING, DECK_OVERHANG];
    layout_fields.extend_from_slice(width_deps);

    let rules = vec![
        CrossFieldRule::new("structure_supported", &[STRUCTURE_TYPE], structure_supported),
        CrossFieldRule::new(
            "median_carriageway_width",
            &[INCLUDE_MEDIAN, CARRIAGEWAY_WIDTH],
            median_carriageway_width,
        ),
        CrossFieldRule::new(
            "median_width_present",
            &[INCLUDE_MEDIAN, MEDIAN_WIDTH],
            median_width_present,
        ),
        CrossFieldRule::new(
            "footpath_width_minimum",
            &[FOOTPATH, FOOTPATH_WIDTH],
            footpath_width_minimum,
        ),
        CrossFieldRule::new(
            "railing_height_minimum",
            &[FOOTPATH, RAILING_HEIGHT],
            railing_height_minimum,
        ),
        CrossFieldRule::new(
            "crash_barrier_permitted",
            &[CRASH_BARRIER_TYPE, FOOTPATH],
            crash_barrier_permitted,
        ),
        CrossFieldRule::new("girder_layout", &layout_fields, girder_layout),
        CrossFieldRule::new(
            "rolled_section_selected",
            &[GIRDER_TYPE, GIRDER_IS_SECTION],
            rolled_section_selected,
        ),
        CrossFieldRule::new(
            "plate_girder_dimensions",
            &[
                GIRDER_TYPE,
                GIRDER_SYMMETRY,
                GIRDER_DEPTH,
                WEB_THICKNESS,
                TOP_FLANGE_WIDTH,
                TOP_FLANGE_THICKNESS,
                BOTTOM_FLANGE_WIDTH,
                BOTTOM_FLANGE_THICKNESS,
            ],
            plate_girder_dimensions,
        ),
        CrossFieldRule::new(
            "ecm_custom_factor_present",
            &[ECM_AGGREGATE, ECM_CUSTOM_FACTOR],
            ecm_custom_factor_present,
        ),
        CrossFieldRule::new(
            "wearing_coat_density_present",
            &[WEARING_COAT_MATERIAL, WEARING_COAT_DENSITY],
            wearing_coat_density_present,
        ),
        CrossFieldRule::new("support_stability", &[LEFT_SUPPORT, RIGHT_SUPPORT], support_stability),
    ];

    Schema::new(fields, rules)
}

// ============================================================================
// Rules
// ============================================================================

fn structure_supported(ctx: &RuleContext<'_>) -> Result<(), String> {
    if ctx.values.is(STRUCTURE_TYPE, STRUCTURE_OTHER) {
        return Err(format!(
            "{} '{}' is not supported; only highway bridges can be designed",
            STRUCTURE_TYPE, STRUCTURE_OTHER
        ));
    }
    Ok(())
}

/// Cl. 104.3.1: with a median each carriageway must be at least 7.5 m wide
fn median_carriageway_width(ctx: &RuleContext<'_>) -> Result<(), String> {
    if !ctx.values.is(INCLUDE_MEDIAN, YES) {
        return Ok(());
    }
    match ctx.values.number(CARRIAGEWAY_WIDTH) {
        Some(width) if width < CARRIAGEWAY_WIDTH_MIN_WITH_MEDIAN => Err(format!(
            "{} {} m is below the {} m required on each side when {} is Yes (IRC 5 Cl. 104.3.1)",
            CARRIAGEWAY_WIDTH, width, CARRIAGEWAY_WIDTH_MIN_WITH_MEDIAN, INCLUDE_MEDIAN
        )),
        _ => Ok(()),
    }
}

fn median_width_present(ctx: &RuleContext<'_>) -> Result<(), String> {
    if !ctx.values.is(INCLUDE_MEDIAN, YES) {
        return Ok(());
    }
    match ctx.values.number(MEDIAN_WIDTH) {
        Some(width) if width > 0.0 => Ok(()),
        _ => Err(format!("{} must be greater than 0 when {} is Yes", MEDIAN_WIDTH, INCLUDE_MEDIAN)),
    }
}

/// Cl. 104.3.6: footpaths at least 1.5 m wide
fn footpath_width_minimum(ctx: &RuleContext<'_>) -> Result<(), String> {
    if ctx.values.is(FOOTPATH, FOOTPATH_NONE) {
        return Ok(());
    }
    match ctx.values.number(FOOTPATH_WIDTH) {
        None => Err(format!("{} is required when {} is not None", FOOTPATH_WIDTH, FOOTPATH)),
        Some(width) if width < MIN_FOOTPATH_WIDTH => Err(format!(
            "{} {} m is below the {} m minimum for a {} (IRC 5 Cl. 104.3.6)",
            FOOTPATH_WIDTH, width, MIN_FOOTPATH_WIDTH, FOOTPATH
        )),
        Some(_) => Ok(()),
    }
}

/// Cl. 109.7.2.3/4: pedestrian railings at least 1.0 m high
fn railing_height_minimum(ctx: &RuleContext<'_>) -> Result<(), String> {
    if ctx.values.is(FOOTPATH, FOOTPATH_NONE) {
        return Ok(());
    }
    match ctx.values.number(RAILING_HEIGHT) {
        None => Err(format!("{} is required when {} is not None", RAILING_HEIGHT, FOOTPATH)),
        Some(height) if height < MIN_RAILING_HEIGHT => Err(format!(
            "{} {} m is below the {} m minimum beside a {} (IRC 5 Cl. 109.7.2.3)",
            RAILING_HEIGHT, height, MIN_RAILING_HEIGHT, FOOTPATH
        )),
        Some(_) => Ok(()),
    }
}

/// Cl. 109.6.4: flexible and semi-rigid barriers only with an outer footpath on both sides
fn crash_barrier_permitted(ctx: &RuleContext<'_>) -> Result<(), String> {
    let Some(name) = ctx.values.text(CRASH_BARRIER_TYPE) else {
        return Ok(());
    };
    let Some(barrier) = ctx.catalog.crash_barrier(name) else {
        return Ok(());
    };
    if barrier.rigidity.needs_outer_footpath() && !ctx.values.is(FOOTPATH, FOOTPATH_BOTH) {
        return Err(format!(
            "{} '{}' is {} and needs an outer {} on both sides (IRC 5 Cl. 109.6.4)",
            CRASH_BARRIER_TYPE,
            name,
            barrier.rigidity.display_name().to_lowercase(),
            FOOTPATH
        ));
    }
    Ok(())
}

fn girder_layout(ctx: &RuleContext<'_>) -> Result<(), String> {
    let (Some(spacing), Some(overhang)) = (
        ctx.values.number(GIRDER_SPACING),
        ctx.values.number(DECK_OVERHANG),
    ) else {
        return Ok(());
    };
    let width = CrossSectionLayout::from_values(ctx.values).total_width().0;

    if spacing >= width {
        return Err(format!(
            "{} {} m must be less than the overall bridge width {:.3} m",
            GIRDER_SPACING, spacing, width
        ));
    }
    if overhang >= width {
        return Err(format!(
            "{} {} m must be less than the overall bridge width {:.3} m",
            DECK_OVERHANG, overhang, width
        ));
    }
    let count = crate::geometry::girder_count(width, overhang, spacing);
    if count < MIN_GIRDER_COUNT {
        return Err(format!(
            "{} {} m with {} {} m gives {} girder(s) across {:.3} m; at least {} are needed",
            GIRDER_SPACING, spacing, DECK_OVERHANG, overhang, count, width, MIN_GIRDER_COUNT
        ));
    }
    Ok(())
}

fn rolled_section_selected(ctx: &RuleContext<'_>) -> Result<(), String> {
    if ctx.values.is(GIRDER_TYPE, GIRDER_ROLLED) && !ctx.values.contains(GIRDER_IS_SECTION) {
        return Err(format!(
            "{} is required when {} is {}",
            GIRDER_IS_SECTION, GIRDER_TYPE, GIRDER_ROLLED
        ));
    }
    Ok(())
}

fn plate_girder_dimensions(ctx: &RuleContext<'_>) -> Result<(), String> {
    if !ctx.values.is(GIRDER_TYPE, GIRDER_PLATE) {
        return Ok(());
    }
    let unsymmetrical = ctx.values.is(GIRDER_SYMMETRY, UNSYMMETRICAL);

    let mut needed = vec![GIRDER_DEPTH, WEB_THICKNESS, TOP_FLANGE_WIDTH, TOP_FLANGE_THICKNESS];
    if unsymmetrical {
        needed.extend([BOTTOM_FLANGE_WIDTH, BOTTOM_FLANGE_THICKNESS]);
    }
    let missing: Vec<&str> = needed
        .iter()
        .copied()
        .filter(|f| !ctx.values.number(f).is_some_and(|v| v > 0.0))
        .collect();
    if !missing.is_empty() {
        return Err(format!(
            "{} needs positive values for {}",
            GIRDER_PLATE,
            missing.join(", ")
        ));
    }

    let depth = ctx.values.number(GIRDER_DEPTH).unwrap_or_default();
    let web = ctx.values.number(WEB_THICKNESS).unwrap_or_default();
    let top = ctx.values.number(TOP_FLANGE_THICKNESS).unwrap_or_default();
    let (bottom, bottom_field) = if unsymmetrical {
        (ctx.values.number(BOTTOM_FLANGE_THICKNESS).unwrap_or_default(), BOTTOM_FLANGE_THICKNESS)
    } else {
        (top, TOP_FLANGE_THICKNESS)
    };

    if top + bottom >= depth {
        return Err(format!(
            "{} {} mm and {} {} mm leave no web within {} {} mm",
            TOP_FLANGE_THICKNESS, top, bottom_field, bottom, GIRDER_DEPTH, depth
        ));
    }
    if web >= depth {
        return Err(format!(
            "{} {} mm must be less than {} {} mm",
            WEB_THICKNESS, web, GIRDER_DEPTH, depth
        ));
    }
    Ok(())
}

fn ecm_custom_factor_present(ctx: &RuleContext<'_>) -> Result<(), String> {
    let custom = ctx
        .values
        .text(ECM_AGGREGATE)
        .and_then(|label| ctx.catalog.ecm_aggregate(label))
        .is_some_and(|a| a.is_custom());
    if custom && !ctx.values.contains(ECM_CUSTOM_FACTOR) {
        return Err(format!(
            "{} is required for a custom {}",
            ECM_CUSTOM_FACTOR, ECM_AGGREGATE
        ));
    }
    Ok(())
}

fn wearing_coat_density_present(ctx: &RuleContext<'_>) -> Result<(), String> {
    let user_defined = ctx
        .values
        .text(WEARING_COAT_MATERIAL)
        .and_then(|name| ctx.catalog.wearing_coat(name))
        .is_some_and(|m| m.density.is_none());
    if user_defined && !ctx.values.number(WEARING_COAT_DENSITY).is_some_and(|d| d > 0.0) {
        return Err(format!(
            "{} must be entered for {} '{}'",
            WEARING_COAT_DENSITY,
            WEARING_COAT_MATERIAL,
            ctx.values.text(WEARING_COAT_MATERIAL).unwrap_or_default()
        ));
    }
    Ok(())
}

fn support_stability(ctx: &RuleContext<'_>) -> Result<(), String> {
    if ctx.values.is(LEFT_SUPPORT, SUPPORT_ROLLER) && ctx.values.is(RIGHT_SUPPORT, SUPPORT_ROLLER) {
        return Err(format!(
            "{} and {} cannot both be {}; the girder would be unstable",
            LEFT_SUPPORT, RIGHT_SUPPORT, SUPPORT_ROLLER
        ));
    }
    Ok(())
}

/// A complete, valid two-footpath highway bridge on rolled girders.
/// Overall width 11.8 m.
#[cfg(test)]
pub(crate) fn sample_input() -> crate::input::InputMap {
    crate::input::InputMap::new()
        .with(STRUCTURE_TYPE, "Highway Bridge")
        .with(PROJECT_LOCATION, "Delhi")
        .with(SPAN, 30.0)
        .with(CARRIAGEWAY_WIDTH, 7.5)
        .with(FOOTPATH, "Both")
        .with(GIRDER_MATERIAL, "E 250A")
        .with(DECK_CONCRETE_GRADE, "M 30")
        .with(DECK_THICKNESS, 200.0)
        .with(FOOTPATH_WIDTH, 1.5)
        .with(FOOTPATH_THICKNESS, 250.0)
        .with(RAILING_HEIGHT, 1.1)
        .with(GIRDER_IS_SECTION, "ISMB 600")
        .with(WEARING_COAT_THICKNESS, 80.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::concrete::{CONCRETE_GRADE_DESIGNATIONS, REINFORCEMENT_DESIGNATIONS};

    #[test]
    fn test_bridge_schema_builds() {
        let schema = bridge_schema(&Catalog::standard()).unwrap();
        assert_eq!(schema.fields()[0].name, STRUCTURE_TYPE);
        assert_eq!(schema.rule_count(), 12);
        assert!(schema.field(GIRDER_MATERIAL).unwrap().choices.contains(&"E 350BR".to_string()));
    }

    #[test]
    fn test_layout_fields_follow_width_fields() {
        let schema = bridge_schema(&Catalog::standard()).unwrap();
        let order: Vec<&str> = schema.dependency_order().map(|f| f.name.as_str()).collect();
        let pos = |name: &str| order.iter().position(|n| *n == name).unwrap();
        assert!(pos(INCLUDE_MEDIAN) < pos(CARRIAGEWAY_WIDTH));
        assert!(pos(FOOTPATH_WIDTH) < pos(GIRDER_SPACING));
        assert!(pos(GIRDER_DEPTH) < pos(WEB_THICKNESS));
    }

    #[test]
    fn test_choice_defaults_are_first_options() {
        let schema = bridge_schema(&Catalog::standard()).unwrap();
        let default = |name: &str| schema.field(name).unwrap().default.clone().unwrap().to_string();
        assert_eq!(default(CROSS_BRACING_MATERIAL), "E 250A");
        assert_eq!(default(DECK_REINFORCEMENT_SIZE), "8");
        assert_eq!(default(WEARING_COAT_MATERIAL), "Concrete");
        assert_eq!(default(GIRDER_TYPE), GIRDER_ROLLED);
    }

    #[test]
    fn test_concrete_choices_match_catalog() {
        let schema = bridge_schema(&Catalog::standard()).unwrap();
        let choices = &schema.field(DECK_CONCRETE_GRADE).unwrap().choices;
        assert_eq!(choices.len(), CONCRETE_GRADE_DESIGNATIONS.len());
        assert_eq!(
            schema.field(DECK_REINFORCEMENT_MATERIAL).unwrap().choices.len(),
            REINFORCEMENT_DESIGNATIONS.len()
        );
    }
}
