//! Code limits and default values for highway bridge inputs.
//!
//! Clause references are to IRC 5 (Standard Specifications and Code of
//! Practice for Road Bridges, Section I) and IRC 24 (steel road bridges).

// ============================================================================
// Geometry
// ============================================================================

/// Minimum span handled by the plate girder module (m)
pub const SPAN_MIN: f64 = 20.0;
/// Maximum span handled by the plate girder module (m)
pub const SPAN_MAX: f64 = 45.0;

/// Minimum carriageway width without a median, IRC 5 Cl. 104.3.1 (m)
pub const CARRIAGEWAY_WIDTH_MIN: f64 = 4.25;
/// Minimum carriageway width on each side of a median, IRC 5 Cl. 104.3.1 (m)
pub const CARRIAGEWAY_WIDTH_MIN_WITH_MEDIAN: f64 = 7.5;
/// Software cap on carriageway width (m)
pub const CARRIAGEWAY_WIDTH_MAX: f64 = 23.6;

/// Skew beyond +/-15 degrees needs detailed analysis per IRC 24 (2010)
pub const SKEW_ANGLE_MIN: f64 = -15.0;
pub const SKEW_ANGLE_MAX: f64 = 15.0;
pub const SKEW_ANGLE_DEFAULT: f64 = 0.0;

/// IRC 5 Cl. 104.3.6 (m)
pub const MIN_FOOTPATH_WIDTH: f64 = 1.5;
pub const MAX_FOOTPATH_WIDTH: f64 = 5.0;

/// IRC 5 Cl. 109.7.2.3 and 109.7.2.4 (m)
pub const MIN_RAILING_HEIGHT: f64 = 1.0;
pub const MAX_RAILING_HEIGHT: f64 = 3.0;

pub const MAX_MEDIAN_WIDTH: f64 = 3.0;
pub const MAX_CRASH_BARRIER_WIDTH: f64 = 2.0;
pub const MAX_RAILING_WIDTH_MM: f64 = 2000.0;

pub const GIRDER_SPACING_MIN: f64 = 0.01;
pub const GIRDER_SPACING_MAX: f64 = 50.0;
pub const DECK_OVERHANG_MAX: f64 = 10.0;
pub const MIN_GIRDER_COUNT: i64 = 2;

pub const MAX_DECK_THICKNESS_MM: f64 = 500.0;
pub const MAX_WEARING_COAT_THICKNESS_MM: f64 = 200.0;
pub const MAX_WEARING_COAT_DENSITY: f64 = 40.0;

pub const MAX_GIRDER_DEPTH_MM: f64 = 5000.0;
pub const MAX_PLATE_WIDTH_MM: f64 = 2000.0;
pub const MAX_PLATE_THICKNESS_MM: f64 = 200.0;

pub const MAX_BEARING_LENGTH_MM: f64 = 1000.0;

// ============================================================================
// Preliminary design defaults
// ============================================================================

pub const DEFAULT_GIRDER_SPACING: f64 = 2.5;
pub const DEFAULT_DECK_OVERHANG: f64 = 1.0;
pub const DEFAULT_CRASH_BARRIER_WIDTH: f64 = 0.5;
pub const DEFAULT_RAILING_WIDTH_MM: f64 = 150.0;
pub const DEFAULT_MEDIAN_WIDTH: f64 = 0.0;
pub const DEFAULT_WEARING_COAT_THICKNESS_MM: f64 = 0.0;
pub const DEFAULT_BEARING_LENGTH_MM: f64 = 0.0;

pub const DEFAULT_SELF_WEIGHT_FACTOR: f64 = 1.0;
pub const SELF_WEIGHT_FACTOR_MIN: f64 = 0.0;
pub const SELF_WEIGHT_FACTOR_MAX: f64 = 5.0;

/// Unit weights (kN/m³)
pub const DEFAULT_CONCRETE_DENSITY: f64 = 25.0;
pub const DEFAULT_STEEL_DENSITY: f64 = 78.5;

/// Distance from deck edge to the edge of the wearing coat patch (m)
pub const DEFAULT_OVERLAY_EDGE_CLEARANCE: f64 = 0.30;

/// Bounds on a user-entered Ecm multiplication factor
pub const ECM_CUSTOM_FACTOR_MIN: f64 = 0.1;
pub const ECM_CUSTOM_FACTOR_MAX: f64 = 5.0;
