//! # Unit Types
//!
//! Type-safe wrappers for the SI units used in Indian bridge codes, plus the
//! [`Unit`] tag that field specs and derived values carry for display.
//!
//! The wrappers are plain `f64` newtypes so JSON stays clean (just numbers).
//!
//! - Length: metres (m) for deck layout, millimetres (mm) for plate dimensions
//! - Stress: megapascals (MPa), moduli in gigapascals (GPa)
//! - Unit weight: kN/m³; area load: kN/m²; line load: kN/m
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::units::{Meters, Millimeters};
//!
//! let thickness = Millimeters(200.0);
//! let meters: Meters = thickness.into();
//! assert_eq!(meters.0, 0.2);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Unit Tags
// ============================================================================

/// Unit attached to an input field or a derived value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Dimensionless, or a choice/text field
    #[default]
    None,
    Meter,
    Millimeter,
    Degree,
    Megapascal,
    Gigapascal,
    KilonewtonPerCubicMeter,
    KilonewtonPerSquareMeter,
    KilonewtonPerMeter,
    SquareMillimeter,
    CubicMillimeter,
    QuarticMillimeter,
}

impl Unit {
    /// Display symbol (empty for dimensionless)
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::None => "",
            Unit::Meter => "m",
            Unit::Millimeter => "mm",
            Unit::Degree => "deg",
            Unit::Megapascal => "MPa",
            Unit::Gigapascal => "GPa",
            Unit::KilonewtonPerCubicMeter => "kN/m³",
            Unit::KilonewtonPerSquareMeter => "kN/m²",
            Unit::KilonewtonPerMeter => "kN/m",
            Unit::SquareMillimeter => "mm²",
            Unit::CubicMillimeter => "mm³",
            Unit::QuarticMillimeter => "mm⁴",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

// ============================================================================
// Stress Units
// ============================================================================

/// Stress in megapascals (N/mm²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Megapascals(pub f64);

/// Modulus in gigapascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gigapascals(pub f64);

impl From<Gigapascals> for Megapascals {
    fn from(gpa: Gigapascals) -> Self {
        Megapascals(gpa.0 * 1000.0)
    }
}

// ============================================================================
// Load Units
// ============================================================================

/// Unit weight in kN/m³
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnPerM3(pub f64);

/// Area load in kN/m²
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnPerM2(pub f64);

/// Line load in kN/m
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnPerM(pub f64);

impl KnPerM3 {
    /// Area load of a layer of this material with the given thickness
    pub fn over_thickness(self, thickness: Meters) -> KnPerM2 {
        KnPerM2(self.0 * thickness.0)
    }
}

// ============================================================================
// Section Properties
// ============================================================================

/// Area in mm²
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMm(pub f64);

/// Section modulus in mm³
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mm3(pub f64);

/// Moment of inertia in mm⁴
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mm4(pub f64);

impl SqMm {
    /// Line load of a prismatic member with this cross-section area
    pub fn line_load(self, unit_weight: KnPerM3) -> KnPerM {
        // mm² -> m²
        KnPerM(self.0 * 1.0e-6 * unit_weight.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Millimeters);
impl_arithmetic!(Megapascals);
impl_arithmetic!(Gigapascals);
impl_arithmetic!(KnPerM3);
impl_arithmetic!(KnPerM2);
impl_arithmetic!(KnPerM);
impl_arithmetic!(SqMm);
impl_arithmetic!(Mm3);
impl_arithmetic!(Mm4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_to_millimeters() {
        let m = Meters(1.5);
        let mm: Millimeters = m.into();
        assert_eq!(mm.0, 1500.0);
    }

    #[test]
    fn test_gigapascals_to_megapascals() {
        let e: Megapascals = Gigapascals(200.0).into();
        assert_eq!(e.0, 200_000.0);
    }

    #[test]
    fn test_arithmetic() {
        let a = Meters(10.0);
        let b = Meters(4.0);
        assert_eq!((a + b).0, 14.0);
        assert_eq!((a - b).0, 6.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_layer_and_line_loads() {
        let slab = KnPerM3(25.0).over_thickness(Millimeters(200.0).into());
        assert!((slab.0 - 5.0).abs() < 1e-12);

        let girder = SqMm(10_000.0).line_load(KnPerM3(78.5));
        assert!((girder.0 - 0.785).abs() < 1e-12);
    }

    #[test]
    fn test_unit_serialization() {
        let json = serde_json::to_string(&Unit::KilonewtonPerCubicMeter).unwrap();
        assert_eq!(json, "\"kilonewton_per_cubic_meter\"");
        assert_eq!(Unit::Millimeter.symbol(), "mm");
        assert_eq!(Unit::None.to_string(), "");
    }
}
