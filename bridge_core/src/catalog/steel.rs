//! Structural Steel Catalog (IS 2062 grades, IS 808 rolled sections)
//!
//! Grade designations follow IS 2062 (`E 250A`, `E 350BR`, ...). The yield and
//! ultimate strengths depend only on the numeric part of the designation, so
//! every sub-grade of `E 250` shares Fy = 250 MPa and Fu = 410 MPa.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::catalog::steel::SteelGrade;
//!
//! let grade = SteelGrade::from_designation("E 350BR").unwrap();
//! assert_eq!(grade.yield_strength.0, 350.0);
//! assert_eq!(grade.ultimate_strength.0, 490.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::units::{Gigapascals, KnPerM3, Megapascals, Millimeters, Mm3, Mm4, SqMm};

use super::limits::DEFAULT_STEEL_DENSITY;

/// Modulus of elasticity for structural steel
pub const STEEL_MODULUS_E: Gigapascals = Gigapascals(200.0);
/// Modulus of rigidity for structural steel
pub const STEEL_MODULUS_G: Gigapascals = Gigapascals(77.0);
pub const STEEL_POISSON_RATIO: f64 = 0.30;
/// Coefficient of thermal expansion (per °C, ×10⁻⁶)
pub const STEEL_THERMAL_COEFF: f64 = 11.7;
pub const STEEL_UNIT_WEIGHT: KnPerM3 = KnPerM3(DEFAULT_STEEL_DENSITY);

/// Steel grade designations offered for girders, bracing and diaphragms
pub const STEEL_GRADE_DESIGNATIONS: [&str; 28] = [
    "E 250A", "E 250BR", "E 250B0", "E 250C",
    "E 275A", "E 275BR", "E 275B0", "E 275C",
    "E 300A", "E 300BR", "E 300B0", "E 300C",
    "E 350A", "E 350BR", "E 350B0", "E 350C",
    "E 410A", "E 410BR", "E 410B0", "E 410C",
    "E 450A", "E 450BR",
    "E 550A", "E 550BR",
    "E 600A", "E 600BR",
    "E 650A", "E 650BR",
];

/// (numeric grade, Fy, Fu) in MPa
const GRADE_STRENGTHS: [(u32, f64, f64); 9] = [
    (250, 250.0, 410.0),
    (275, 275.0, 430.0),
    (300, 300.0, 440.0),
    (350, 350.0, 490.0),
    (410, 410.0, 540.0),
    (450, 450.0, 570.0),
    (550, 550.0, 650.0),
    (600, 600.0, 700.0),
    (650, 650.0, 750.0),
];

/// A structural steel grade with its characteristic strengths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteelGrade {
    /// IS 2062 designation (e.g., "E 250A")
    pub designation: String,
    /// Yield strength Fy
    pub yield_strength: Megapascals,
    /// Ultimate tensile strength Fu
    pub ultimate_strength: Megapascals,
}

impl SteelGrade {
    /// Build a grade from its designation, or `None` when the numeric grade is unknown
    pub fn from_designation(designation: &str) -> Option<Self> {
        let grade = numeric_grade(designation)?;
        let (_, fy, fu) = GRADE_STRENGTHS.iter().find(|(g, _, _)| *g == grade)?;
        Some(SteelGrade {
            designation: designation.to_string(),
            yield_strength: Megapascals(*fy),
            ultimate_strength: Megapascals(*fu),
        })
    }

    /// The full IS 2062 grade table
    pub fn all() -> Vec<SteelGrade> {
        STEEL_GRADE_DESIGNATIONS
            .iter()
            .filter_map(|d| SteelGrade::from_designation(d))
            .collect()
    }
}

/// Extract the digits of a designation ("E 350BR" -> 350, "M 40" -> 40)
pub(crate) fn numeric_grade(designation: &str) -> Option<u32> {
    let digits: String = designation.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

// ============================================================================
// Rolled Sections
// ============================================================================

/// Standard rolled I-section (IS 808)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolledSection {
    /// Section designation (e.g., "ISMB 500")
    pub designation: String,
    /// Mass per metre (kg/m)
    pub mass_kg_per_m: f64,
    /// Sectional area
    pub area: SqMm,
    /// Overall depth
    pub depth: Millimeters,
    /// Flange width
    pub flange_width: Millimeters,
    /// Flange thickness
    pub flange_thickness: Millimeters,
    /// Web thickness
    pub web_thickness: Millimeters,
    /// Moment of inertia about the major axis
    pub ixx: Mm4,
    /// Elastic section modulus about the major axis
    pub zxx: Mm3,
}

impl RolledSection {
    /// Row in SP 6(1) units: kg/m, cm², mm, mm, mm, mm, cm⁴, cm³
    #[allow(clippy::too_many_arguments)]
    fn from_handbook(
        designation: &str,
        mass_kg_per_m: f64,
        area_cm2: f64,
        depth: f64,
        flange_width: f64,
        flange_thickness: f64,
        web_thickness: f64,
        ixx_cm4: f64,
        zxx_cm3: f64,
    ) -> Self {
        RolledSection {
            designation: designation.to_string(),
            mass_kg_per_m,
            area: SqMm(area_cm2 * 100.0),
            depth: Millimeters(depth),
            flange_width: Millimeters(flange_width),
            flange_thickness: Millimeters(flange_thickness),
            web_thickness: Millimeters(web_thickness),
            ixx: Mm4(ixx_cm4 * 1.0e4),
            zxx: Mm3(zxx_cm3 * 1.0e3),
        }
    }

    /// Sections offered for rolled-beam girders
    #[rustfmt::skip]
    pub fn standard_set() -> Vec<RolledSection> {
        vec![
            RolledSection::from_handbook("ISMB 500", 86.9, 110.74, 500.0, 180.0, 17.2, 10.2, 45218.3, 1808.7),
            RolledSection::from_handbook("ISMB 550", 103.7, 132.11, 550.0, 190.0, 19.3, 11.2, 64893.6, 2359.8),
            RolledSection::from_handbook("ISMB 600", 122.6, 156.21, 600.0, 210.0, 20.8, 12.0, 91813.0, 3060.4),
            RolledSection::from_handbook("ISWB 500", 95.2, 121.22, 500.0, 250.0, 14.7, 9.9, 52290.9, 2091.6),
            RolledSection::from_handbook("ISWB 550", 112.5, 143.34, 550.0, 250.0, 17.6, 10.5, 74906.1, 2723.9),
            RolledSection::from_handbook("ISWB 600", 133.7, 170.38, 600.0, 250.0, 21.3, 11.2, 106198.5, 3540.0),
        ]
    }
}

impl std::fmt::Display for RolledSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (A={:.0} mm², Ixx={:.3e} mm⁴, Zxx={:.3e} mm³)",
            self.designation, self.area.0, self.ixx.0, self.zxx.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_grade() {
        assert_eq!(numeric_grade("E 250A"), Some(250));
        assert_eq!(numeric_grade("E 650BR"), Some(650));
        assert_eq!(numeric_grade("M 40"), Some(40));
        assert_eq!(numeric_grade("Custom"), None);
    }

    #[test]
    fn test_every_designation_has_strengths() {
        let grades = SteelGrade::all();
        assert_eq!(grades.len(), STEEL_GRADE_DESIGNATIONS.len());
        for grade in &grades {
            assert!(grade.ultimate_strength > grade.yield_strength, "{}", grade.designation);
        }
    }

    #[test]
    fn test_sub_grades_share_strength() {
        let a = SteelGrade::from_designation("E 250A").unwrap();
        let c = SteelGrade::from_designation("E 250C").unwrap();
        assert_eq!(a.yield_strength, c.yield_strength);
        assert_eq!(a.ultimate_strength.0, 410.0);
    }

    #[test]
    fn test_unknown_grade() {
        assert!(SteelGrade::from_designation("E 999").is_none());
    }

    #[test]
    fn test_rolled_section_units() {
        let sections = RolledSection::standard_set();
        let ismb500 = sections.iter().find(|s| s.designation == "ISMB 500").unwrap();
        assert!((ismb500.area.0 - 11074.0).abs() < 1e-6);
        assert!((ismb500.ixx.0 - 4.52183e8).abs() < 1.0);
        assert!((ismb500.zxx.0 - 1.8087e6).abs() < 1e-3);
    }

    #[test]
    fn test_section_modulus_consistent_with_inertia() {
        // Z = I / (d/2) to within handbook rounding
        for s in RolledSection::standard_set() {
            let z = s.ixx.0 / (s.depth.0 / 2.0);
            assert!((z - s.zxx.0).abs() / s.zxx.0 < 0.01, "{}", s.designation);
        }
    }
}
