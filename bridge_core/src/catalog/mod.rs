//! # Reference Catalog
//!
//! Static reference data shared by every validation and derivation call:
//! material grades, standard rolled sections, option lists and code limits.
//!
//! The standard catalog is built once per process and never mutated. Callers
//! share it through an `Arc`:
//!
//! ```rust
//! use bridge_core::catalog::Catalog;
//!
//! let catalog = Catalog::shared();
//! let section = catalog.rolled_section("ISMB 500").unwrap();
//! assert_eq!(section.depth.0, 500.0);
//! ```
//!
//! ## Contents
//!
//! - [`steel`] - IS 2062 steel grades, IS 808 rolled sections, steel constants
//! - [`concrete`] - deck concrete grades, Ecm aggregate factors, reinforcement
//! - [`limits`] - IRC limits and preliminary design defaults

pub mod concrete;
pub mod limits;
pub mod steel;

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub use concrete::{ConcreteGrade, EcmAggregate, ReinforcementGrade};
pub use steel::{RolledSection, SteelGrade};

// ============================================================================
// Option Lists
// ============================================================================

pub const STRUCTURE_HIGHWAY: &str = "Highway Bridge";
pub const STRUCTURE_OTHER: &str = "Other";
pub const STRUCTURE_TYPES: [&str; 2] = [STRUCTURE_HIGHWAY, STRUCTURE_OTHER];

/// Cities used to look up site-dependent loads, plus a custom entry
pub const PROJECT_LOCATIONS: [&str; 49] = [
    "Delhi", "Mumbai", "Bangalore", "Kolkata", "Chennai", "Hyderabad",
    "Ahmedabad", "Pune", "Surat", "Jaipur", "Lucknow", "Kanpur",
    "Nagpur", "Indore", "Thane", "Bhopal", "Visakhapatnam", "Pimpri-Chinchwad",
    "Patna", "Vadodara", "Ghaziabad", "Ludhiana", "Agra", "Nashik",
    "Faridabad", "Meerut", "Rajkot", "Kalyan-Dombivali", "Vasai-Virar", "Varanasi",
    "Srinagar", "Aurangabad", "Dhanbad", "Amritsar", "Navi Mumbai", "Allahabad",
    "Ranchi", "Howrah", "Coimbatore", "Jabalpur", "Gwalior", "Vijayawada",
    "Jodhpur", "Madurai", "Raipur", "Kota", "Chandigarh", "Guwahati",
    "Custom",
];

pub const NO: &str = "No";
pub const YES: &str = "Yes";
pub const YES_NO: [&str; 2] = [NO, YES];

/// Footpath arrangement. IRC 5 Cl. 101.41 requires a safety kerb when there is none.
pub const FOOTPATH_NONE: &str = "None";
pub const FOOTPATH_SINGLE: &str = "Single Sided";
pub const FOOTPATH_BOTH: &str = "Both";
pub const FOOTPATH_OPTIONS: [&str; 3] = [FOOTPATH_NONE, FOOTPATH_SINGLE, FOOTPATH_BOTH];

pub const RAILING_TYPES: [&str; 3] = ["IRC 5 - RCC Railing", "IRC 5 - Steel Railing", "Custom"];

pub const GIRDER_ROLLED: &str = "IS Standard Rolled Beam";
pub const GIRDER_PLATE: &str = "Plate Girder";
pub const GIRDER_TYPES: [&str; 2] = [GIRDER_ROLLED, GIRDER_PLATE];

pub const SYMMETRICAL: &str = "Symmetrical";
pub const UNSYMMETRICAL: &str = "Unsymmetrical";
pub const GIRDER_SYMMETRY: [&str; 2] = [SYMMETRICAL, UNSYMMETRICAL];

pub const SUPPORT_FIXED: &str = "Fixed";
pub const SUPPORT_PINNED: &str = "Pinned";
pub const SUPPORT_ROLLER: &str = "Roller";
pub const SUPPORT_TYPES: [&str; 3] = [SUPPORT_FIXED, SUPPORT_PINNED, SUPPORT_ROLLER];

/// Number of footpaths for a footpath option
pub fn footpath_count(option: &str) -> usize {
    match option {
        FOOTPATH_SINGLE => 1,
        FOOTPATH_BOTH => 2,
        _ => 0,
    }
}

// ============================================================================
// Barrier and Surfacing Entries
// ============================================================================

/// How a crash barrier deflects on impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarrierRigidity {
    Rigid,
    SemiRigid,
    Flexible,
}

impl BarrierRigidity {
    pub fn display_name(&self) -> &'static str {
        match self {
            BarrierRigidity::Rigid => "Rigid",
            BarrierRigidity::SemiRigid => "Semi-Rigid",
            BarrierRigidity::Flexible => "Flexible",
        }
    }

    /// IRC 5 Cl. 109.6.4: only rigid barriers are allowed without an outer footpath
    pub fn needs_outer_footpath(&self) -> bool {
        !matches!(self, BarrierRigidity::Rigid)
    }
}

/// Crash barrier type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrashBarrierType {
    pub name: String,
    pub rigidity: BarrierRigidity,
}

impl CrashBarrierType {
    /// Custom barriers are treated as rigid
    pub fn standard_set() -> Vec<CrashBarrierType> {
        let entry = |name: &str, rigidity| CrashBarrierType {
            name: name.to_string(),
            rigidity,
        };
        vec![
            entry("IRC 5 - RCC Crash Barrier", BarrierRigidity::Rigid),
            entry("IRC 5 - Steel Crash Barrier", BarrierRigidity::SemiRigid),
            entry("IRC 5 - Metal Beam", BarrierRigidity::Flexible),
            entry("Custom", BarrierRigidity::Rigid),
        ]
    }
}

/// Wearing coat material and its default unit weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WearingCoatMaterial {
    pub name: String,
    /// Unit weight in kN/m³, `None` when the user must enter it
    pub density: Option<f64>,
}

impl WearingCoatMaterial {
    pub fn standard_set() -> Vec<WearingCoatMaterial> {
        let entry = |name: &str, density| WearingCoatMaterial {
            name: name.to_string(),
            density,
        };
        vec![
            entry("Concrete", Some(limits::DEFAULT_CONCRETE_DENSITY)),
            entry("Bituminous", Some(22.0)),
            entry("Other", None),
        ]
    }
}

// ============================================================================
// Catalog
// ============================================================================

static STANDARD: Lazy<Arc<Catalog>> = Lazy::new(|| {
    let catalog = Catalog::standard();
    tracing::debug!(
        steel_grades = catalog.steel_grades.len(),
        rolled_sections = catalog.rolled_sections.len(),
        "standard catalog loaded"
    );
    Arc::new(catalog)
});

/// Read-only reference tables.
///
/// Lookups are by exact display name, the same strings the field schema
/// offers as choices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub steel_grades: Vec<SteelGrade>,
    pub rolled_sections: Vec<RolledSection>,
    pub concrete_grades: Vec<ConcreteGrade>,
    pub ecm_aggregates: Vec<EcmAggregate>,
    pub reinforcement_grades: Vec<ReinforcementGrade>,
    pub crash_barriers: Vec<CrashBarrierType>,
    pub wearing_coats: Vec<WearingCoatMaterial>,
}

impl Catalog {
    /// Build the standard tables
    pub fn standard() -> Self {
        Catalog {
            steel_grades: SteelGrade::all(),
            rolled_sections: RolledSection::standard_set(),
            concrete_grades: ConcreteGrade::all(),
            ecm_aggregates: EcmAggregate::standard_set(),
            reinforcement_grades: ReinforcementGrade::all(),
            crash_barriers: CrashBarrierType::standard_set(),
            wearing_coats: WearingCoatMaterial::standard_set(),
        }
    }

    /// The process-wide standard catalog
    pub fn shared() -> Arc<Catalog> {
        Arc::clone(&STANDARD)
    }

    pub fn steel_grade(&self, designation: &str) -> Option<&SteelGrade> {
        self.steel_grades.iter().find(|g| g.designation == designation)
    }

    pub fn rolled_section(&self, designation: &str) -> Option<&RolledSection> {
        self.rolled_sections.iter().find(|s| s.designation == designation)
    }

    pub fn concrete_grade(&self, designation: &str) -> Option<&ConcreteGrade> {
        self.concrete_grades.iter().find(|g| g.designation == designation)
    }

    pub fn ecm_aggregate(&self, label: &str) -> Option<&EcmAggregate> {
        self.ecm_aggregates.iter().find(|a| a.label == label)
    }

    pub fn reinforcement_grade(&self, designation: &str) -> Option<&ReinforcementGrade> {
        self.reinforcement_grades.iter().find(|g| g.designation == designation)
    }

    pub fn crash_barrier(&self, name: &str) -> Option<&CrashBarrierType> {
        self.crash_barriers.iter().find(|b| b.name == name)
    }

    pub fn wearing_coat(&self, name: &str) -> Option<&WearingCoatMaterial> {
        self.wearing_coats.iter().find(|w| w.name == name)
    }

    // Choice lists for the field schema

    pub fn steel_grade_names(&self) -> Vec<String> {
        self.steel_grades.iter().map(|g| g.designation.clone()).collect()
    }

    pub fn rolled_section_names(&self) -> Vec<String> {
        self.rolled_sections.iter().map(|s| s.designation.clone()).collect()
    }

    pub fn concrete_grade_names(&self) -> Vec<String> {
        self.concrete_grades.iter().map(|g| g.designation.clone()).collect()
    }

    pub fn ecm_aggregate_labels(&self) -> Vec<String> {
        self.ecm_aggregates.iter().map(|a| a.label.clone()).collect()
    }

    pub fn reinforcement_grade_names(&self) -> Vec<String> {
        self.reinforcement_grades.iter().map(|g| g.designation.clone()).collect()
    }

    pub fn crash_barrier_names(&self) -> Vec<String> {
        self.crash_barriers.iter().map(|b| b.name.clone()).collect()
    }

    pub fn wearing_coat_names(&self) -> Vec<String> {
        self.wearing_coats.iter().map(|w| w.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_catalog_is_single_instance() {
        let a = Catalog::shared();
        let b = Catalog::shared();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_lookups() {
        let catalog = Catalog::standard();
        assert!(catalog.steel_grade("E 410C").is_some());
        assert!(catalog.rolled_section("ISWB 600").is_some());
        assert!(catalog.concrete_grade("M 90").is_some());
        assert!(catalog.reinforcement_grade("Fe 500").is_some());
        assert!(catalog.rolled_section("ISMB 450").is_none());
        assert!(catalog.steel_grade("e 410c").is_none());
    }

    #[test]
    fn test_barrier_rigidity() {
        let catalog = Catalog::standard();
        let rcc = catalog.crash_barrier("IRC 5 - RCC Crash Barrier").unwrap();
        let metal = catalog.crash_barrier("IRC 5 - Metal Beam").unwrap();
        assert!(!rcc.rigidity.needs_outer_footpath());
        assert!(metal.rigidity.needs_outer_footpath());
        assert_eq!(metal.rigidity.display_name(), "Flexible");
    }

    #[test]
    fn test_wearing_coat_densities() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.wearing_coat("Concrete").unwrap().density, Some(25.0));
        assert_eq!(catalog.wearing_coat("Other").unwrap().density, None);
    }

    #[test]
    fn test_footpath_count() {
        assert_eq!(footpath_count(FOOTPATH_NONE), 0);
        assert_eq!(footpath_count(FOOTPATH_SINGLE), 1);
        assert_eq!(footpath_count(FOOTPATH_BOTH), 2);
    }

    #[test]
    fn test_name_lists_follow_tables() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.steel_grade_names()[0], "E 250A");
        assert_eq!(catalog.rolled_section_names().len(), 6);
        assert_eq!(catalog.concrete_grade_names()[0], "M 25");
    }
}
