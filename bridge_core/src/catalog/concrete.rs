//! Deck Concrete and Reinforcement (IRC 112)
//!
//! Concrete grades are named by their characteristic cube strength (`M 40`
//! means fck = 40 MPa). Mean tensile strength and secant modulus follow the
//! simplified expressions used for preliminary deck design:
//!
//! - fctm = 0.7 √fck (MPa)
//! - Ecm = 5 √fck × k (GPa), where k depends on the coarse aggregate
//!
//! Both are rounded to one decimal, matching the values shown on the form.

use serde::{Deserialize, Serialize};

use crate::units::{Gigapascals, Megapascals, Millimeters, SqMm};

use super::steel::numeric_grade;

/// Concrete grades offered for the deck slab
pub const CONCRETE_GRADE_DESIGNATIONS: [&str; 14] = [
    "M 25", "M 30", "M 35", "M 40", "M 45", "M 50", "M 55",
    "M 60", "M 65", "M 70", "M 75", "M 80", "M 85", "M 90",
];

/// Reinforcement grades offered for the deck slab
pub const REINFORCEMENT_DESIGNATIONS: [&str; 3] = ["Fe 415", "Fe 500", "Fe 550"];

/// Bar diameters offered for deck reinforcement (mm)
pub const BAR_SIZES: [&str; 7] = ["8", "10", "12", "16", "20", "25", "32"];

/// Label of the aggregate option that takes a user-entered factor
pub const CUSTOM_AGGREGATE: &str = "Custom";

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// A concrete grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteGrade {
    /// Designation (e.g., "M 25")
    pub designation: String,
    /// Characteristic cube strength (fck)cu
    pub fck: Megapascals,
}

impl ConcreteGrade {
    pub fn from_designation(designation: &str) -> Option<Self> {
        let fck = numeric_grade(designation)?;
        Some(ConcreteGrade {
            designation: designation.to_string(),
            fck: Megapascals(f64::from(fck)),
        })
    }

    pub fn all() -> Vec<ConcreteGrade> {
        CONCRETE_GRADE_DESIGNATIONS
            .iter()
            .filter_map(|d| ConcreteGrade::from_designation(d))
            .collect()
    }

    /// Mean tensile strength fctm = 0.7 √fck
    pub fn mean_tensile_strength(&self) -> Megapascals {
        Megapascals(round1(0.7 * self.fck.0.sqrt()))
    }

    /// Secant modulus Ecm = 5 √fck × aggregate factor
    pub fn secant_modulus(&self, aggregate_factor: f64) -> Gigapascals {
        Gigapascals(round1(5.0 * self.fck.0.sqrt() * aggregate_factor))
    }
}

/// Coarse aggregate type and its Ecm multiplication factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcmAggregate {
    /// Label shown on the form
    pub label: String,
    /// Fixed factor, or `None` when the user supplies one
    pub factor: Option<f64>,
}

impl EcmAggregate {
    pub fn standard_set() -> Vec<EcmAggregate> {
        let entry = |label: &str, factor: Option<f64>| EcmAggregate {
            label: label.to_string(),
            factor,
        };
        vec![
            entry("Quartzite/granite aggregates = 1", Some(1.0)),
            entry("Limestone aggregates = 0.9", Some(0.9)),
            entry("Sandstone aggregates = 0.7", Some(0.7)),
            entry("Basalt aggregates = 1.2", Some(1.2)),
            entry(CUSTOM_AGGREGATE, None),
        ]
    }

    pub fn is_custom(&self) -> bool {
        self.factor.is_none()
    }
}

/// Reinforcing bar grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementGrade {
    /// Designation (e.g., "Fe 500")
    pub designation: String,
    /// Characteristic yield strength fy
    pub fy: Megapascals,
}

impl ReinforcementGrade {
    pub fn from_designation(designation: &str) -> Option<Self> {
        let fy = numeric_grade(designation)?;
        Some(ReinforcementGrade {
            designation: designation.to_string(),
            fy: Megapascals(f64::from(fy)),
        })
    }

    pub fn all() -> Vec<ReinforcementGrade> {
        REINFORCEMENT_DESIGNATIONS
            .iter()
            .filter_map(|d| ReinforcementGrade::from_designation(d))
            .collect()
    }
}

/// Cross-section area of one bar
pub fn bar_area(diameter: Millimeters) -> SqMm {
    SqMm(std::f64::consts::PI * diameter.0.powi(2) / 4.0)
}
