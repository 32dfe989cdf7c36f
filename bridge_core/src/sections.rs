//! # Girder Section Properties
//!
//! Elastic properties of the girder about its major axis, either taken from
//! the rolled section catalog or computed for a welded plate girder built
//! from three plates.
//!
//! For a plate girder the centroid is measured from the bottom fibre and the
//! moment of inertia uses the parallel axis theorem on each plate:
//!
//! ```text
//! I = sum( b t^3 / 12 + A (y - y_c)^2 )
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::RolledSection;
use crate::units::{KnPerM, KnPerM3, Millimeters, Mm3, Mm4, SqMm};

/// Welded I-section dimensions (mm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateGirder {
    /// Overall depth including both flanges
    pub depth: Millimeters,
    pub web_thickness: Millimeters,
    pub top_flange_width: Millimeters,
    pub top_flange_thickness: Millimeters,
    pub bottom_flange_width: Millimeters,
    pub bottom_flange_thickness: Millimeters,
}

/// Major-axis properties of a girder section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    pub area: SqMm,
    pub depth: Millimeters,
    /// Centroid height above the bottom fibre
    pub centroid: Millimeters,
    pub ixx: Mm4,
    /// Section modulus to the top fibre
    pub z_top: Mm3,
    /// Section modulus to the bottom fibre
    pub z_bottom: Mm3,
}

impl SectionProperties {
    /// Self weight per metre run
    pub fn self_weight(&self, unit_weight: KnPerM3) -> KnPerM {
        self.area.line_load(unit_weight)
    }
}

impl PlateGirder {
    /// Symmetrical girder: bottom flange equal to the top flange
    pub fn symmetrical(depth: f64, web: f64, flange_width: f64, flange_thickness: f64) -> Self {
        PlateGirder {
            depth: Millimeters(depth),
            web_thickness: Millimeters(web),
            top_flange_width: Millimeters(flange_width),
            top_flange_thickness: Millimeters(flange_thickness),
            bottom_flange_width: Millimeters(flange_width),
            bottom_flange_thickness: Millimeters(flange_thickness),
        }
    }

    /// Clear depth of the web between flanges
    pub fn web_depth(&self) -> Millimeters {
        self.depth - self.top_flange_thickness - self.bottom_flange_thickness
    }

    /// `None` when the plates leave no web or have no area
    pub fn properties(&self) -> Option<SectionProperties> {
        let d = self.depth.0;
        let (bt, tt) = (self.top_flange_width.0, self.top_flange_thickness.0);
        let (bb, tb) = (self.bottom_flange_width.0, self.bottom_flange_thickness.0);
        let tw = self.web_thickness.0;
        let hw = self.web_depth().0;
        if hw <= 0.0 {
            return None;
        }

        // (area, own inertia, centroid height) per plate
        let plates = [
            (bb * tb, bb * tb.powi(3) / 12.0, tb / 2.0),
            (tw * hw, tw * hw.powi(3) / 12.0, tb + hw / 2.0),
            (bt * tt, bt * tt.powi(3) / 12.0, d - tt / 2.0),
        ];
        let area: f64 = plates.iter().map(|(a, _, _)| a).sum();
        if area <= 0.0 {
            return None;
        }
        let centroid = plates.iter().map(|(a, _, y)| a * y).sum::<f64>() / area;
        let ixx: f64 = plates
            .iter()
            .map(|(a, i, y)| i + a * (y - centroid).powi(2))
            .sum();

        Some(SectionProperties {
            area: SqMm(area),
            depth: self.depth,
            centroid: Millimeters(centroid),
            ixx: Mm4(ixx),
            z_top: Mm3(ixx / (d - centroid)),
            z_bottom: Mm3(ixx / centroid),
        })
    }
}

impl From<&RolledSection> for SectionProperties {
    /// Rolled sections are doubly symmetric
    fn from(section: &RolledSection) -> Self {
        SectionProperties {
            area: section.area,
            depth: section.depth,
            centroid: section.depth / 2.0,
            ixx: section.ixx,
            z_top: section.zxx,
            z_bottom: section.zxx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetrical_plate_girder() {
        // 1000 deep, 12 web, 300 x 20 flanges
        let girder = PlateGirder::symmetrical(1000.0, 12.0, 300.0, 20.0);
        let props = girder.properties().unwrap();

        assert_eq!(props.area.0, 2.0 * 300.0 * 20.0 + 12.0 * 960.0);
        assert!((props.centroid.0 - 500.0).abs() < 1e-9);

        let flange = 300.0 * 20.0_f64.powi(3) / 12.0 + 6000.0 * 490.0_f64.powi(2);
        let web = 12.0 * 960.0_f64.powi(3) / 12.0;
        let expected = 2.0 * flange + web;
        assert!((props.ixx.0 - expected).abs() / expected < 1e-12);
        assert!((props.z_top.0 - props.z_bottom.0).abs() < 1e-6);
    }

    #[test]
    fn test_unsymmetrical_centroid_moves_to_heavier_flange() {
        let girder = PlateGirder {
            depth: Millimeters(1200.0),
            web_thickness: Millimeters(12.0),
            top_flange_width: Millimeters(300.0),
            top_flange_thickness: Millimeters(20.0),
            bottom_flange_width: Millimeters(450.0),
            bottom_flange_thickness: Millimeters(32.0),
        };
        let props = girder.properties().unwrap();
        assert!(props.centroid.0 < 600.0);
        // Bottom fibre is closer, so its modulus is larger
        assert!(props.z_bottom > props.z_top);
    }

    #[test]
    fn test_no_web_left() {
        let girder = PlateGirder::symmetrical(40.0, 12.0, 300.0, 20.0);
        assert!(girder.properties().is_none());
    }

    #[test]
    fn test_rolled_section_properties_and_weight() {
        let section = crate::catalog::RolledSection::standard_set().remove(0);
        let props = SectionProperties::from(&section);
        assert_eq!(props.centroid.0, section.depth.0 / 2.0);
        // ISMB 500: 11074 mm2 at 78.5 kN/m3 = 0.869 kN/m
        let weight = props.self_weight(KnPerM3(78.5));
        assert!((weight.0 - 0.869).abs() < 1e-3);
    }
}
