//! # Deck Geometry
//!
//! Transverse layout of the deck and placement of permanent loads on it.
//!
//! The global coordinate system has its origin at the bottom-left corner of
//! the deck: `x` runs across the width, `z` along the span. Components are
//! laid out left to right:
//!
//! ```text
//! railing | footpath | crash barrier | carriageway | median |
//!     carriageway | crash barrier | footpath | railing
//! ```
//!
//! Components with zero width are left out. A single-sided footpath (and its
//! railing) is placed on the left.

use serde::{Deserialize, Serialize};

use crate::catalog::{footpath_count, YES};
use crate::input::ValidatedInputs;
use crate::schema::bridge::keys;
use crate::units::{Meters, Millimeters};

// ============================================================================
// Section Components
// ============================================================================

/// Named strip of the deck cross-section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    RailingLeft,
    FootpathLeft,
    CrashBarrierLeft,
    CarriagewayLeft,
    Median,
    CarriagewayRight,
    CrashBarrierRight,
    FootpathRight,
    RailingRight,
}

impl ComponentKind {
    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::RailingLeft => "railing_left",
            ComponentKind::FootpathLeft => "footpath_left",
            ComponentKind::CrashBarrierLeft => "crash_barrier_left",
            ComponentKind::CarriagewayLeft => "carriageway_left",
            ComponentKind::Median => "median",
            ComponentKind::CarriagewayRight => "carriageway_right",
            ComponentKind::CrashBarrierRight => "crash_barrier_right",
            ComponentKind::FootpathRight => "footpath_right",
            ComponentKind::RailingRight => "railing_right",
        }
    }
}

/// A strip of the deck between two x coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionComponent {
    pub kind: ComponentKind,
    pub width: Meters,
    pub x_start: Meters,
    pub x_end: Meters,
}

impl SectionComponent {
    pub fn center(&self) -> Meters {
        Meters(0.5 * (self.x_start.0 + self.x_end.0))
    }
}

// ============================================================================
// Cross-Section Layout
// ============================================================================

/// Widths that define the deck cross-section
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutWidths {
    /// Total carriageway width, split equally either side of the median
    pub carriageway: Meters,
    pub crash_barrier: Meters,
    pub railing: Meters,
    pub footpath: Meters,
    pub median: Meters,
    /// 0, 1 or 2
    pub footpaths: usize,
}

/// Ordered deck cross-section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSectionLayout {
    components: Vec<SectionComponent>,
    total_width: Meters,
}

impl CrossSectionLayout {
    pub fn new(widths: &LayoutWidths) -> Self {
        let mut components = Vec::new();
        let mut x = 0.0;
        let mut add = |kind: ComponentKind, width: Meters| {
            if width.0 <= 0.0 {
                return;
            }
            components.push(SectionComponent {
                kind,
                width,
                x_start: Meters(x),
                x_end: Meters(x + width.0),
            });
            x += width.0;
        };

        if widths.footpaths >= 1 {
            add(ComponentKind::RailingLeft, widths.railing);
            add(ComponentKind::FootpathLeft, widths.footpath);
        }
        add(ComponentKind::CrashBarrierLeft, widths.crash_barrier);
        add(ComponentKind::CarriagewayLeft, widths.carriageway / 2.0);
        add(ComponentKind::Median, widths.median);
        add(ComponentKind::CarriagewayRight, widths.carriageway / 2.0);
        add(ComponentKind::CrashBarrierRight, widths.crash_barrier);
        if widths.footpaths >= 2 {
            add(ComponentKind::FootpathRight, widths.footpath);
            add(ComponentKind::RailingRight, widths.railing);
        }

        CrossSectionLayout {
            components,
            total_width: Meters(x),
        }
    }

    /// Layout from validated bridge form values.
    ///
    /// With a median the entered carriageway width is per side. Missing
    /// optional widths count as zero.
    pub fn from_values(values: &ValidatedInputs) -> Self {
        Self::new(&LayoutWidths::from_values(values))
    }

    pub fn components(&self) -> &[SectionComponent] {
        &self.components
    }

    pub fn component(&self, kind: ComponentKind) -> Option<&SectionComponent> {
        self.components.iter().find(|c| c.kind == kind)
    }

    pub fn has(&self, kind: ComponentKind) -> bool {
        self.component(kind).is_some()
    }

    /// Overall bridge width
    pub fn total_width(&self) -> Meters {
        self.total_width
    }

    /// e.g. "crash_barrier_left(0.50) | carriageway_left(3.75) | ..."
    pub fn describe(&self) -> String {
        self.components
            .iter()
            .map(|c| format!("{}({:.2})", c.kind.name(), c.width.0))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl LayoutWidths {
    pub fn from_values(values: &ValidatedInputs) -> Self {
        let median = values.is(keys::INCLUDE_MEDIAN, YES);
        let width = |field: &str| values.number(field).unwrap_or(0.0);
        let entered = width(keys::CARRIAGEWAY_WIDTH);
        let footpaths = values.text(keys::FOOTPATH).map(footpath_count).unwrap_or(0);
        LayoutWidths {
            carriageway: Meters(if median { 2.0 * entered } else { entered }),
            crash_barrier: Meters(width(keys::CRASH_BARRIER_WIDTH)),
            railing: Millimeters(width(keys::RAILING_WIDTH)).into(),
            footpath: Meters(if footpaths > 0 { width(keys::FOOTPATH_WIDTH) } else { 0.0 }),
            median: Meters(if median { width(keys::MEDIAN_WIDTH) } else { 0.0 }),
            footpaths,
        }
    }
}

// ============================================================================
// Girder Arrangement
// ============================================================================

/// Girders that fit across the deck: round((W - 2 overhang) / spacing) + 1.
///
/// Exact halves round to the even neighbour, so 2.5 bays give 3 girders.
pub fn girder_count(width: f64, overhang: f64, spacing: f64) -> i64 {
    if spacing <= 0.0 {
        return 0;
    }
    ((width - 2.0 * overhang) / spacing).round_ties_even() as i64 + 1
}

/// Spacing that places `count` girders exactly between the overhangs
pub fn effective_girder_spacing(width: f64, overhang: f64, count: i64) -> Option<f64> {
    (count >= 2).then(|| (width - 2.0 * overhang) / (count - 1) as f64)
}

// ============================================================================
// Load Placement
// ============================================================================

/// A point on the deck plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: Meters,
    pub z: Meters,
}

/// Line load running the full span at a fixed x
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineLoad {
    pub start: Point,
    pub end: Point,
}

/// Rectangular patch load spanning the full length, corners counter-clockwise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatchLoad {
    pub corners: [Point; 4],
}

impl PatchLoad {
    fn strip(x_start: f64, x_end: f64, span: f64) -> Self {
        let p = |x: f64, z: f64| Point { x: Meters(x), z: Meters(z) };
        PatchLoad {
            corners: [p(x_start, 0.0), p(x_end, 0.0), p(x_end, span), p(x_start, span)],
        }
    }

    pub fn width(&self) -> Meters {
        self.corners[1].x - self.corners[0].x
    }
}

/// Places permanent loads on a deck of given span and layout
#[derive(Debug, Clone)]
pub struct LoadPlacement<'a> {
    span: Meters,
    layout: &'a CrossSectionLayout,
}

impl<'a> LoadPlacement<'a> {
    pub fn new(span: Meters, layout: &'a CrossSectionLayout) -> Self {
        LoadPlacement { span, layout }
    }

    fn line_at(&self, x: Meters) -> LineLoad {
        LineLoad {
            start: Point { x, z: Meters(0.0) },
            end: Point { x, z: self.span },
        }
    }

    /// Line load along the centreline of a component, if the layout has it
    pub fn line_load(&self, kind: ComponentKind) -> Option<LineLoad> {
        self.layout.component(kind).map(|c| self.line_at(c.center()))
    }

    /// Deck slab self weight over the full width
    pub fn deck_load(&self) -> PatchLoad {
        PatchLoad::strip(0.0, self.layout.total_width().0, self.span.0)
    }

    /// Wearing coat, held back from both edges by the clearance.
    /// `None` when the clearance leaves no width.
    pub fn overlay_load(&self, edge_clearance: Meters) -> Option<PatchLoad> {
        let width = self.layout.total_width().0;
        let (start, end) = (edge_clearance.0, width - edge_clearance.0);
        (end > start).then(|| PatchLoad::strip(start, end, self.span.0))
    }

    pub fn footpath_load(&self, kind: ComponentKind) -> Option<PatchLoad> {
        self.layout
            .component(kind)
            .map(|c| PatchLoad::strip(c.x_start.0, c.x_end.0, self.span.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FieldValue;

    fn widths(footpaths: usize, median: f64) -> LayoutWidths {
        LayoutWidths {
            carriageway: Meters(7.5),
            crash_barrier: Meters(0.5),
            railing: Meters(0.15),
            footpath: Meters(1.5),
            median: Meters(median),
            footpaths,
        }
    }

    #[test]
    fn test_layout_without_footpath() {
        let layout = CrossSectionLayout::new(&widths(0, 0.0));
        let kinds: Vec<ComponentKind> = layout.components().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ComponentKind::CrashBarrierLeft,
                ComponentKind::CarriagewayLeft,
                ComponentKind::CarriagewayRight,
                ComponentKind::CrashBarrierRight,
            ]
        );
        assert!((layout.total_width().0 - 8.5).abs() < 1e-9);
    }

    #[test]
    fn test_single_footpath_goes_left() {
        let layout = CrossSectionLayout::new(&widths(1, 0.0));
        assert!(layout.has(ComponentKind::FootpathLeft));
        assert!(layout.has(ComponentKind::RailingLeft));
        assert!(!layout.has(ComponentKind::FootpathRight));
        assert!((layout.total_width().0 - 10.15).abs() < 1e-9);
        assert_eq!(layout.components()[0].kind, ComponentKind::RailingLeft);
    }

    #[test]
    fn test_components_are_contiguous() {
        let layout = CrossSectionLayout::new(&widths(2, 1.2));
        let components = layout.components();
        assert_eq!(components.len(), 9);
        for pair in components.windows(2) {
            assert_eq!(pair[0].x_end, pair[1].x_start);
        }
        assert_eq!(components.last().unwrap().x_end, layout.total_width());
    }

    #[test]
    fn test_describe() {
        let layout = CrossSectionLayout::new(&widths(0, 0.0));
        assert_eq!(
            layout.describe(),
            "crash_barrier_left(0.50) | carriageway_left(3.75) | carriageway_right(3.75) | crash_barrier_right(0.50)"
        );
    }

    #[test]
    fn test_widths_from_values_with_median() {
        let mut values = ValidatedInputs::new();
        values.insert(keys::CARRIAGEWAY_WIDTH, FieldValue::Number(7.5));
        values.insert(keys::INCLUDE_MEDIAN, FieldValue::from("Yes"));
        values.insert(keys::MEDIAN_WIDTH, FieldValue::Number(1.0));
        values.insert(keys::FOOTPATH, FieldValue::from("None"));
        values.insert(keys::FOOTPATH_WIDTH, FieldValue::Number(2.0));
        values.insert(keys::RAILING_WIDTH, FieldValue::Number(150.0));

        let widths = LayoutWidths::from_values(&values);
        assert_eq!(widths.carriageway, Meters(15.0));
        assert_eq!(widths.median, Meters(1.0));
        // Footpath width ignored without footpaths
        assert_eq!(widths.footpath, Meters(0.0));
        assert!((widths.railing.0 - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_girder_count() {
        // (10.5 - 2) / 2.5 = 3.4 -> 3 bays -> 4 girders
        assert_eq!(girder_count(10.5, 1.0, 2.5), 4);
        assert_eq!(girder_count(10.5, 1.0, 0.0), 0);
        let spacing = effective_girder_spacing(10.5, 1.0, 4).unwrap();
        assert!((spacing - 8.5 / 3.0).abs() < 1e-12);
        assert!(effective_girder_spacing(10.5, 1.0, 1).is_none());
    }

    #[test]
    fn test_girder_count_half_bay_rounds_to_even() {
        // 10 / 4 = 2.5 bays
        assert_eq!(girder_count(11.8, 0.9, 4.0), 3);
        assert_eq!(effective_girder_spacing(11.8, 0.9, 3), Some(5.0));
        // 14 / 4 = 3.5 bays
        assert_eq!(girder_count(15.8, 0.9, 4.0), 5);
        // 2 / 4 = 0.5 bay leaves a single girder
        assert_eq!(girder_count(2.0, 0.0, 4.0), 1);
    }

    #[test]
    fn test_load_placement() {
        let layout = CrossSectionLayout::new(&widths(2, 0.0));
        let placement = LoadPlacement::new(Meters(30.0), &layout);

        let barrier = placement.line_load(ComponentKind::CrashBarrierLeft).unwrap();
        // railing 0.15 + footpath 1.5 + half barrier 0.25
        assert!((barrier.start.x.0 - 1.9).abs() < 1e-9);
        assert_eq!(barrier.end.z, Meters(30.0));
        assert!(placement.line_load(ComponentKind::Median).is_none());

        let overlay = placement.overlay_load(Meters(0.3)).unwrap();
        assert!((overlay.width().0 - (layout.total_width().0 - 0.6)).abs() < 1e-9);
        assert!(placement.overlay_load(Meters(100.0)).is_none());

        let footpath = placement.footpath_load(ComponentKind::FootpathRight).unwrap();
        assert!((footpath.width().0 - 1.5).abs() < 1e-9);
        assert_eq!(placement.deck_load().width(), layout.total_width());
    }
}
