//! Layer composition.
//!
//! [`compose`] turns the normalised, classified and aggregated data of one
//! region into the ordered list of layers a renderer draws. The order is
//! fixed:
//!
//! 1. boundary outline
//! 2. subdivision outlines with labels and licence popups
//! 3. primary eligibility points
//! 4. secondary eligibility points
//! 5. community anchor points
//! 6. density buckets, ascending
//! 7. infrastructure markers per category
//! 8. coverage rings per category, near before far
//! 9. operator overlays, then fixed overlays
//!
//! Only the boundary, subdivision and primary layers open visible. Layers
//! whose backing data is empty are left out.

use std::collections::BTreeSet;

use geo::{Centroid, MultiPolygon, Point};
use log::debug;

use crate::{
    AreaFeature, Category, CategoryGroups, Color, CoverageDistances, CoverageRing,
    DensitySummary, DistanceClass, GeoPoint, GeoPolygon, JoinReport, Label, LayerContent,
    LayerSpec, LayerStyle, MarkerKind, PointFeature, coverage_rings, infrastructure_popup,
    licence_popup, overlay_color,
};

/// Fill colour of eligibility markers.
pub const ELIGIBILITY_FILL: &str = "#01fbff";
/// Label used for subdivisions without a name.
pub const UNNAMED_SUBDIVISION: &str = "Unknown County";

const ELIGIBILITY_RADIUS: f64 = 4.0;

/// Which optional datasets carry data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetAvailability {
    /// Second eligibility round.
    pub secondary: bool,
    /// Community anchor institutions.
    pub anchors: bool,
    /// Infrastructure points.
    pub infrastructure: bool,
    /// Licence table joined to subdivisions.
    pub licences: bool,
    /// Any third-party overlay.
    pub overlays: bool,
}

/// Origin of a third-party overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayKind {
    /// An operator footprint, coloured by the palette.
    Operator,
    /// A fixed overlay with its own colour.
    Fixed {
        /// Stroke and fill colour.
        color: Color,
    },
}

/// A named third-party polygon overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// Overlay name without any layer prefix.
    pub name: String,
    /// Where the overlay comes from.
    pub kind: OverlayKind,
    /// Overlay polygons.
    pub features: Vec<GeoPolygon>,
}

impl Overlay {
    /// An operator footprint.
    #[must_use]
    pub fn operator(name: &str, features: Vec<GeoPolygon>) -> Self {
        Self {
            name: name.to_owned(),
            kind: OverlayKind::Operator,
            features,
        }
    }

    /// A fixed overlay drawn in `color`.
    #[must_use]
    pub fn fixed(name: &str, color: Color, features: Vec<GeoPolygon>) -> Self {
        Self {
            name: name.to_owned(),
            kind: OverlayKind::Fixed { color },
            features,
        }
    }

    fn layer_name(&self) -> String {
        match self.kind {
            OverlayKind::Operator => format!("WISP - {}", self.name),
            OverlayKind::Fixed { .. } => self.name.clone(),
        }
    }

    fn style(&self) -> LayerStyle {
        match &self.kind {
            OverlayKind::Operator => LayerStyle::solid(overlay_color(&self.name), 1.0, 0.6),
            OverlayKind::Fixed { color } => LayerStyle::solid(color.clone(), 2.0, 0.7),
        }
    }
}

/// Everything [`compose`] needs for one region.
#[derive(Debug, Clone, Copy)]
pub struct CompositionInput<'a> {
    /// Region boundary polygons.
    pub boundary: &'a [GeoPolygon],
    /// Subdivision polygons.
    pub subdivisions: &'a [GeoPolygon],
    /// Licence records joined to subdivisions, when a licence table was read.
    pub licences: Option<&'a JoinReport>,
    /// Primary eligibility points.
    pub primary: &'a [GeoPoint],
    /// Second-round eligibility points.
    pub secondary: &'a [GeoPoint],
    /// Community anchor institution points.
    pub anchors: &'a [GeoPoint],
    /// Aggregated density buckets.
    pub density: &'a DensitySummary,
    /// Classified infrastructure points.
    pub infrastructure: &'a CategoryGroups,
    /// Coverage ring distances.
    pub distances: CoverageDistances,
    /// Third-party overlays in discovery order.
    pub overlays: &'a [Overlay],
}

impl CompositionInput<'_> {
    /// Derive which optional datasets carry data.
    #[must_use]
    pub fn availability(&self) -> DatasetAvailability {
        DatasetAvailability {
            secondary: !self.secondary.is_empty(),
            anchors: !self.anchors.is_empty(),
            infrastructure: !self.infrastructure.is_empty(),
            licences: self.licences.is_some_and(|report| !report.groups.is_empty()),
            overlays: self.overlays.iter().any(|overlay| !overlay.features.is_empty()),
        }
    }
}

#[derive(Default)]
struct Composition {
    layers: Vec<LayerSpec>,
    names: BTreeSet<String>,
}

impl Composition {
    fn push(
        &mut self,
        name: String,
        content: LayerContent,
        style: LayerStyle,
        visible: bool,
        optional: bool,
    ) {
        if content.is_empty() {
            debug!("Omitted empty layer '{name}'");
            return;
        }
        let unique = self.unique_name(name);
        self.names.insert(unique.clone());
        self.layers.push(LayerSpec {
            name: unique,
            content,
            style,
            default_visible: visible,
            optional,
        });
    }

    fn unique_name(&self, name: String) -> String {
        if !self.names.contains(&name) {
            return name;
        }
        (2..)
            .map(|suffix| format!("{name} ({suffix})"))
            .find(|candidate| !self.names.contains(candidate))
            .unwrap_or(name)
    }
}

/// Assemble the ordered layer list for one region.
///
/// The result depends only on `input`: composing the same input twice yields
/// equal lists.
#[must_use]
pub fn compose(input: &CompositionInput<'_>) -> Vec<LayerSpec> {
    let availability = input.availability();
    let mut out = Composition::default();

    out.push(
        "State Outline".to_owned(),
        areas(input.boundary.iter().map(|p| AreaFeature::plain(p.geometry.clone()))),
        LayerStyle::outline(Color::named("red"), 2.0),
        true,
        false,
    );
    out.push(
        "County Outline".to_owned(),
        areas(input.subdivisions.iter().map(|p| subdivision_feature(p, input.licences))),
        LayerStyle::outline(Color::named("blue"), 1.0),
        true,
        false,
    );

    let primary_name = if availability.secondary || availability.anchors {
        "BEAD Eligible Locations Round 1"
    } else {
        "BEAD Eligible Locations"
    };
    out.push(
        primary_name.to_owned(),
        circles(input.primary),
        eligibility_style("white"),
        true,
        false,
    );
    out.push(
        "BEAD Eligible Locations Round 2".to_owned(),
        circles(input.secondary),
        eligibility_style("black"),
        false,
        true,
    );
    out.push(
        "BEAD Eligible CAIs".to_owned(),
        circles(input.anchors),
        eligibility_style("black"),
        false,
        true,
    );

    for layer in &input.density.layers {
        out.push(
            layer.bucket.label.to_owned(),
            areas([AreaFeature::plain(layer.geometry.clone())]),
            LayerStyle::solid(layer.bucket.fill(), 1.0, 0.6),
            false,
            false,
        );
    }

    for (category, points) in input.infrastructure.iter() {
        out.push(
            format!("Antenna Locations - {}", category.marker_name()),
            LayerContent::Points {
                marker: MarkerKind::Pin,
                features: points
                    .iter()
                    .map(|point| PointFeature {
                        location: point.location,
                        popup: Some(infrastructure_popup(point)),
                    })
                    .collect(),
            },
            LayerStyle::solid(category.color(), 1.0, 1.0),
            false,
            true,
        );
    }

    for (category, points) in input.infrastructure.iter() {
        let (near, far) = ring_sets(category, points, input.distances);
        for (class, rings) in [(DistanceClass::Near, near), (DistanceClass::Far, far)] {
            let miles = match class {
                DistanceClass::Near => input.distances.near(),
                DistanceClass::Far => input.distances.far(),
            };
            out.push(
                format!("{} - Coverage {miles} Mile", category.group_name()),
                LayerContent::Rings { rings },
                ring_style(category, class),
                false,
                true,
            );
        }
    }

    let operators = input
        .overlays
        .iter()
        .filter(|overlay| overlay.kind == OverlayKind::Operator);
    let fixed = input
        .overlays
        .iter()
        .filter(|overlay| overlay.kind != OverlayKind::Operator);
    for overlay in operators.chain(fixed) {
        out.push(
            overlay.layer_name(),
            areas(overlay.features.iter().map(|p| AreaFeature::plain(p.geometry.clone()))),
            overlay.style(),
            false,
            true,
        );
    }

    debug!(
        "Composed {} layers ({} visible)",
        out.layers.len(),
        out.layers.iter().filter(|layer| layer.default_visible).count()
    );
    out.layers
}

/// Centre for the initial view: the centroid of all boundary polygons.
///
/// Returns `None` when the boundary has no area or no polygons.
#[must_use]
pub fn view_center(boundary: &[GeoPolygon]) -> Option<Point<f64>> {
    let merged: MultiPolygon<f64> = boundary
        .iter()
        .flat_map(|polygon| polygon.geometry.0.iter().cloned())
        .collect();
    merged.centroid()
}

fn areas(features: impl IntoIterator<Item = AreaFeature>) -> LayerContent {
    LayerContent::Areas {
        features: features.into_iter().collect(),
    }
}

fn circles(points: &[GeoPoint]) -> LayerContent {
    LayerContent::Points {
        marker: MarkerKind::Circle,
        features: points
            .iter()
            .map(|point| PointFeature {
                location: point.location,
                popup: None,
            })
            .collect(),
    }
}

fn eligibility_style(stroke: &str) -> LayerStyle {
    LayerStyle::circle_marker(
        Color::named(ELIGIBILITY_FILL),
        Color::named(stroke),
        ELIGIBILITY_RADIUS,
    )
}

fn subdivision_feature(polygon: &GeoPolygon, licences: Option<&JoinReport>) -> AreaFeature {
    let name = polygon.name.as_deref().unwrap_or(UNNAMED_SUBDIVISION);
    let records = licences.map_or(&[][..], |report| report.records_for(name));
    AreaFeature {
        geometry: polygon.geometry.clone(),
        label: polygon.geometry.centroid().map(|at| Label {
            text: name.to_owned(),
            at,
        }),
        popup: Some(licence_popup(records)),
    }
}

fn ring_sets(
    category: Category,
    points: &[GeoPoint],
    distances: CoverageDistances,
) -> (Vec<CoverageRing>, Vec<CoverageRing>) {
    points
        .iter()
        .filter_map(|point| coverage_rings(point, category, distances))
        .map(|[near, far]| (near, far))
        .unzip()
}

fn ring_style(category: Category, class: DistanceClass) -> LayerStyle {
    match class {
        DistanceClass::Near => LayerStyle::solid(category.color(), 2.0, 0.2),
        DistanceClass::Far => LayerStyle::solid(category.color(), 2.0, 0.1).dashed("10,5"),
    }
}
