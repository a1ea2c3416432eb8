//! JSON payload consumed by the page script.
//!
//! Coordinates are flipped to Leaflet's `[lat, lng]` order here so the
//! script can hand them straight to the Leaflet constructors.

use beadmap_core::{
    AreaFeature, CoverageRing, LayerContent, LayerSpec, LayerStyle, MarkerKind, PointFeature,
};
use geo::{LineString, MultiPolygon, Point};
use serde::Serialize;

use crate::html::{escape_html, popup_html};

type LatLng = [f64; 2];

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum PayloadKind {
    Areas,
    Circles,
    Pins,
    Rings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StylePayload<'a> {
    color: &'a str,
    weight: f64,
    fill: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    fill_color: Option<&'a str>,
    fill_opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    dash_array: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    radius: Option<f64>,
}

impl<'a> From<&'a LayerStyle> for StylePayload<'a> {
    fn from(style: &'a LayerStyle) -> Self {
        Self {
            color: style.stroke.as_str(),
            weight: style.weight,
            fill: style.fill.is_some(),
            fill_color: style.fill.as_ref().map(|fill| fill.as_str()),
            fill_opacity: style.fill_opacity,
            dash_array: style.dash_array.as_deref(),
            radius: style.marker_radius,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LabelPayload {
    at: LatLng,
    html: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum ItemPayload {
    Area {
        coordinates: Vec<Vec<Vec<LatLng>>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<LabelPayload>,
        #[serde(skip_serializing_if = "Option::is_none")]
        popup: Option<String>,
    },
    Point {
        at: LatLng,
        #[serde(skip_serializing_if = "Option::is_none")]
        popup: Option<String>,
    },
    Ring {
        at: LatLng,
        radius: f64,
    },
}

#[derive(Debug, Serialize)]
pub(crate) struct LayerPayload<'a> {
    name: &'a str,
    visible: bool,
    /// Layer-control entry. The control inserts it as markup.
    label: String,
    kind: PayloadKind,
    style: StylePayload<'a>,
    items: Vec<ItemPayload>,
}

impl<'a> From<&'a LayerSpec> for LayerPayload<'a> {
    fn from(layer: &'a LayerSpec) -> Self {
        let (kind, items) = match &layer.content {
            LayerContent::Areas { features } => {
                (PayloadKind::Areas, features.iter().map(area).collect())
            }
            LayerContent::Points { marker, features } => {
                let kind = match marker {
                    MarkerKind::Circle => PayloadKind::Circles,
                    MarkerKind::Pin => PayloadKind::Pins,
                };
                (kind, features.iter().map(point).collect())
            }
            LayerContent::Rings { rings } => (PayloadKind::Rings, rings.iter().map(ring).collect()),
        };
        Self {
            name: &layer.name,
            visible: layer.default_visible,
            label: escape_html(&layer.name),
            kind,
            style: StylePayload::from(&layer.style),
            items,
        }
    }
}

fn lat_lng(point: Point<f64>) -> LatLng {
    [point.y(), point.x()]
}

fn line(ring: &LineString<f64>) -> Vec<LatLng> {
    ring.points().map(lat_lng).collect()
}

fn polygons(geometry: &MultiPolygon<f64>) -> Vec<Vec<Vec<LatLng>>> {
    geometry
        .iter()
        .map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .map(line)
                .collect()
        })
        .collect()
}

fn area(feature: &AreaFeature) -> ItemPayload {
    ItemPayload::Area {
        coordinates: polygons(&feature.geometry),
        label: feature.label.as_ref().map(|label| LabelPayload {
            at: lat_lng(label.at),
            html: escape_html(&label.text),
        }),
        popup: feature.popup.as_ref().map(popup_html),
    }
}

fn point(feature: &PointFeature) -> ItemPayload {
    ItemPayload::Point {
        at: lat_lng(feature.location),
        popup: feature.popup.as_ref().map(popup_html),
    }
}

fn ring(ring: &CoverageRing) -> ItemPayload {
    ItemPayload::Ring {
        at: lat_lng(ring.center),
        radius: ring.radius_meters,
    }
}

/// Serialise layers for embedding inside a `<script>` element.
///
/// `</` is escaped so no string in the payload can close the element.
pub(crate) fn layers_json(layers: &[LayerSpec]) -> Result<String, serde_json::Error> {
    let payload: Vec<LayerPayload<'_>> = layers.iter().map(LayerPayload::from).collect();
    let json = serde_json::to_string(&payload)?;
    Ok(json.replace("</", "<\\/"))
}
