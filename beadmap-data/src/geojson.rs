//! Minimal GeoJSON `FeatureCollection` reader.
//!
//! Only the parts the bundles use are modelled: `Point`, `MultiPoint`,
//! `Polygon` and `MultiPolygon` geometries, flat properties and the legacy
//! named `crs` member. Coordinates are reprojected to WGS84 while parsing.

use beadmap_core::Attributes;
use camino::Utf8Path;
use geo::{Coord, Geometry, LineString, MultiPoint, MultiPolygon, Point, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{LoadError, SourceCrs};

#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    crs: Option<RawCrs>,
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawCrs {
    #[serde(default)]
    properties: Option<RawCrsProperties>,
}

#[derive(Debug, Deserialize)]
struct RawCrsProperties {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

/// One feature with its geometry already in WGS84.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFeature {
    /// Geometry, or `None` for features with a null geometry.
    pub geometry: Option<Geometry<f64>>,
    /// Properties rendered as strings; nulls are dropped.
    pub attributes: Attributes,
}

/// Parse a GeoJSON document read from `path`.
///
/// # Errors
/// Returns [`LoadError::Parse`] for malformed documents,
/// [`LoadError::UnsupportedCrs`] for unknown coordinate references and
/// [`LoadError::UnsupportedGeometry`] for geometry types outside the four
/// supported ones.
pub fn parse_feature_collection(
    text: &str,
    path: &Utf8Path,
) -> Result<Vec<SourceFeature>, LoadError> {
    let parse_error = |message: String| LoadError::Parse {
        path: path.to_owned(),
        message,
    };
    let raw: RawCollection =
        serde_json::from_str(text).map_err(|err| parse_error(err.to_string()))?;
    if raw.kind != "FeatureCollection" {
        return Err(parse_error(format!(
            "expected a FeatureCollection, found '{}'",
            raw.kind
        )));
    }

    let crs_name = raw
        .crs
        .and_then(|crs| crs.properties)
        .and_then(|properties| properties.name);
    let crs = match crs_name {
        None => SourceCrs::Wgs84,
        Some(name) => SourceCrs::from_name(&name).ok_or_else(|| LoadError::UnsupportedCrs {
            path: path.to_owned(),
            crs: name.clone(),
        })?,
    };

    raw.features
        .into_iter()
        .map(|feature| {
            let geometry = feature
                .geometry
                .map(|geometry| convert_geometry(geometry, path))
                .transpose()?
                .map(|geometry| crs.reproject(&geometry));
            Ok(SourceFeature {
                geometry,
                attributes: stringify(feature.properties.unwrap_or_default()),
            })
        })
        .collect()
}

fn stringify(properties: Map<String, Value>) -> Attributes {
    properties
        .into_iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(text) => text,
                Value::Bool(flag) => flag.to_string(),
                Value::Number(number) => number.to_string(),
                other @ (Value::Array(_) | Value::Object(_)) => other.to_string(),
            };
            Some((key, text))
        })
        .collect()
}

fn convert_geometry(raw: RawGeometry, path: &Utf8Path) -> Result<Geometry<f64>, LoadError> {
    let shape_error = |kind: &str| LoadError::Parse {
        path: path.to_owned(),
        message: format!("malformed {kind} coordinates"),
    };
    let kind = raw.kind.as_str();
    match kind {
        "Point" => {
            let position: Vec<f64> =
                serde_json::from_value(raw.coordinates).map_err(|_| shape_error(kind))?;
            coord(&position)
                .map(|c| Geometry::Point(Point(c)))
                .ok_or_else(|| shape_error(kind))
        }
        "MultiPoint" => {
            let positions: Vec<Vec<f64>> =
                serde_json::from_value(raw.coordinates).map_err(|_| shape_error(kind))?;
            positions
                .iter()
                .map(|position| coord(position).map(Point))
                .collect::<Option<Vec<_>>>()
                .map(|points| Geometry::MultiPoint(MultiPoint(points)))
                .ok_or_else(|| shape_error(kind))
        }
        "Polygon" => {
            let rings: Vec<Vec<Vec<f64>>> =
                serde_json::from_value(raw.coordinates).map_err(|_| shape_error(kind))?;
            polygon(&rings)
                .map(Geometry::Polygon)
                .ok_or_else(|| shape_error(kind))
        }
        "MultiPolygon" => {
            let polygons: Vec<Vec<Vec<Vec<f64>>>> =
                serde_json::from_value(raw.coordinates).map_err(|_| shape_error(kind))?;
            polygons
                .iter()
                .map(|rings| polygon(rings))
                .collect::<Option<Vec<_>>>()
                .map(|members| Geometry::MultiPolygon(MultiPolygon(members)))
                .ok_or_else(|| shape_error(kind))
        }
        other => Err(LoadError::UnsupportedGeometry {
            path: path.to_owned(),
            kind: other.to_owned(),
        }),
    }
}

fn coord(position: &[f64]) -> Option<Coord<f64>> {
    match position {
        [x, y, ..] if x.is_finite() && y.is_finite() => Some(Coord { x: *x, y: *y }),
        _ => None,
    }
}

fn ring(positions: &[Vec<f64>]) -> Option<LineString<f64>> {
    positions
        .iter()
        .map(|position| coord(position))
        .collect::<Option<Vec<_>>>()
        .map(LineString)
}

fn polygon(rings: &[Vec<Vec<f64>>]) -> Option<Polygon<f64>> {
    let (exterior, holes) = rings.split_first()?;
    let interiors = holes
        .iter()
        .map(|positions| ring(positions))
        .collect::<Option<Vec<_>>>()?;
    Some(Polygon::new(ring(exterior)?, interiors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const PATH: &str = "fixture.geojson";

    fn parse(text: &str) -> Result<Vec<SourceFeature>, LoadError> {
        parse_feature_collection(text, Utf8Path::new(PATH))
    }

    #[rstest]
    fn stringifies_properties_and_drops_nulls() {
        let features = parse(
            r#"{"type":"FeatureCollection","features":[{"type":"Feature",
                "geometry":{"type":"Point","coordinates":[-75.5,39.1,12.0]},
                "properties":{"name":"Kent","point_count":12,"flag":true,"gone":null}}]}"#,
        )
        .expect("parse");
        let feature = features.first().expect("one feature");
        assert_eq!(
            feature.geometry,
            Some(Geometry::Point(Point::new(-75.5, 39.1)))
        );
        assert_eq!(feature.attributes.get("point_count").map(String::as_str), Some("12"));
        assert_eq!(feature.attributes.get("flag").map(String::as_str), Some("true"));
        assert!(!feature.attributes.contains_key("gone"));
    }

    #[rstest]
    fn reads_polygons_with_holes() {
        let features = parse(
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},
                "geometry":{"type":"Polygon","coordinates":[
                    [[0,0],[4,0],[4,4],[0,4],[0,0]],
                    [[1,1],[2,1],[2,2],[1,1]]]}}]}"#,
        )
        .expect("parse");
        let Some(Some(Geometry::Polygon(polygon))) = features.first().map(|f| f.geometry.clone())
        else {
            panic!("expected a polygon");
        };
        assert_eq!(polygon.interiors().len(), 1);
    }

    #[rstest]
    fn null_geometry_is_kept_as_none() {
        let features = parse(
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":null,"properties":null}]}"#,
        )
        .expect("parse");
        assert_eq!(features.first().map(|f| f.geometry.is_none()), Some(true));
    }

    #[rstest]
    #[case(r#"{"type":"Feature"}"#)]
    #[case("not json")]
    #[case(r#"{"type":"FeatureCollection","features":[{"geometry":{"type":"Point","coordinates":[1]}}]}"#)]
    fn rejects_malformed_documents(#[case] text: &str) {
        assert!(matches!(parse(text), Err(LoadError::Parse { .. })));
    }

    #[rstest]
    fn rejects_line_strings() {
        let err = parse(
            r#"{"type":"FeatureCollection","features":[{"geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]}}]}"#,
        )
        .expect_err("line strings are unsupported");
        assert!(matches!(err, LoadError::UnsupportedGeometry { kind, .. } if kind == "LineString"));
    }

    #[rstest]
    #[expect(
        clippy::float_arithmetic,
        reason = "reprojected coordinates are compared within a tolerance"
    )]
    fn reprojects_web_mercator() {
        let features = parse(
            r#"{"type":"FeatureCollection",
                "crs":{"type":"name","properties":{"name":"urn:ogc:def:crs:EPSG::3857"}},
                "features":[{"geometry":{"type":"Point","coordinates":[-8399723.49729725,4721671.572580107]}}]}"#,
        )
        .expect("parse");
        let Some(Some(Geometry::Point(point))) = features.first().map(|f| f.geometry.clone())
        else {
            panic!("expected a point");
        };
        assert!((point.x() + 75.456).abs() < 1e-6);
        assert!((point.y() - 39.0).abs() < 1e-6);
    }

    #[rstest]
    fn rejects_unknown_crs() {
        let err = parse(
            r#"{"type":"FeatureCollection","crs":{"type":"name","properties":{"name":"EPSG:27700"}},"features":[]}"#,
        )
        .expect_err("british national grid is unsupported");
        assert!(matches!(err, LoadError::UnsupportedCrs { crs, .. } if crs == "EPSG:27700"));
    }
}
