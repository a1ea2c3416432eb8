//! End-to-end checks of the Leaflet page renderer.
#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when rendering breaks"
)]

use beadmap_core::{
    AreaFeature, Color, LayerContent, LayerSpec, LayerStyle, MarkerKind, PointFeature, Popup,
};
use beadmap_render::{BASE_LAYERS, LeafletRenderer, MapDocument, RenderError, Renderer};
use geo::{MultiPolygon, Point, polygon};
use rstest::{fixture, rstest};

#[fixture]
fn document() -> MapDocument {
    let outline = LayerSpec {
        name: "State Outline".to_owned(),
        content: LayerContent::Areas {
            features: vec![AreaFeature::plain(MultiPolygon(vec![polygon![
                (x: -75.8, y: 38.4),
                (x: -75.0, y: 38.4),
                (x: -75.0, y: 39.8),
            ]]))],
        },
        style: LayerStyle::outline(Color::named("red"), 2.0),
        default_visible: true,
        optional: false,
    };
    let towers = LayerSpec {
        name: "Antenna Locations - Other".to_owned(),
        content: LayerContent::Points {
            marker: MarkerKind::Pin,
            features: vec![PointFeature {
                location: Point::new(-75.5, 39.1),
                popup: Some(Popup {
                    title: "FCC Tower Information".to_owned(),
                    columns: Vec::new(),
                    rows: vec![vec!["Owner".to_owned(), "<Unknown>".to_owned()]],
                }),
            }],
        },
        style: LayerStyle::solid(Color::named("blue"), 1.0, 1.0),
        default_visible: false,
        optional: true,
    };
    MapDocument::new(
        "Delaware BEAD Map with FCC Towers",
        Point::new(-75.4, 39.0),
        vec![outline, towers],
    )
}

#[rstest]
fn page_is_self_contained(document: MapDocument) {
    let page = LeafletRenderer::new().render(&document).expect("render");
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<title>Delaware BEAD Map with FCC Towers</title>"));
    assert!(page.contains("leaflet/1.9.4/leaflet.js"));
    assert!(page.contains(".leaflet-container { background: white; }"));
    assert!(page.contains("\"center\":[39.0,-75.4]"));
    assert!(page.contains("\"zoom\":7"));
    for base in BASE_LAYERS {
        assert!(page.contains(&format!("\"name\":\"{}\"", base.name)));
    }
    assert!(page.contains("L.control.layers"));
}

#[rstest]
fn layers_keep_order_and_visibility(document: MapDocument) {
    let page = LeafletRenderer::new().render(&document).expect("render");
    let outline = page.find("\"name\":\"State Outline\"").expect("outline layer");
    let towers = page
        .find("\"name\":\"Antenna Locations - Other\"")
        .expect("tower layer");
    assert!(outline < towers);
    assert!(page.contains("\"name\":\"State Outline\",\"visible\":true"));
    assert!(page.contains("\"name\":\"Antenna Locations - Other\",\"visible\":false"));
}

#[rstest]
fn popup_values_are_escaped(document: MapDocument) {
    let page = LeafletRenderer::new().render(&document).expect("render");
    assert!(page.contains("&lt;Unknown&gt;"));
    assert!(!page.contains("<Unknown>"));
}

#[rstest]
fn rendering_is_deterministic(document: MapDocument) {
    let renderer = LeafletRenderer::new();
    let first = renderer.render(&document).expect("first render");
    let second = renderer.render(&document).expect("second render");
    assert_eq!(first, second);
}

#[rstest]
fn non_finite_centre_is_rejected(mut document: MapDocument) {
    document.center = Point::new(f64::NAN, 39.0);
    let err = LeafletRenderer::new()
        .render(&document)
        .expect_err("nan centre");
    assert!(matches!(err, RenderError::InvalidCenter { .. }));
}

#[rstest]
fn layer_control_names_are_inserted_as_text() {
    let overlay = LayerSpec {
        name: "WISP - <b>Acme</b> & Sons".to_owned(),
        content: LayerContent::Areas {
            features: vec![AreaFeature::plain(MultiPolygon(vec![polygon![
                (x: -75.6, y: 39.0),
                (x: -75.5, y: 39.0),
                (x: -75.5, y: 39.1),
            ]]))],
        },
        style: LayerStyle::outline(Color::named("#4ECDC4"), 1.0),
        default_visible: false,
        optional: true,
    };
    let document = MapDocument::new("Maine", Point::new(-69.0, 45.0), vec![overlay]);
    let page = LeafletRenderer::new().render(&document).expect("render");
    assert!(page.contains("\"label\":\"WISP - &lt;b&gt;Acme&lt;/b&gt; &amp; Sons\""));
    assert!(page.contains("overlays[spec.label] = group;"));
    assert!(!page.contains("overlays[spec.name]"));
}
