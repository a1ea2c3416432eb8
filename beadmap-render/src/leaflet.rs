//! Self-contained Leaflet page renderer.
//!
//! The page loads Leaflet 1.9.4 and Leaflet.markercluster from public CDNs
//! and embeds every layer as JSON, so the written file needs no companion
//! assets.

use log::debug;
use serde::Serialize;

use crate::html::escape_html;
use crate::payload::layers_json;
use crate::{MapDocument, RenderError, Renderer};

/// A tile layer offered in the base-layer switcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BaseLayer {
    /// Name shown in the layer control.
    pub name: &'static str,
    /// Tile URL template; empty for a blank background.
    pub url: &'static str,
    /// Attribution text.
    pub attribution: &'static str,
}

/// Base layers, the first of which is shown on load.
pub const BASE_LAYERS: [BaseLayer; 3] = [
    BaseLayer {
        name: "White Background",
        url: "",
        attribution: "",
    },
    BaseLayer {
        name: "Google Maps",
        url: "http://www.google.cn/maps/vt?lyrs=m&x={x}&y={y}&z={z}",
        attribution: "Google",
    },
    BaseLayer {
        name: "Google Satellite",
        url: "http://www.google.cn/maps/vt?lyrs=s&x={x}&y={y}&z={z}",
        attribution: "Google",
    },
];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewConfig<'a> {
    center: [f64; 2],
    zoom: u8,
    base_layers: &'a [BaseLayer],
}

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>"#;

const STYLES_AND_BODY: &str = r#"</title>
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css" crossorigin="anonymous" referrerpolicy="no-referrer" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js" crossorigin="anonymous" referrerpolicy="no-referrer"></script>
  <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.4.1/dist/MarkerCluster.css" />
  <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.4.1/dist/MarkerCluster.Default.css" />
  <script src="https://unpkg.com/leaflet.markercluster@1.4.1/dist/leaflet.markercluster.js"></script>
  <style>
    html, body, #map { height: 100%; margin: 0; }
    .leaflet-container { background: white; }
    .beadmap-label { font-size: 11px; font-weight: 600; white-space: nowrap; cursor: pointer; }
    .beadmap-pin span { display: block; width: 12px; height: 12px; border-radius: 50% 50% 50% 0; border: 1px solid #333; transform: rotate(-45deg); }
    .beadmap-popup table { border-collapse: collapse; font-size: 12px; }
    .beadmap-popup th, .beadmap-popup td { border: 1px solid #ccc; padding: 2px 6px; text-align: left; }
  </style>
</head>
<body>
  <div id="map"></div>
  <script>
"#;

const SCRIPT: &str = r#"
    const map = L.map('map', { center: VIEW.center, zoom: VIEW.zoom });
    const baseLayers = {};
    VIEW.baseLayers.forEach((base, index) => {
      const tiles = L.tileLayer(base.url, { attribution: base.attribution, maxZoom: 20 });
      baseLayers[base.name] = tiles;
      if (index === 0) tiles.addTo(map);
    });

    function withPopup(layer, html) {
      if (html) layer.bindPopup(html, { maxWidth: 420 });
      return layer;
    }

    function buildLayer(spec) {
      const group = spec.kind === 'circles'
        ? L.markerClusterGroup({ disableClusteringAtZoom: 12, chunkedLoading: true })
        : L.featureGroup();
      spec.items.forEach((item) => {
        switch (spec.kind) {
          case 'areas': {
            const shape = L.polygon(item.coordinates, spec.style);
            group.addLayer(item.label ? shape : withPopup(shape, item.popup));
            if (item.label) {
              const icon = L.divIcon({ className: 'beadmap-label', html: item.label.html, iconSize: null });
              group.addLayer(withPopup(L.marker(item.label.at, { icon }), item.popup));
            }
            break;
          }
          case 'circles':
            group.addLayer(withPopup(L.circleMarker(item.at, spec.style), item.popup));
            break;
          case 'pins': {
            const icon = L.divIcon({
              className: 'beadmap-pin',
              html: '<span style="background:' + spec.style.color + '"></span>',
              iconSize: [14, 14],
              iconAnchor: [7, 14],
            });
            group.addLayer(withPopup(L.marker(item.at, { icon }), item.popup));
            break;
          }
          case 'rings':
            group.addLayer(L.circle(item.at, Object.assign({}, spec.style, { radius: item.radius })));
            break;
        }
      });
      return group;
    }

    const overlays = {};
    LAYERS.forEach((spec) => {
      const group = buildLayer(spec);
      overlays[spec.label] = group;
      if (spec.visible) group.addTo(map);
    });
    L.control.layers(baseLayers, overlays, { collapsed: true }).addTo(map);
  </script>
</body>
</html>
"#;

/// Renders a [`MapDocument`] as one HTML page.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeafletRenderer;

impl LeafletRenderer {
    /// Construct the renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Renderer for LeafletRenderer {
    fn render(&self, document: &MapDocument) -> Result<String, RenderError> {
        let (x, y) = document.center.x_y();
        if !(x.is_finite() && y.is_finite()) {
            return Err(RenderError::InvalidCenter { x, y });
        }
        let view = ViewConfig {
            center: [y, x],
            zoom: document.zoom,
            base_layers: &BASE_LAYERS,
        };
        let payload_error = |source| RenderError::Payload { source };
        let view_json = serde_json::to_string(&view)
            .map_err(payload_error)?
            .replace("</", "<\\/");
        let layers = layers_json(&document.layers).map_err(payload_error)?;

        let mut page = String::with_capacity(
            HEAD.len() + STYLES_AND_BODY.len() + SCRIPT.len() + view_json.len() + layers.len() + 64,
        );
        page.push_str(HEAD);
        page.push_str(&escape_html(&document.title));
        page.push_str(STYLES_AND_BODY);
        page.push_str("    const VIEW = ");
        page.push_str(&view_json);
        page.push_str(";\n    const LAYERS = ");
        page.push_str(&layers);
        page.push(';');
        page.push_str(SCRIPT);
        debug!(
            "Rendered {} layers into {} bytes for '{}'",
            document.layers.len(),
            page.len(),
            document.title
        );
        Ok(page)
    }
}
