//! Layer descriptions handed to renderers.

use geo::{MultiPolygon, Point};
use serde::Serialize;

use crate::{CoverageRing, LayerStyle, Popup};

/// A text label anchored at a point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    /// Label text.
    pub text: String,
    /// Anchor position.
    pub at: Point<f64>,
}

/// A polygon with optional label and popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaFeature {
    /// Geometry in WGS84.
    pub geometry: MultiPolygon<f64>,
    /// Label drawn at the polygon's centroid.
    pub label: Option<Label>,
    /// Popup opened from the label or the area.
    pub popup: Option<Popup>,
}

impl AreaFeature {
    /// An unlabelled area.
    #[must_use]
    pub const fn plain(geometry: MultiPolygon<f64>) -> Self {
        Self {
            geometry,
            label: None,
            popup: None,
        }
    }
}

/// A point with an optional popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointFeature {
    /// Position in WGS84.
    pub location: Point<f64>,
    /// Popup opened from the marker.
    pub popup: Option<Popup>,
}

/// How the points of a layer are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerKind {
    /// Small filled circles, clustered at low zoom.
    Circle,
    /// Pin icons.
    Pin,
}

/// What a layer draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerContent {
    /// Filled or outlined polygons.
    Areas {
        /// Features in source order.
        features: Vec<AreaFeature>,
    },
    /// Point markers.
    Points {
        /// Marker appearance.
        marker: MarkerKind,
        /// Features in source order.
        features: Vec<PointFeature>,
    },
    /// Coverage circles.
    Rings {
        /// Rings in source order.
        rings: Vec<CoverageRing>,
    },
}

impl LayerContent {
    /// Number of drawable items.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::Areas { features } => features.len(),
            Self::Points { features, .. } => features.len(),
            Self::Rings { rings } => rings.len(),
        }
    }

    /// Whether the layer draws nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One named, styled layer in a composition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSpec {
    /// Display name, unique within a composition.
    pub name: String,
    /// Drawn content.
    pub content: LayerContent,
    /// Stroke and fill.
    pub style: LayerStyle,
    /// Whether the layer is switched on when the map opens.
    pub default_visible: bool,
    /// Whether the layer depends on an optional dataset.
    pub optional: bool,
}
