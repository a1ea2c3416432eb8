//! Turn composed layer lists into viewable map documents.
//!
//! The composer in `beadmap-core` decides what is drawn and how it is
//! styled. A [`Renderer`] only translates that description into an output
//! format; [`LeafletRenderer`] produces a single self-contained HTML page.

#![forbid(unsafe_code)]

use beadmap_core::LayerSpec;
use geo::Point;
use thiserror::Error;

mod html;
mod leaflet;
mod payload;

pub use html::{escape_html, popup_html};
pub use leaflet::{BASE_LAYERS, BaseLayer, LeafletRenderer};

/// Zoom level the map opens at.
pub const DEFAULT_ZOOM: u8 = 7;

/// Everything a renderer needs to draw one region.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDocument {
    /// Page title.
    pub title: String,
    /// Initial view centre in WGS84.
    pub center: Point<f64>,
    /// Initial zoom level.
    pub zoom: u8,
    /// Layers in drawing order.
    pub layers: Vec<LayerSpec>,
}

impl MapDocument {
    /// A document opening at [`DEFAULT_ZOOM`].
    #[must_use]
    pub fn new(title: impl Into<String>, center: Point<f64>, layers: Vec<LayerSpec>) -> Self {
        Self {
            title: title.into(),
            center,
            zoom: DEFAULT_ZOOM,
            layers,
        }
    }
}

/// Errors raised while rendering a document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The view centre is not a finite coordinate.
    #[error("map centre ({x}, {y}) is not a finite coordinate")]
    InvalidCenter {
        /// Longitude.
        x: f64,
        /// Latitude.
        y: f64,
    },
    /// The layer payload could not be serialised.
    #[error("failed to serialise layer payload: {source}")]
    Payload {
        /// Underlying serialisation failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Produce an output document from a [`MapDocument`].
///
/// Renderers must be `Send + Sync` so one instance can serve a whole batch.
pub trait Renderer: Send + Sync {
    /// Render `document`, returning the bytes to write.
    ///
    /// # Errors
    /// Returns [`RenderError`] when the document cannot be encoded.
    fn render(&self, document: &MapDocument) -> Result<String, RenderError>;
}
