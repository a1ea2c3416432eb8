//! Facade crate for the beadmap generator.
//!
//! This crate re-exports the domain types, the dataset loader and the map
//! renderer so embedders can drive a region run without depending on each
//! member crate.
//!
//! ```
//! use beadmap::{Category, classify};
//!
//! assert_eq!(classify(Some("SBA Communications")), Category::Sba);
//! ```

#![forbid(unsafe_code)]

pub use beadmap_core::{
    Category, CompositionInput, CoverageDistances, DatasetAvailability, DensitySummary, GeoPoint,
    GeoPolygon, JoinReport, KeyPolicy, LayerSpec, Overlay, RegionIndex, TabularRecord, aggregate,
    classify, compose, group_by_category, join, view_center,
};
pub use beadmap_data::{
    DataSource, Dataset, LoadError, RegionBundle, Requirement, discover_regions,
};
pub use beadmap_render::{LeafletRenderer, MapDocument, RenderError, Renderer};
