//! Core domain types and algorithms for beadmap.
//!
//! This crate holds the pure part of the map generator: ownership
//! classification, region lookup and joins, density bucketing, coverage
//! rings and the composition of all of them into an ordered layer list.
//! Nothing here touches the filesystem; the loader in `beadmap-data` hands
//! these functions normalised WGS84 features.

pub mod classify;
pub mod compose;
pub mod coverage;
pub mod density;
pub mod feature;
pub mod layer;
pub mod palette;
pub mod popup;
pub mod region;
pub mod style;

pub use classify::{
    Category, CategoryGroups, OWNER_ATTRIBUTE, classify, group_by_category, structure_type_label,
};
pub use compose::{
    CompositionInput, DatasetAvailability, Overlay, OverlayKind, compose, view_center,
};
pub use coverage::{
    CoverageDistances, CoverageDistancesError, CoverageRing, DistanceClass, RingRadii,
    coverage_rings, degrees_per_mile, radius_meters, ring_radii_meters,
};
pub use density::{
    BUCKETS, DensityBucket, DensityCell, DensityLayer, DensitySummary, aggregate, bucket_assign,
    dissolve,
};
pub use feature::{Attributes, GeoPoint, GeoPolygon, TabularRecord};
pub use layer::{AreaFeature, Label, LayerContent, LayerSpec, MarkerKind, PointFeature};
pub use palette::overlay_color;
pub use popup::{Popup, infrastructure_popup, licence_popup};
pub use region::{
    JoinReport, KeyPolicy, RegionEntry, RegionIndex, RegionKey, UnknownKeyPolicy, join,
};
pub use style::{Color, LayerStyle};
