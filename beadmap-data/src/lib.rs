//! Data access and normalisation for beadmap.
//!
//! Responsibilities:
//! - Read GeoJSON, SQLite, spreadsheet and CSV region inputs into `beadmap-core` types.
//! - Reproject legacy Web Mercator sources into WGS84 on the way in.
//! - Locate a region's inputs by naming convention.
//!
//! Boundaries:
//! - Do not encode layer or styling rules (live in `beadmap-core`).
//! - Report optional inputs as [`Dataset::Absent`] rather than as errors.
//!
//! Invariants:
//! - Every geometry returned by a loader is in EPSG:4326.
//! - No global mutable state.

pub mod abbreviation;
pub mod bundle;
pub mod dataset;
pub mod error;
pub mod geojson;
pub mod load;
pub mod reproject;
pub mod sqlite;
pub mod tabular;

pub use abbreviation::region_abbreviation;
pub use bundle::{BundleInventory, RegionBundle, discover_regions};
pub use dataset::{AbsenceReason, DataSource, Dataset, Requirement};
pub use error::LoadError;
pub use load::{load_density_cells, load_infrastructure, load_points, load_polygons, load_tabular};
pub use reproject::SourceCrs;
pub use tabular::{TableFormat, filter_by_state};
