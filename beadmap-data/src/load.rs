//! Dataset loaders.
//!
//! Each loader reads one source into normalised WGS84 features and applies
//! the source's [`Requirement`]:
//!
//! - a missing required source fails with
//!   [`LoadError::MissingRequiredDataset`];
//! - a missing optional source yields [`Dataset::Absent`] with
//!   [`AbsenceReason::NotFound`];
//! - an optional source that exists but cannot be read yields
//!   [`AbsenceReason::Unreadable`] and a warning, while a required one
//!   propagates the error.

use beadmap_core::{Attributes, DensityCell, GeoPoint, GeoPolygon, TabularRecord};
use camino::Utf8Path;
use geo::{Geometry, MultiPolygon};
use log::{info, warn};

use crate::geojson::{SourceFeature, parse_feature_collection};
use crate::sqlite::read_infrastructure;
use crate::tabular::read_records;
use crate::{AbsenceReason, DataSource, Dataset, LoadError, Requirement};

/// Property names checked, in order, for a polygon's display name.
pub const NAME_PROPERTIES: [&str; 3] = ["name", "NAME", "Name"];
/// Property holding the location count of a density cell.
pub const POINT_COUNT_PROPERTY: &str = "point_count";

/// Load point features from a GeoJSON source.
///
/// `MultiPoint` features contribute one point per member, each carrying the
/// feature's attributes. Features with a null geometry are skipped.
///
/// # Errors
/// See the module documentation.
pub fn load_points(
    source: &DataSource,
    requirement: Requirement,
) -> Result<Dataset<GeoPoint>, LoadError> {
    load_with(source, requirement, |path| {
        let features = read_geojson(path)?;
        let mut points = Vec::with_capacity(features.len());
        let mut skipped = 0_usize;
        for feature in features {
            match feature.geometry {
                Some(Geometry::Point(point)) => {
                    points.push(GeoPoint::new(point, feature.attributes));
                }
                Some(Geometry::MultiPoint(members)) => points.extend(
                    members
                        .into_iter()
                        .map(|point| GeoPoint::new(point, feature.attributes.clone())),
                ),
                Some(other) => return Err(unsupported(path, &other)),
                None => skipped += 1,
            }
        }
        log_skipped(&source.dataset, skipped, "without geometry");
        Ok(points)
    })
}

/// Load polygon features from a GeoJSON source.
///
/// Names are taken from the first non-blank of [`NAME_PROPERTIES`].
///
/// # Errors
/// See the module documentation.
pub fn load_polygons(
    source: &DataSource,
    requirement: Requirement,
) -> Result<Dataset<GeoPolygon>, LoadError> {
    load_with(source, requirement, |path| {
        let features = read_geojson(path)?;
        let (polygons, skipped) = polygons_from(path, features)?;
        log_skipped(&source.dataset, skipped, "without geometry");
        Ok(polygons)
    })
}

/// Load density grid cells from a GeoJSON source.
///
/// Cells whose [`POINT_COUNT_PROPERTY`] is missing or not an integer are
/// skipped and counted.
///
/// # Errors
/// See the module documentation.
pub fn load_density_cells(
    source: &DataSource,
    requirement: Requirement,
) -> Result<Dataset<DensityCell>, LoadError> {
    load_with(source, requirement, |path| {
        let features = read_geojson(path)?;
        let (polygons, mut skipped) = polygons_from(path, features)?;
        let mut cells = Vec::with_capacity(polygons.len());
        for polygon in polygons {
            match polygon.attribute(POINT_COUNT_PROPERTY).and_then(parse_count) {
                Some(count) => cells.push(DensityCell::new(polygon.geometry, count)),
                None => skipped += 1,
            }
        }
        log_skipped(&source.dataset, skipped, "without a usable point count");
        Ok(cells)
    })
}

/// Load infrastructure points from the SQLite extract.
///
/// # Errors
/// See the module documentation.
pub fn load_infrastructure(
    source: &DataSource,
    requirement: Requirement,
) -> Result<Dataset<GeoPoint>, LoadError> {
    load_with(source, requirement, |path| {
        let rows = read_infrastructure(path)?;
        log_skipped(&source.dataset, rows.skipped, "with invalid coordinates");
        Ok(rows.points)
    })
}

/// Load a licence table from an Excel workbook or a CSV file.
///
/// # Errors
/// See the module documentation.
pub fn load_tabular(
    source: &DataSource,
    requirement: Requirement,
) -> Result<Dataset<TabularRecord>, LoadError> {
    load_with(source, requirement, read_records)
}

fn load_with<T>(
    source: &DataSource,
    requirement: Requirement,
    read: impl FnOnce(&Utf8Path) -> Result<Vec<T>, LoadError>,
) -> Result<Dataset<T>, LoadError> {
    let path = source.path();
    match beadmap_fs::file_is_file(path) {
        Ok(true) => {}
        Ok(false) => return missing(source, requirement),
        Err(err) => {
            return degrade(
                source,
                requirement,
                LoadError::Read {
                    path: path.to_owned(),
                    source: err,
                },
            );
        }
    }
    match read(path) {
        Ok(items) => {
            info!("Loaded {} records from {source}", items.len());
            Ok(Dataset::Loaded(items))
        }
        Err(err) => degrade(source, requirement, err),
    }
}

fn missing<T>(source: &DataSource, requirement: Requirement) -> Result<Dataset<T>, LoadError> {
    match requirement {
        Requirement::Required => Err(LoadError::MissingRequiredDataset {
            dataset: source.dataset.clone(),
            path: source.path.clone(),
        }),
        Requirement::Optional => {
            info!("Optional dataset {source} is absent");
            Ok(Dataset::Absent(AbsenceReason::NotFound {
                path: source.path.clone(),
            }))
        }
    }
}

fn degrade<T>(
    source: &DataSource,
    requirement: Requirement,
    err: LoadError,
) -> Result<Dataset<T>, LoadError> {
    match requirement {
        Requirement::Required => Err(err),
        Requirement::Optional => {
            warn!("Skipped optional dataset {source}: {err}");
            Ok(Dataset::Absent(AbsenceReason::Unreadable {
                path: source.path.clone(),
                message: err.to_string(),
            }))
        }
    }
}

fn read_geojson(path: &Utf8Path) -> Result<Vec<SourceFeature>, LoadError> {
    let read_error = |source| LoadError::Read {
        path: path.to_owned(),
        source,
    };
    let (dir, name) = beadmap_fs::open_dir_and_file(path).map_err(read_error)?;
    let text = dir.read_to_string(name.as_str()).map_err(read_error)?;
    parse_feature_collection(&text, path)
}

fn polygons_from(
    path: &Utf8Path,
    features: Vec<SourceFeature>,
) -> Result<(Vec<GeoPolygon>, usize), LoadError> {
    let mut polygons = Vec::with_capacity(features.len());
    let mut skipped = 0;
    for feature in features {
        let geometry = match feature.geometry {
            Some(Geometry::Polygon(polygon)) => MultiPolygon(vec![polygon]),
            Some(Geometry::MultiPolygon(multi)) => multi,
            Some(other) => return Err(unsupported(path, &other)),
            None => {
                skipped += 1;
                continue;
            }
        };
        let name = polygon_name(&feature.attributes);
        polygons.push(GeoPolygon::new(geometry, name, feature.attributes));
    }
    Ok((polygons, skipped))
}

fn polygon_name(attributes: &Attributes) -> Option<String> {
    NAME_PROPERTIES
        .iter()
        .filter_map(|key| attributes.get(*key))
        .find(|value| !value.trim().is_empty())
        .cloned()
}

fn parse_count(raw: &str) -> Option<i64> {
    let text = raw.trim();
    text.parse::<i64>().ok().or_else(|| {
        let value = text.parse::<f64>().ok()?;
        let integral = value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "value is integral and well inside the i64 range"
        )]
        let count = value as i64;
        integral.then_some(count)
    })
}

fn unsupported(path: &Utf8Path, geometry: &Geometry<f64>) -> LoadError {
    let kind = match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    };
    LoadError::UnsupportedGeometry {
        path: path.to_owned(),
        kind: kind.to_owned(),
    }
}

fn log_skipped(dataset: &str, skipped: usize, reason: &str) {
    if skipped > 0 {
        warn!("Skipped {skipped} {dataset} features {reason}");
    }
}
