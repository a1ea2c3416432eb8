//! Density bucketing and dissolution.
//!
//! Grid cells carry a count of eligible locations. Cells are assigned to one
//! of eight fixed count ranges and each non-empty range is dissolved into a
//! single merged geometry.

use geo::{BooleanOps, MultiPolygon};
use log::{debug, warn};
use serde::Serialize;

use crate::Color;

/// A grid polygon carrying the number of locations inside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityCell {
    /// Cell geometry in WGS84.
    pub geometry: MultiPolygon<f64>,
    /// Number of locations counted in the cell.
    pub point_count: i64,
}

impl DensityCell {
    /// Construct a cell.
    #[must_use]
    pub const fn new(geometry: MultiPolygon<f64>, point_count: i64) -> Self {
        Self {
            geometry,
            point_count,
        }
    }
}

/// One count range with its presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DensityBucket {
    /// Inclusive lower bound.
    pub min: u32,
    /// Exclusive upper bound; `None` for the open-ended last bucket.
    pub max: Option<u32>,
    /// Fill colour as `#rrggbb`.
    pub color: &'static str,
    /// Layer label.
    pub label: &'static str,
}

impl DensityBucket {
    /// Whether `count` falls in this bucket.
    #[must_use]
    pub fn contains(&self, count: i64) -> bool {
        count >= i64::from(self.min) && self.max.is_none_or(|max| count < i64::from(max))
    }

    /// Fill colour.
    #[must_use]
    pub fn fill(&self) -> Color {
        Color::named(self.color)
    }
}

/// The fixed buckets, contiguous and ascending from 1.
pub const BUCKETS: [DensityBucket; 8] = [
    bucket(1, Some(5), "#e4e4f3", "Grid Layer (1-5 Locations)"),
    bucket(5, Some(10), "#d1d1ea", "Grid Layer (5-10 Locations)"),
    bucket(10, Some(20), "#b3b3e0", "Grid Layer (10-20 Locations)"),
    bucket(20, Some(30), "#8080c5", "Grid Layer (20-30 Locations)"),
    bucket(30, Some(50), "#6d6dbd", "Grid Layer (30-50 Locations)"),
    bucket(50, Some(75), "#4949ac", "Grid Layer (50-75 Locations)"),
    bucket(75, Some(100), "#3737a4", "Grid Layer (75-100 Locations)"),
    bucket(100, None, "#121293", "Grid Layer (100+ Locations)"),
];

const fn bucket(
    min: u32,
    max: Option<u32>,
    color: &'static str,
    label: &'static str,
) -> DensityBucket {
    DensityBucket {
        min,
        max,
        color,
        label,
    }
}

/// Index into [`BUCKETS`] for `count`, or `None` when the count is below 1.
///
/// # Examples
/// ```
/// use beadmap_core::bucket_assign;
///
/// assert_eq!(bucket_assign(1), Some(0));
/// assert_eq!(bucket_assign(4), Some(0));
/// assert_eq!(bucket_assign(5), Some(1));
/// assert_eq!(bucket_assign(99), Some(6));
/// assert_eq!(bucket_assign(100), Some(7));
/// assert_eq!(bucket_assign(0), None);
/// ```
#[must_use]
pub fn bucket_assign(count: i64) -> Option<usize> {
    BUCKETS.iter().position(|bucket| bucket.contains(count))
}

/// Union the geometries of `cells` into one multipolygon.
///
/// Cells are folded pairwise. An empty input yields an empty multipolygon.
#[must_use]
pub fn dissolve(cells: &[&DensityCell]) -> MultiPolygon<f64> {
    cells
        .iter()
        .map(|cell| &cell.geometry)
        .fold(MultiPolygon(Vec::new()), |merged, next| {
            if merged.0.is_empty() {
                next.clone()
            } else {
                merged.union(next)
            }
        })
}

/// One dissolved bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityLayer {
    /// The bucket this geometry covers.
    pub bucket: DensityBucket,
    /// Union of all cells in the bucket.
    pub geometry: MultiPolygon<f64>,
    /// Number of cells merged.
    pub cell_count: usize,
}

/// Result of [`aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DensitySummary {
    /// Non-empty buckets in ascending count order.
    pub layers: Vec<DensityLayer>,
    /// Cells whose count fell below the first bucket.
    pub unbucketed: usize,
}

/// Bucket `cells` and dissolve each non-empty bucket.
#[must_use]
pub fn aggregate(cells: &[DensityCell]) -> DensitySummary {
    let mut members: [Vec<&DensityCell>; BUCKETS.len()] = Default::default();
    let mut unbucketed = 0;
    for cell in cells {
        match bucket_assign(cell.point_count).and_then(|index| members.get_mut(index)) {
            Some(bucket) => bucket.push(cell),
            None => unbucketed += 1,
        }
    }
    if unbucketed > 0 {
        warn!("Skipped {unbucketed} density cells with a count below 1");
    }

    let layers: Vec<DensityLayer> = BUCKETS
        .iter()
        .zip(members.iter())
        .filter(|(_, group)| !group.is_empty())
        .map(|(bucket, group)| DensityLayer {
            bucket: *bucket,
            geometry: dissolve(group),
            cell_count: group.len(),
        })
        .collect();
    debug!(
        "Aggregated {} density cells into {} buckets",
        cells.len(),
        layers.len()
    );
    DensitySummary { layers, unbucketed }
}
