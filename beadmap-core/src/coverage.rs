//! Coverage rings around infrastructure points.
//!
//! Each point gets two concentric rings, a near one and a far one, whose
//! radii are corrected for latitude with the formula below. The formula is
//! kept exactly as the maps have always drawn it:
//!
//! ```text
//! degrees_per_mile(lat, miles) = miles / (69 * cos(lat))
//! radius_meters(lat, miles)    = degrees_per_mile(lat, miles) * 111000
//! ```
//!
//! Radii therefore grow with latitude and diverge at the poles.

use geo::Point;
use log::warn;
use serde::Serialize;
use thiserror::Error;

use crate::{Category, GeoPoint};

/// Miles per degree of latitude used by the ring formula.
pub const MILES_PER_DEGREE: f64 = 69.0;
/// Metres per degree used to convert the ring radius.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Degrees of longitude spanned by `miles` at `latitude`.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the ring formula divides by the latitude-scaled miles per degree"
)]
pub fn degrees_per_mile(latitude: f64, miles: f64) -> f64 {
    miles / (MILES_PER_DEGREE * latitude.to_radians().cos())
}

/// Ring radius in metres for `miles` at `latitude`.
///
/// # Examples
/// ```
/// use beadmap_core::radius_meters;
///
/// let radius = radius_meters(0.0, 2.0);
/// assert!((radius - 3217.39).abs() < 0.01);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "converting degrees to metres is a scalar product"
)]
pub fn radius_meters(latitude: f64, miles: f64) -> f64 {
    degrees_per_mile(latitude, miles) * METERS_PER_DEGREE
}

/// Near and far ring distances in miles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoverageDistances {
    near: f64,
    far: f64,
}

/// Errors returned by [`CoverageDistances::new`].
#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum CoverageDistancesError {
    /// A distance was zero, negative or not finite.
    #[error("coverage distance must be a positive finite number of miles, got {0}")]
    NotPositive(f64),
    /// The near ring was not strictly inside the far ring.
    #[error("near distance {near} must be smaller than far distance {far}")]
    NotOrdered {
        /// Requested near distance.
        near: f64,
        /// Requested far distance.
        far: f64,
    },
}

impl CoverageDistances {
    /// Validate a pair of distances.
    ///
    /// # Errors
    /// Returns an error when either distance is not a positive finite number
    /// or when `near >= far`.
    pub fn new(near: f64, far: f64) -> Result<Self, CoverageDistancesError> {
        for miles in [near, far] {
            if !miles.is_finite() || miles <= 0.0 {
                return Err(CoverageDistancesError::NotPositive(miles));
            }
        }
        if near >= far {
            return Err(CoverageDistancesError::NotOrdered { near, far });
        }
        Ok(Self { near, far })
    }

    /// Near distance in miles.
    #[must_use]
    pub const fn near(&self) -> f64 {
        self.near
    }

    /// Far distance in miles.
    #[must_use]
    pub const fn far(&self) -> f64 {
        self.far
    }
}

impl Default for CoverageDistances {
    fn default() -> Self {
        Self {
            near: 2.0,
            far: 5.0,
        }
    }
}

/// Radii in metres for both rings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RingRadii {
    /// Near ring radius.
    pub near: f64,
    /// Far ring radius.
    pub far: f64,
}

/// Ring radii in metres at `latitude`.
///
/// # Examples
/// ```
/// use beadmap_core::{CoverageDistances, ring_radii_meters};
///
/// let radii = ring_radii_meters(0.0, CoverageDistances::default());
/// assert!((radii.near - 3217.4).abs() < 0.1);
/// assert!((radii.far - 8043.5).abs() < 0.1);
/// ```
#[must_use]
pub fn ring_radii_meters(latitude: f64, distances: CoverageDistances) -> RingRadii {
    RingRadii {
        near: radius_meters(latitude, distances.near),
        far: radius_meters(latitude, distances.far),
    }
}

/// Which of the two rings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DistanceClass {
    /// The inner ring.
    Near,
    /// The outer ring.
    Far,
}

/// A circle drawn around an infrastructure point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageRing {
    /// Ring centre.
    pub center: Point<f64>,
    /// Radius in metres.
    pub radius_meters: f64,
    /// Category of the point the ring surrounds.
    pub category: Category,
    /// Near or far.
    pub distance_class: DistanceClass,
    /// Nominal distance in miles.
    pub miles: f64,
}

/// Build the near and far rings for `point`.
///
/// Returns `None`, with a warning, for latitudes at or beyond the poles and
/// whenever a radius is not a positive finite number.
#[must_use]
pub fn coverage_rings(
    point: &GeoPoint,
    category: Category,
    distances: CoverageDistances,
) -> Option<[CoverageRing; 2]> {
    let radii = ring_radii_meters(point.latitude(), distances);
    let usable = |radius: f64| radius.is_finite() && radius > 0.0;
    if point.latitude().abs() >= 90.0 || !(usable(radii.near) && usable(radii.far)) {
        warn!(
            "Skipped coverage rings at ({}, {}): radius is undefined",
            point.longitude(),
            point.latitude()
        );
        return None;
    }
    let ring = |radius_meters, distance_class, miles| CoverageRing {
        center: point.location,
        radius_meters,
        category,
        distance_class,
        miles,
    };
    Some([
        ring(radii.near, DistanceClass::Near, distances.near),
        ring(radii.far, DistanceClass::Far, distances.far),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 2.0, 3217.391)]
    #[case(0.0, 5.0, 8043.478)]
    #[case(60.0, 2.0, 6434.783)]
    #[expect(
        clippy::float_arithmetic,
        reason = "test compares radii within a tolerance"
    )]
    fn radius_follows_latitude_formula(
        #[case] latitude: f64,
        #[case] miles: f64,
        #[case] expected: f64,
    ) {
        assert!((radius_meters(latitude, miles) - expected).abs() < 0.01);
    }

    #[rstest]
    #[case(10.0)]
    #[case(45.0)]
    #[case(-45.0)]
    fn far_ring_exceeds_near_ring(#[case] latitude: f64) {
        let radii = ring_radii_meters(latitude, CoverageDistances::default());
        assert!(radii.far > radii.near);
        assert!(radii.near > 0.0);
    }

    #[rstest]
    fn rings_carry_category_and_class() {
        let point = GeoPoint::bare(Point::new(-75.0, 39.0));
        let rings = coverage_rings(&point, Category::Sba, CoverageDistances::default());
        let Some([near, far]) = rings else {
            panic!("rings expected at mid latitude");
        };
        assert_eq!(near.distance_class, DistanceClass::Near);
        assert_eq!(far.distance_class, DistanceClass::Far);
        assert_eq!(near.category, Category::Sba);
        assert_eq!(near.center, point.location);
        assert_eq!(far.miles, 5.0);
    }

    #[rstest]
    fn polar_points_are_skipped() {
        let pole = GeoPoint::bare(Point::new(0.0, 90.0));
        let rings = coverage_rings(&pole, Category::Other, CoverageDistances::default());
        assert!(rings.is_none());
        let south = GeoPoint::bare(Point::new(0.0, -91.0));
        assert!(coverage_rings(&south, Category::Other, CoverageDistances::default()).is_none());
    }

    #[rstest]
    #[case(0.0, 5.0)]
    #[case(-1.0, 5.0)]
    #[case(5.0, 2.0)]
    #[case(2.0, f64::NAN)]
    fn rejects_invalid_distances(#[case] near: f64, #[case] far: f64) {
        assert!(CoverageDistances::new(near, far).is_err());
    }
}
