//! Normalised features produced by the loader.
//!
//! All coordinates are WGS84 with `x = longitude` and `y = latitude`. The
//! loader reprojects every source before constructing these values, so the
//! rest of the engine never inspects a coordinate reference.

use std::collections::BTreeMap;

use geo::{MultiPolygon, Point};
use serde::Serialize;

use crate::Category;

/// Free-form attribute map carried by every feature.
///
/// A `BTreeMap` keeps iteration order stable so two runs over the same input
/// produce identical popups and artefacts.
pub type Attributes = BTreeMap<String, String>;

/// A point feature such as an eligible location or an antenna structure.
///
/// # Examples
/// ```
/// use beadmap_core::{Attributes, GeoPoint};
/// use geo::Point;
///
/// let point = GeoPoint::new(
///     Point::new(-75.5, 39.1),
///     Attributes::from([("entity".into(), "SBA Towers".into())]),
/// );
/// assert_eq!(point.attribute("entity"), Some("SBA Towers"));
/// assert!(point.category.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    /// Position in WGS84.
    pub location: Point<f64>,
    /// Source attributes, stringified.
    pub attributes: Attributes,
    /// Ownership category, set once the classifier has run.
    pub category: Option<Category>,
}

impl GeoPoint {
    /// Construct an unclassified point.
    #[must_use]
    pub const fn new(location: Point<f64>, attributes: Attributes) -> Self {
        Self {
            location,
            attributes,
            category: None,
        }
    }

    /// Construct a point without attributes.
    #[must_use]
    pub const fn bare(location: Point<f64>) -> Self {
        Self::new(location, Attributes::new())
    }

    /// Return a copy tagged with `category`.
    #[must_use]
    pub fn with_category(self, category: Category) -> Self {
        Self {
            category: Some(category),
            ..self
        }
    }

    /// Look up an attribute, treating blank values as absent.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        non_blank(&self.attributes, key)
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.location.y()
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.location.x()
    }
}

/// An area feature such as a boundary, subdivision, overlay or density cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPolygon {
    /// Geometry in WGS84. Single polygons are stored as one-member collections.
    pub geometry: MultiPolygon<f64>,
    /// Display and join name, when the source carries one.
    pub name: Option<String>,
    /// Source attributes, stringified.
    pub attributes: Attributes,
}

impl GeoPolygon {
    /// Construct a polygon feature.
    #[must_use]
    pub const fn new(
        geometry: MultiPolygon<f64>,
        name: Option<String>,
        attributes: Attributes,
    ) -> Self {
        Self {
            geometry,
            name,
            attributes,
        }
    }

    /// Look up an attribute, treating blank values as absent.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        non_blank(&self.attributes, key)
    }
}

/// One row of a tabular source such as the licence spreadsheet.
///
/// Columns keep their header names; values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TabularRecord {
    /// Column values keyed by header.
    pub fields: BTreeMap<String, String>,
}

impl TabularRecord {
    /// Build a record from `(column, value)` pairs.
    ///
    /// # Examples
    /// ```
    /// use beadmap_core::TabularRecord;
    ///
    /// let record = TabularRecord::from_pairs([("county_name", "Kent"), ("bidder", "Acme")]);
    /// assert_eq!(record.get("county_name"), Some("Kent"));
    /// assert_eq!(record.get("Channel"), None);
    /// ```
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Look up a column, treating blank values as absent.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        non_blank(&self.fields, column)
    }
}

fn non_blank<'a>(map: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    map.get(key)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_attributes_read_as_absent(#[case] value: &str) {
        let point = GeoPoint::new(
            Point::new(0.0, 0.0),
            Attributes::from([("entity".into(), value.into())]),
        );
        assert_eq!(point.attribute("entity"), None);
    }

    #[rstest]
    fn with_category_keeps_location_and_attributes() {
        let point = GeoPoint::new(
            Point::new(-90.0, 30.0),
            Attributes::from([("entity".into(), "Crown Castle".into())]),
        );
        let tagged = point.clone().with_category(Category::CrownCastle);
        assert_eq!(tagged.location, point.location);
        assert_eq!(tagged.attributes, point.attributes);
        assert_eq!(tagged.category, Some(Category::CrownCastle));
    }

    #[rstest]
    fn coordinates_follow_lon_lat_order() {
        let point = GeoPoint::bare(Point::new(-75.5, 39.1));
        assert_eq!(point.longitude(), -75.5);
        assert_eq!(point.latitude(), 39.1);
    }
}
