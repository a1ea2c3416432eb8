//! Structured popup content.
//!
//! Popups are tables, not markup. The renderer escapes and formats them.

use serde::Serialize;

use crate::{GeoPoint, TabularRecord, structure_type_label};

/// Placeholder shown for missing values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Title of the infrastructure popup.
pub const INFRASTRUCTURE_TITLE: &str = "FCC Tower Information";
/// Title of the subdivision licence popup.
pub const LICENCE_TITLE: &str = "CBRS PAL License Holders";

/// A titled table attached to a feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Popup {
    /// Heading shown above the table.
    pub title: String,
    /// Column headers. Empty for key/value tables.
    pub columns: Vec<String>,
    /// Table rows. Each row has one cell per column, or two cells for
    /// key/value tables.
    pub rows: Vec<Vec<String>>,
}

impl Popup {
    /// Whether the table has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

/// Build the key/value popup for one infrastructure point.
///
/// Coordinates come from the `lat` and `lon` attributes when present, falling
/// back to the point's geometry.
///
/// # Examples
/// ```
/// use beadmap_core::{Attributes, GeoPoint, infrastructure_popup};
/// use geo::Point;
///
/// let point = GeoPoint::new(
///     Point::new(-75.5, 39.1),
///     Attributes::from([("structure_type".into(), "MTOWER".into())]),
/// );
/// let popup = infrastructure_popup(&point);
/// assert_eq!(popup.rows[4], ["Type", "Monopole Tower (MTOWER)"]);
/// assert_eq!(popup.rows[5], ["Owner", "N/A"]);
/// ```
#[must_use]
pub fn infrastructure_popup(point: &GeoPoint) -> Popup {
    let latitude = point
        .attribute("lat")
        .map_or_else(|| point.latitude().to_string(), str::to_owned);
    let longitude = point
        .attribute("lon")
        .map_or_else(|| point.longitude().to_string(), str::to_owned);
    let county = format!(
        "{} ({}{})",
        or_na(point.attribute("county_name")),
        or_na(point.attribute("state_fips")),
        or_na(point.attribute("county_fips")),
    );
    let structure = point.attribute("structure_type");
    let kind = format!(
        "{} ({})",
        structure.map_or(NOT_AVAILABLE, structure_type_label),
        or_na(structure),
    );

    let rows = [
        ("Latitude", latitude),
        ("Longitude", longitude),
        ("County Name", county),
        (
            "Overall Height Above Ground (Meters)",
            or_na(point.attribute("overall_height_above_ground")).to_owned(),
        ),
        ("Type", kind),
        ("Owner", or_na(point.attribute("entity")).to_owned()),
    ];
    Popup {
        title: INFRASTRUCTURE_TITLE.to_owned(),
        columns: Vec::new(),
        rows: rows
            .into_iter()
            .map(|(label, value)| vec![label.to_owned(), value])
            .collect(),
    }
}

/// Build the licence table for one subdivision.
///
/// Columns are Channel, County and Bidder, read from the `Channel`,
/// `county_name` and `bidder` fields. An empty slice yields a table with
/// headers and no rows.
#[must_use]
pub fn licence_popup(records: &[TabularRecord]) -> Popup {
    Popup {
        title: LICENCE_TITLE.to_owned(),
        columns: ["Channel", "County", "Bidder"]
            .map(str::to_owned)
            .to_vec(),
        rows: records
            .iter()
            .map(|record| {
                ["Channel", "county_name", "bidder"]
                    .map(|field| or_na(record.get(field)).to_owned())
                    .to_vec()
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Attributes;
    use geo::Point;
    use rstest::rstest;

    #[rstest]
    fn infrastructure_popup_formats_every_row() {
        let point = GeoPoint::new(
            Point::new(-75.5, 39.1),
            Attributes::from([
                ("lat".into(), "39.1".into()),
                ("lon".into(), "-75.5".into()),
                ("county_name".into(), "Kent".into()),
                ("state_fips".into(), "10".into()),
                ("county_fips".into(), "001".into()),
                ("overall_height_above_ground".into(), "45.7".into()),
                ("structure_type".into(), "GTOWER".into()),
                ("entity".into(), "Crown Castle".into()),
            ]),
        );
        let popup = infrastructure_popup(&point);
        let expected: Vec<Vec<String>> = [
            ["Latitude", "39.1"],
            ["Longitude", "-75.5"],
            ["County Name", "Kent (10001)"],
            ["Overall Height Above Ground (Meters)", "45.7"],
            ["Type", "Guyed Tower (GTOWER)"],
            ["Owner", "Crown Castle"],
        ]
        .iter()
        .map(|row| row.iter().map(|cell| (*cell).to_owned()).collect())
        .collect();
        assert_eq!(popup.title, INFRASTRUCTURE_TITLE);
        assert_eq!(popup.rows, expected);
    }

    #[rstest]
    fn missing_attributes_render_placeholder() {
        let popup = infrastructure_popup(&GeoPoint::bare(Point::new(1.5, 2.5)));
        let values: Vec<&str> = popup
            .rows
            .iter()
            .filter_map(|row| row.get(1).map(String::as_str))
            .collect();
        assert_eq!(
            values,
            ["2.5", "1.5", "N/A (N/AN/A)", "N/A", "N/A (N/A)", "N/A"]
        );
    }

    #[rstest]
    fn licence_popup_keeps_record_order() {
        let records = [
            TabularRecord::from_pairs([("Channel", "3"), ("county_name", "Kent"), ("bidder", "B")]),
            TabularRecord::from_pairs([("Channel", "1"), ("county_name", "Kent"), ("bidder", "A")]),
        ];
        let popup = licence_popup(&records);
        assert_eq!(popup.columns, ["Channel", "County", "Bidder"]);
        assert_eq!(popup.rows.len(), 2);
        assert_eq!(popup.rows.first().and_then(|r| r.first()).map(String::as_str), Some("3"));
    }

    #[rstest]
    fn empty_licence_popup_has_headers_only() {
        let popup = licence_popup(&[]);
        assert!(popup.is_empty());
        assert_eq!(popup.columns.len(), 3);
    }
}
