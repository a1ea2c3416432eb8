//! Reader for the infrastructure SQLite extract.
//!
//! The extract holds one table, `antenna_towers`, with `lat` and `lon`
//! columns plus free-form attribute columns. Every non-coordinate column is
//! carried through as a string attribute.

use beadmap_core::{Attributes, GeoPoint};
use camino::Utf8Path;
use geo::Point;
use log::warn;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use crate::LoadError;

/// Table holding infrastructure records.
pub const INFRASTRUCTURE_TABLE: &str = "antenna_towers";

/// Points read from an extract, plus the rows that had to be skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfrastructureRows {
    /// Points with valid coordinates, in row order.
    pub points: Vec<GeoPoint>,
    /// Rows whose coordinates were missing or invalid.
    pub skipped: usize,
}

/// Read every row of [`INFRASTRUCTURE_TABLE`] from the database at `path`.
///
/// # Errors
/// Returns [`LoadError::Sqlite`] when the database cannot be opened or the
/// table lacks the coordinate columns.
pub fn read_infrastructure(path: &Utf8Path) -> Result<InfrastructureRows, LoadError> {
    let sqlite_error = |operation: &'static str| {
        move |source| LoadError::Sqlite {
            path: path.to_owned(),
            operation,
            source,
        }
    };
    let connection = Connection::open_with_flags(
        path.as_std_path(),
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(sqlite_error("open database"))?;
    let mut statement = connection
        .prepare(&format!("SELECT * FROM {INFRASTRUCTURE_TABLE}"))
        .map_err(sqlite_error("prepare select"))?;

    let columns: Vec<String> = statement
        .column_names()
        .into_iter()
        .map(str::to_owned)
        .collect();
    let lat_index = column_index(&columns, "lat")
        .ok_or_else(|| sqlite_error("locate lat column")(missing_column("lat")))?;
    let lon_index = column_index(&columns, "lon")
        .ok_or_else(|| sqlite_error("locate lon column")(missing_column("lon")))?;

    let mut rows = statement.query([]).map_err(sqlite_error("run select"))?;
    let mut result = InfrastructureRows::default();
    while let Some(row) = rows.next().map_err(sqlite_error("read row"))? {
        let (Some(lat), Some(lon)) = (
            row.get_ref(lat_index).ok().and_then(as_coordinate),
            row.get_ref(lon_index).ok().and_then(as_coordinate),
        ) else {
            result.skipped += 1;
            continue;
        };
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            result.skipped += 1;
            continue;
        }
        let mut attributes = Attributes::new();
        for (index, name) in columns.iter().enumerate() {
            if let Ok(value) = row.get_ref(index)
                && let Some(text) = as_text(value)
            {
                attributes.insert(name.clone(), text);
            }
        }
        result
            .points
            .push(GeoPoint::new(Point::new(lon, lat), attributes));
    }
    if result.skipped > 0 {
        warn!(
            "Skipped {} infrastructure rows with invalid coordinates in {path}",
            result.skipped
        );
    }
    Ok(result)
}

fn column_index(columns: &[String], wanted: &str) -> Option<usize> {
    columns
        .iter()
        .position(|column| column.eq_ignore_ascii_case(wanted))
}

fn missing_column(name: &str) -> rusqlite::Error {
    rusqlite::Error::InvalidColumnName(name.to_owned())
}

#[expect(
    clippy::cast_precision_loss,
    reason = "integer coordinates are whole degrees, far inside f64's exact range"
)]
fn as_coordinate(value: ValueRef<'_>) -> Option<f64> {
    let number = match value {
        ValueRef::Real(real) => real,
        ValueRef::Integer(integer) => integer as f64,
        ValueRef::Text(text) => std::str::from_utf8(text).ok()?.trim().parse().ok()?,
        ValueRef::Null | ValueRef::Blob(_) => return None,
    };
    number.is_finite().then_some(number)
}

fn as_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => None,
        ValueRef::Integer(integer) => Some(integer.to_string()),
        ValueRef::Real(real) => Some(real.to_string()),
        ValueRef::Text(text) => Some(String::from_utf8_lossy(text).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn database() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().expect("tempdir");
        let path = Utf8PathBuf::from_path_buf(temp.path().join("towers.sqlite")).expect("utf8");
        let connection = Connection::open(path.as_std_path()).expect("open database");
        connection
            .execute_batch(
                "CREATE TABLE antenna_towers (
                    lat REAL, lon REAL, entity TEXT, structure_type TEXT,
                    overall_height_above_ground REAL, county_fips TEXT
                 );
                 INSERT INTO antenna_towers VALUES (39.1, -75.5, 'Crown Castle', 'MTOWER', 45.5, '001');
                 INSERT INTO antenna_towers VALUES ('38.9', '-75.4', 'SBA', NULL, NULL, '005');
                 INSERT INTO antenna_towers VALUES (NULL, -75.4, 'Nobody', 'TOWER', 10, '003');
                 INSERT INTO antenna_towers VALUES (123.0, -75.4, 'Broken', 'TOWER', 10, '003');",
            )
            .expect("seed database");
        (temp, path)
    }

    #[rstest]
    fn reads_rows_and_skips_invalid_coordinates(database: (TempDir, Utf8PathBuf)) {
        let (_guard, path) = database;
        let rows = read_infrastructure(&path).expect("read rows");
        assert_eq!(rows.points.len(), 2);
        assert_eq!(rows.skipped, 2);

        let first = rows.points.first().expect("first point");
        assert_eq!(first.location, Point::new(-75.5, 39.1));
        assert_eq!(first.attribute("entity"), Some("Crown Castle"));
        assert_eq!(first.attribute("county_fips"), Some("001"));
        assert_eq!(first.attribute("overall_height_above_ground"), Some("45.5"));

        let second = rows.points.get(1).expect("second point");
        assert_eq!(second.attribute("structure_type"), None);
    }

    #[rstest]
    fn missing_table_is_an_error() {
        let temp = TempDir::new().expect("tempdir");
        let path = Utf8PathBuf::from_path_buf(temp.path().join("empty.sqlite")).expect("utf8");
        Connection::open(path.as_std_path())
            .and_then(|c| c.execute_batch("CREATE TABLE other (x INTEGER);"))
            .expect("create database");
        let err = read_infrastructure(&path).expect_err("table is missing");
        assert!(matches!(err, LoadError::Sqlite { .. }));
    }
}
