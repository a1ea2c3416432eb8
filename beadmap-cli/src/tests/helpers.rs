//! Test helpers for laying out region bundles on disk.

use super::*;
use beadmap_core::{CoverageDistances, KeyPolicy, TabularRecord};
use beadmap_data::{AbsenceReason, Dataset};
use beadmap_render::Renderer;
use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::Connection;
use std::fs;
use tempfile::TempDir;

use crate::pipeline::RegionContext;

const EMPTY_COLLECTION: &str = r#"{"type":"FeatureCollection","features":[]}"#;

const OUTLINE: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{"NAME":"Delaware"},
   "geometry":{"type":"Polygon","coordinates":[[[-75.8,38.4],[-75.0,38.4],[-75.0,39.8],[-75.8,39.8],[-75.8,38.4]]]}}]}"#;

const COUNTIES: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{"NAME":"Kent"},
   "geometry":{"type":"Polygon","coordinates":[[[-75.8,38.8],[-75.0,38.8],[-75.0,39.4],[-75.8,39.4],[-75.8,38.8]]]}},
  {"type":"Feature","properties":{"NAME":"Sussex"},
   "geometry":{"type":"Polygon","coordinates":[[[-75.8,38.4],[-75.0,38.4],[-75.0,38.8],[-75.8,38.8],[-75.8,38.4]]]}}]}"#;

const LOCATIONS: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{"location_id":"1"},"geometry":{"type":"Point","coordinates":[-75.5,39.1]}},
  {"type":"Feature","properties":{"location_id":"2"},"geometry":{"type":"Point","coordinates":[-75.4,38.6]}}]}"#;

const GRID: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{"point_count":3},
   "geometry":{"type":"Polygon","coordinates":[[[-75.6,39.0],[-75.5,39.0],[-75.5,39.1],[-75.6,39.1],[-75.6,39.0]]]}},
  {"type":"Feature","properties":{"point_count":60},
   "geometry":{"type":"Polygon","coordinates":[[[-75.5,38.5],[-75.4,38.5],[-75.4,38.6],[-75.5,38.6],[-75.5,38.5]]]}}]}"#;

/// A data directory with regions written into it.
pub(super) struct DataDir {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl DataDir {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write the four required files of `name`.
    pub(super) fn write_region(&self, name: &str) -> RegionBundle {
        let bundle = RegionBundle::new(&self.root, name);
        fs::create_dir_all(bundle.root()).expect("create region directory");
        for (source, contents) in bundle
            .required_sources()
            .iter()
            .zip([OUTLINE, COUNTIES, LOCATIONS, GRID])
        {
            fs::write(source.path(), contents).expect("write required dataset");
        }
        bundle
    }

    /// Write a region whose boundary file holds no geometry.
    pub(super) fn write_broken_region(&self, name: &str) -> RegionBundle {
        let bundle = self.write_region(name);
        fs::write(bundle.boundary().path(), EMPTY_COLLECTION).expect("blank boundary");
        bundle
    }

    /// Add an infrastructure extract with one tower per known owner.
    pub(super) fn write_towers(&self, bundle: &RegionBundle) {
        let path = bundle
            .root()
            .join(format!("{} FCC Antenna Structures.sqlite", bundle.name()));
        let connection = Connection::open(path.as_std_path()).expect("create extract");
        connection
            .execute_batch(
                "CREATE TABLE antenna_towers (lat REAL, lon REAL, entity TEXT, structure_type TEXT);
                 INSERT INTO antenna_towers VALUES (39.1, -75.5, 'SBA Communications', 'MTOWER');
                 INSERT INTO antenna_towers VALUES (38.7, -75.3, 'Crown Castle', 'GTOWER');
                 INSERT INTO antenna_towers VALUES (38.9, -75.2, 'Acme Wireless', 'POLE');",
            )
            .expect("populate extract");
    }

    /// Write a licence table next to the regions.
    pub(super) fn write_licences(&self) -> Utf8PathBuf {
        let path = self.root.join("licences.csv");
        fs::write(
            &path,
            "Channel,county_name,bidder,state_abbr\n\
             1,Kent,Acme,DE\n\
             2,Kent,Beta,DE\n\
             3,Nowhere,Gamma,DE\n\
             4,Kent,Delta,MD\n",
        )
        .expect("write licences");
        path
    }
}

pub(super) fn absent_licences() -> Dataset<TabularRecord> {
    Dataset::Absent(AbsenceReason::NotConfigured)
}

pub(super) fn context<'a>(
    output_dir: Option<&'a Utf8Path>,
    licences: &'a Dataset<TabularRecord>,
    renderer: &'a dyn Renderer,
) -> RegionContext<'a> {
    RegionContext {
        output_dir,
        key_policy: KeyPolicy::Exact,
        distances: CoverageDistances::default(),
        licences,
        renderer,
    }
}
