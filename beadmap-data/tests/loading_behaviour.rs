//! Behavioural tests for dataset loading and region discovery.
#![expect(
    clippy::expect_used,
    reason = "fixtures should fail fast during setup"
)]

use std::cell::RefCell;
use std::fs;

use beadmap_core::GeoPoint;
use beadmap_data::{
    AbsenceReason, DataSource, Dataset, LoadError, RegionBundle, Requirement, discover_regions,
    load_points, load_polygons,
};
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

struct LoadingWorld {
    _temp: TempDir,
    root: Utf8PathBuf,
    points: RefCell<Option<Result<Dataset<GeoPoint>, LoadError>>>,
    required_error: RefCell<Option<LoadError>>,
    regions: RefCell<Vec<String>>,
}

#[fixture]
fn world() -> LoadingWorld {
    let temp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8 tempdir");
    LoadingWorld {
        _temp: temp,
        root,
        points: RefCell::new(None),
        required_error: RefCell::new(None),
        regions: RefCell::new(Vec::new()),
    }
}

fn touch_region(world: &LoadingWorld, name: &str, complete: bool) {
    let bundle = RegionBundle::new(&world.root, name);
    fs::create_dir_all(bundle.root()).expect("create region directory");
    let sources = bundle.required_sources();
    let count = if complete { sources.len() } else { 1 };
    for source in sources.iter().take(count) {
        fs::write(source.path(), r#"{"type":"FeatureCollection","features":[]}"#)
            .expect("write region file");
    }
}

#[given("an empty data directory")]
fn given_empty_directory(world: &LoadingWorld) {
    let entries = fs::read_dir(&world.root).expect("list tempdir").count();
    assert_eq!(entries, 0);
}

#[given("a Web Mercator point file {name}")]
fn given_mercator_points(world: &LoadingWorld, name: String) {
    let clean_name = name.trim_matches('"');
    fs::write(
        world.root.join(clean_name),
        r#"{"type":"FeatureCollection",
            "crs":{"type":"name","properties":{"name":"urn:ogc:def:crs:EPSG::3857"}},
            "features":[{"type":"Feature","properties":{"entity":"SBA"},
              "geometry":{"type":"Point","coordinates":[-8399723.49729725,4721671.572580107]}}]}"#,
    )
    .expect("write points");
}

#[given("a complete region {name}")]
fn given_complete_region(world: &LoadingWorld, name: String) {
    touch_region(world, name.trim_matches('"'), true);
}

#[given("an incomplete region {name}")]
fn given_incomplete_region(world: &LoadingWorld, name: String) {
    touch_region(world, name.trim_matches('"'), false);
}

#[when("I load the optional dataset {name}")]
fn when_load_optional(world: &LoadingWorld, name: String) {
    let clean_name = name.trim_matches('"');
    let source = DataSource::new(clean_name, world.root.join(clean_name));
    world
        .points
        .replace(Some(load_points(&source, Requirement::Optional)));
}

#[when("I load the required dataset {name}")]
fn when_load_required(world: &LoadingWorld, name: String) {
    let clean_name = name.trim_matches('"');
    let source = DataSource::new(clean_name, world.root.join(clean_name));
    let result = load_polygons(&source, Requirement::Required);
    world.required_error.replace(result.err());
}

#[when("I discover regions")]
fn when_discover(world: &LoadingWorld) {
    let names = discover_regions(&world.root)
        .expect("discover regions")
        .iter()
        .map(|bundle| bundle.name().to_owned())
        .collect();
    world.regions.replace(names);
}

#[then("the dataset is absent because it was not found")]
fn then_absent(world: &LoadingWorld) {
    let points = world.points.borrow();
    let dataset = points
        .as_ref()
        .expect("load attempted")
        .as_ref()
        .expect("optional load succeeds");
    assert!(matches!(
        dataset.absence(),
        Some(AbsenceReason::NotFound { .. })
    ));
}

#[then("loading fails for the missing dataset")]
fn then_missing_required(world: &LoadingWorld) {
    let error = world.required_error.borrow();
    assert!(matches!(
        error.as_ref(),
        Some(LoadError::MissingRequiredDataset { .. })
    ));
}

#[then("the first point lies in Delaware")]
#[expect(
    clippy::float_arithmetic,
    reason = "reprojected coordinates are compared within a tolerance"
)]
fn then_point_reprojected(world: &LoadingWorld) {
    let points = world.points.borrow();
    let dataset = points
        .as_ref()
        .expect("load attempted")
        .as_ref()
        .expect("load succeeds");
    let point = dataset.items().first().expect("one point");
    assert!((point.longitude() + 75.456).abs() < 1e-6);
    assert!((point.latitude() - 39.0).abs() < 1e-6);
    assert_eq!(point.attribute("entity"), Some("SBA"));
}

#[then("the discovered regions are {names}")]
fn then_regions(world: &LoadingWorld, names: String) {
    let expected: Vec<String> = names
        .trim_matches('"')
        .split(", ")
        .map(str::to_owned)
        .collect();
    assert_eq!(*world.regions.borrow(), expected);
}

#[scenario(path = "tests/features/loading.feature", index = 0)]
fn missing_optional_dataset(world: LoadingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/loading.feature", index = 1)]
fn missing_required_dataset(world: LoadingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/loading.feature", index = 2)]
fn reprojected_points(world: LoadingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/loading.feature", index = 3)]
fn region_discovery(world: LoadingWorld) {
    let _ = world;
}
