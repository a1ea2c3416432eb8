//! Behavioural tests for ownership classification using rstest-bdd.

use std::cell::RefCell;

use beadmap_core::{Attributes, Category, GeoPoint, OWNER_ATTRIBUTE, group_by_category};
use geo::Point;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// World state for classifier scenarios.
#[derive(Debug, Default)]
struct ClassifierWorld {
    record: RefCell<Option<GeoPoint>>,
    category: RefCell<Option<Category>>,
}

#[fixture]
fn world() -> ClassifierWorld {
    ClassifierWorld::default()
}

#[given("an infrastructure record owned by {owner}")]
fn given_owned_record(world: &ClassifierWorld, owner: String) {
    let clean_owner = owner.trim_matches('"');
    world.record.replace(Some(GeoPoint::new(
        Point::new(-75.5, 39.1),
        Attributes::from([(OWNER_ATTRIBUTE.to_owned(), clean_owner.to_owned())]),
    )));
}

#[given("an infrastructure record without an owner")]
fn given_unowned_record(world: &ClassifierWorld) {
    world
        .record
        .replace(Some(GeoPoint::bare(Point::new(-75.5, 39.1))));
}

#[when("I classify the record")]
fn when_classify(world: &ClassifierWorld) {
    let record = world.record.borrow_mut().take();
    let groups = group_by_category(record.into_iter().collect());
    let category = groups
        .iter()
        .find(|(_, members)| !members.is_empty())
        .map(|(category, _)| category);
    world.category.replace(category);
}

#[then("the category is {name}")]
fn then_category(world: &ClassifierWorld, name: String) {
    let clean_name = name.trim_matches('"');
    let category = *world.category.borrow();
    assert_eq!(category.map(Category::marker_name), Some(clean_name));
}

#[scenario(path = "tests/features/classifier.feature", index = 0)]
fn known_owner(world: ClassifierWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/classifier.feature", index = 1)]
fn case_insensitive_owner(world: ClassifierWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/classifier.feature", index = 2)]
fn unknown_owner(world: ClassifierWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/classifier.feature", index = 3)]
fn missing_owner(world: ClassifierWorld) {
    let _ = world;
}
