//! Per-region map generation.
//!
//! A region run loads every dataset of its bundle, classifies, joins and
//! aggregates them, composes the layer list, renders it and writes the
//! artefact. Everything created here is dropped when the run ends.

use beadmap_core::{
    Category, Color, CompositionInput, CoverageDistances, DatasetAvailability, DensityCell,
    GeoPoint, GeoPolygon, JoinReport, KeyPolicy, LayerSpec, Overlay, RegionIndex, TabularRecord,
    aggregate, compose, group_by_category, join, overlay_color, view_center,
};
use beadmap_data::{
    AbsenceReason, DataSource, Dataset, LoadError, RegionBundle, Requirement, filter_by_state,
    load_density_cells, load_infrastructure, load_points, load_polygons, load_tabular,
    region_abbreviation,
};
use beadmap_fs::write_artifact;
use beadmap_render::{MapDocument, Renderer};
use camino::{Utf8Path, Utf8PathBuf};
use log::{info, warn};

use crate::RegionError;

/// Licence table column naming the subdivision a licence covers.
pub(crate) const LICENCE_KEY_FIELD: &str = "county_name";

/// Settings shared by every region of a batch.
pub(crate) struct RegionContext<'a> {
    pub(crate) output_dir: Option<&'a Utf8Path>,
    pub(crate) key_policy: KeyPolicy,
    pub(crate) distances: CoverageDistances,
    pub(crate) licences: &'a Dataset<TabularRecord>,
    pub(crate) renderer: &'a dyn Renderer,
}

/// What a successful region run produced.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RegionReport {
    pub(crate) region: String,
    pub(crate) output: Utf8PathBuf,
    pub(crate) layers: usize,
    pub(crate) availability: DatasetAvailability,
}

struct RegionData {
    boundary: Vec<GeoPolygon>,
    subdivisions: Vec<GeoPolygon>,
    primary: Vec<GeoPoint>,
    secondary: Vec<GeoPoint>,
    anchors: Vec<GeoPoint>,
    density: Vec<DensityCell>,
    infrastructure: Vec<GeoPoint>,
    overlays: Vec<Overlay>,
}

/// Load the licence table named in the configuration, if any.
pub(crate) fn load_licences(path: Option<&Utf8Path>) -> Result<Dataset<TabularRecord>, LoadError> {
    let Some(path) = path else {
        info!("No licence table configured; subdivision popups stay empty");
        return Ok(Dataset::Absent(AbsenceReason::NotConfigured));
    };
    load_tabular(&DataSource::new("CBRS licences", path), Requirement::Optional)
}

/// Generate and write the map of one region.
pub(crate) fn generate_region(
    bundle: &RegionBundle,
    context: &RegionContext<'_>,
) -> Result<RegionReport, RegionError> {
    if !beadmap_fs::dir_is_dir(bundle.root()).unwrap_or(false) {
        return Err(RegionError::MissingRegion {
            path: bundle.root().to_owned(),
        });
    }
    let data = load_region(bundle)?;
    let center = view_center(&data.boundary).ok_or_else(|| RegionError::NoBoundaryGeometry {
        region: bundle.name().to_owned(),
    })?;
    let licences = join_licences(bundle.name(), &data.subdivisions, context);
    let (layers, availability) = compose_region(data, licences.as_ref(), context.distances);

    let layer_count = layers.len();
    let document = MapDocument::new(
        format!("{} BEAD Map with FCC Towers", bundle.name()),
        center,
        layers,
    );
    let html = context.renderer.render(&document)?;
    let output = bundle.output_path(context.output_dir);
    write_artifact(&output, html.as_bytes())?;
    info!("Wrote {layer_count} layers for {} to {output}", bundle.name());
    Ok(RegionReport {
        region: bundle.name().to_owned(),
        output,
        layers: layer_count,
        availability,
    })
}

fn load_region(bundle: &RegionBundle) -> Result<RegionData, RegionError> {
    let boundary = load_polygons(&bundle.boundary(), Requirement::Required)?.into_items();
    if boundary.is_empty() {
        return Err(RegionError::NoBoundaryGeometry {
            region: bundle.name().to_owned(),
        });
    }
    let subdivisions = load_polygons(&bundle.subdivisions(), Requirement::Required)?.into_items();
    let primary = load_points(&bundle.primary(), Requirement::Required)?.into_items();
    let density = load_density_cells(&bundle.density_grid(), Requirement::Required)?.into_items();
    let secondary = load_points(&bundle.secondary(), Requirement::Optional)?.into_items();
    let anchors = load_points(&bundle.anchors(), Requirement::Optional)?.into_items();

    let infrastructure = match bundle.infrastructure() {
        Ok(Some(source)) => load_infrastructure(&source, Requirement::Optional)?.into_items(),
        Ok(None) => {
            warn!("No infrastructure extract found for {}", bundle.name());
            Vec::new()
        }
        Err(err) => {
            warn!("Skipped infrastructure for {}: {err}", bundle.name());
            Vec::new()
        }
    };

    Ok(RegionData {
        boundary,
        subdivisions,
        primary,
        secondary,
        anchors,
        density,
        infrastructure,
        overlays: load_overlays(bundle)?,
    })
}

fn load_overlays(bundle: &RegionBundle) -> Result<Vec<Overlay>, RegionError> {
    let mut overlays = Vec::new();
    match bundle.operator_overlays() {
        Ok(sources) => {
            for source in sources {
                let features = load_polygons(&source, Requirement::Optional)?.into_items();
                overlays.push(Overlay::operator(&source.dataset, features));
            }
        }
        Err(err) => warn!("Skipped operator overlays for {}: {err}", bundle.name()),
    }
    for source in bundle.fixed_overlays() {
        let features = load_polygons(&source, Requirement::Optional)?.into_items();
        overlays.push(Overlay::fixed(
            &source.dataset,
            fixed_overlay_color(&source.dataset),
            features,
        ));
    }
    Ok(overlays)
}

/// Colour of a fixed overlay.
pub(crate) fn fixed_overlay_color(name: &str) -> Color {
    match name {
        "CCI DSL" => Color::named("#FF6B35"),
        "CCI Fiber" => Color::named("#4ECDC4"),
        other => overlay_color(other),
    }
}

fn join_licences(
    region: &str,
    subdivisions: &[GeoPolygon],
    context: &RegionContext<'_>,
) -> Option<JoinReport> {
    if !context.licences.is_available() {
        return None;
    }
    let Some(abbreviation) = region_abbreviation(region) else {
        warn!("No state abbreviation for {region}; skipping the licence join");
        return None;
    };
    let records = filter_by_state(context.licences.items().to_vec(), abbreviation);
    let index = RegionIndex::build(subdivisions, context.key_policy);
    let report = join(&records, LICENCE_KEY_FIELD, &index);
    info!(
        "Joined {} of {} licence records for {region}",
        report.grouped(),
        records.len()
    );
    Some(report)
}

fn compose_region(
    data: RegionData,
    licences: Option<&JoinReport>,
    distances: CoverageDistances,
) -> (Vec<LayerSpec>, DatasetAvailability) {
    let density = aggregate(&data.density);
    if density.unbucketed > 0 {
        warn!("{} density cells fall outside every bucket", density.unbucketed);
    }
    let infrastructure = group_by_category(data.infrastructure);
    for category in Category::ALL {
        let count = infrastructure.get(category).len();
        if count > 0 {
            info!(
                "{count} infrastructure points classified as {}",
                category.group_name()
            );
        }
    }
    let input = CompositionInput {
        boundary: &data.boundary,
        subdivisions: &data.subdivisions,
        licences,
        primary: &data.primary,
        secondary: &data.secondary,
        anchors: &data.anchors,
        density: &density,
        infrastructure: &infrastructure,
        distances,
        overlays: &data.overlays,
    };
    (compose(&input), input.availability())
}
