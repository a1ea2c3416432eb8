//! Region bundles laid out by naming convention.
//!
//! A region lives in `<data-dir>/<Region>/` and names each file after the
//! region, for example `Delaware/Delaware State Outline.geojson`. Four files
//! are required; the rest are optional and may be missing.

use beadmap_fs::{EntryKind, dir_is_dir, file_is_file, list_dir};
use camino::{Utf8Path, Utf8PathBuf};
use log::{info, warn};

use crate::{DataSource, LoadError};

/// Directory under a region holding generated artefacts.
pub const RESULTS_DIR: &str = "Results";
/// Fixed overlay files looked up in every region directory, in layer order.
pub const FIXED_OVERLAYS: [(&str, &str); 2] =
    [("CCI DSL", "CCI DSL.geojson"), ("CCI Fiber", "CCI Fiber.geojson")];

const INFRASTRUCTURE_SUFFIXES: [&str; 4] = [
    "FCC Antenna Structures.sqlite",
    "Antenna Structures.sqlite",
    "Towers.sqlite",
    "FCC Towers.sqlite",
];
const INFRASTRUCTURE_HINTS: [&str; 3] = ["antenna", "tower", "fcc"];
const OVERLAY_FOLDERS: [&str; 2] = ["WISPs Hex Dissolved", "WISPs Dissolved"];

/// The files making up one region's inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionBundle {
    name: String,
    root: Utf8PathBuf,
}

/// Which optional inputs a bundle provides, for listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleInventory {
    /// Second-round eligibility file exists.
    pub secondary: bool,
    /// Community anchor file exists.
    pub anchors: bool,
    /// Infrastructure extract, when one was found.
    pub infrastructure: Option<Utf8PathBuf>,
    /// Number of operator overlay files.
    pub operator_overlays: usize,
    /// Number of fixed overlay files present.
    pub fixed_overlays: usize,
}

impl RegionBundle {
    /// Bundle for `name` under `data_dir`.
    #[must_use]
    pub fn new(data_dir: &Utf8Path, name: &str) -> Self {
        Self {
            name: name.to_owned(),
            root: data_dir.join(name),
        }
    }

    /// Region name, as used in file names.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Region directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn named(&self, dataset: &str, suffix: &str) -> DataSource {
        DataSource::new(dataset, self.root.join(format!("{} {suffix}", self.name)))
    }

    /// Boundary outline.
    #[must_use]
    pub fn boundary(&self) -> DataSource {
        self.named("State Outline", "State Outline.geojson")
    }

    /// Subdivision outlines.
    #[must_use]
    pub fn subdivisions(&self) -> DataSource {
        self.named("County Outline", "County Outline.geojson")
    }

    /// Primary eligibility points.
    #[must_use]
    pub fn primary(&self) -> DataSource {
        self.named("BEAD Eligible Locations", "BEAD Eligible Locations.geojson")
    }

    /// Density grid.
    #[must_use]
    pub fn density_grid(&self) -> DataSource {
        self.named("BEAD Grid Analysis Layer", "BEAD Grid Analysis Layer.geojson")
    }

    /// Second-round eligibility points.
    #[must_use]
    pub fn secondary(&self) -> DataSource {
        self.named(
            "BEAD Eligible Locations Round 2",
            "BEAD Eligible Locations Round 2.geojson",
        )
    }

    /// Community anchor institutions.
    #[must_use]
    pub fn anchors(&self) -> DataSource {
        self.named("BEAD Eligible CAIs", "BEAD Eligible CAIs.geojson")
    }

    /// The sources a region cannot be drawn without.
    #[must_use]
    pub fn required_sources(&self) -> [DataSource; 4] {
        [
            self.boundary(),
            self.subdivisions(),
            self.primary(),
            self.density_grid(),
        ]
    }

    /// Required sources that do not exist as regular files.
    #[must_use]
    pub fn missing_required(&self) -> Vec<DataSource> {
        self.required_sources()
            .into_iter()
            .filter(|source| !file_is_file(source.path()).unwrap_or(false))
            .collect()
    }

    /// Locate the infrastructure extract.
    ///
    /// The conventional names are tried first. Failing those, the first
    /// `.sqlite` file, in name order, whose name mentions an antenna, a tower
    /// or the FCC is used.
    ///
    /// # Errors
    /// Returns [`LoadError::ReadDirectory`] when the region directory cannot
    /// be listed.
    pub fn infrastructure(&self) -> Result<Option<DataSource>, LoadError> {
        for suffix in INFRASTRUCTURE_SUFFIXES {
            let source = self.named("FCC Antenna Structures", suffix);
            if file_is_file(source.path()).unwrap_or(false) {
                return Ok(Some(source));
            }
        }
        let fallback = files_in(&self.root)?.into_iter().find(|name| {
            let lower = name.to_lowercase();
            lower.ends_with(".sqlite") && INFRASTRUCTURE_HINTS.iter().any(|hint| lower.contains(hint))
        });
        Ok(fallback.map(|name| {
            info!("Using {name} as the infrastructure extract for {}", self.name);
            DataSource::new("FCC Antenna Structures", self.root.join(name))
        }))
    }

    /// Operator overlay files, one source per operator, sorted by name.
    ///
    /// The hex-dissolved folder is preferred over the plain dissolved one.
    /// Each source's dataset label is the file stem, which names the
    /// operator.
    ///
    /// # Errors
    /// Returns [`LoadError::ReadDirectory`] when the chosen folder cannot be
    /// listed.
    pub fn operator_overlays(&self) -> Result<Vec<DataSource>, LoadError> {
        let Some(folder) = self.overlay_folder() else {
            return Ok(Vec::new());
        };
        let sources = files_in(&folder)?
            .into_iter()
            .filter(|name| name.to_lowercase().ends_with(".geojson"))
            .map(|name| {
                let path = folder.join(&name);
                let stem = path.file_stem().unwrap_or(name.as_str()).to_owned();
                DataSource::new(&stem, path)
            })
            .collect();
        Ok(sources)
    }

    fn overlay_folder(&self) -> Option<Utf8PathBuf> {
        OVERLAY_FOLDERS
            .iter()
            .map(|suffix| self.root.join(format!("{} {suffix}", self.name)))
            .find(|path| dir_is_dir(path).unwrap_or(false))
    }

    /// Fixed overlay sources, in layer order, whether or not they exist.
    #[must_use]
    pub fn fixed_overlays(&self) -> Vec<DataSource> {
        FIXED_OVERLAYS
            .iter()
            .map(|(label, file)| DataSource::new(label, self.root.join(file)))
            .collect()
    }

    /// Where the region's artefact is written.
    ///
    /// Defaults to `<Region>/Results/`; `output_dir` replaces that directory.
    #[must_use]
    pub fn output_path(&self, output_dir: Option<&Utf8Path>) -> Utf8PathBuf {
        let file = format!("{} BEAD Map with FCC Towers.html", self.name);
        output_dir.map_or_else(
            || self.root.join(RESULTS_DIR).join(&file),
            |dir| dir.join(&file),
        )
    }

    /// Summarise which optional inputs exist.
    ///
    /// # Errors
    /// Propagates directory listing failures.
    pub fn inventory(&self) -> Result<BundleInventory, LoadError> {
        let exists = |source: &DataSource| file_is_file(source.path()).unwrap_or(false);
        Ok(BundleInventory {
            secondary: exists(&self.secondary()),
            anchors: exists(&self.anchors()),
            infrastructure: self.infrastructure()?.map(|source| source.path),
            operator_overlays: self.operator_overlays()?.len(),
            fixed_overlays: self.fixed_overlays().iter().filter(|s| exists(s)).count(),
        })
    }
}

fn files_in(dir: &Utf8Path) -> Result<Vec<String>, LoadError> {
    let entries = list_dir(dir).map_err(|source| LoadError::ReadDirectory {
        path: dir.to_owned(),
        source,
    })?;
    Ok(entries
        .into_iter()
        .filter(|entry| entry.kind == EntryKind::File)
        .map(|entry| entry.name)
        .collect())
}

/// List the complete region bundles under `data_dir`, sorted by name.
///
/// Sub-directories lacking any required file are logged and skipped.
///
/// # Errors
/// Returns [`LoadError::ReadDirectory`] when `data_dir` cannot be listed.
pub fn discover_regions(data_dir: &Utf8Path) -> Result<Vec<RegionBundle>, LoadError> {
    let entries = list_dir(data_dir).map_err(|source| LoadError::ReadDirectory {
        path: data_dir.to_owned(),
        source,
    })?;
    let mut bundles = Vec::new();
    for entry in entries {
        if entry.kind != EntryKind::Directory {
            continue;
        }
        let bundle = RegionBundle::new(data_dir, &entry.name);
        let missing = bundle.missing_required();
        if missing.is_empty() {
            bundles.push(bundle);
        } else {
            let labels: Vec<&str> = missing.iter().map(|s| s.dataset.as_str()).collect();
            warn!("Skipping {}: missing {}", entry.name, labels.join(", "));
        }
    }
    bundles.sort_by(|a, b| a.name.cmp(&b.name));
    info!("Discovered {} complete regions in {data_dir}", bundles.len());
    Ok(bundles)
}
