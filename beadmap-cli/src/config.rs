//! Layered configuration for the `generate` and `regions` subcommands.

use beadmap_core::{CoverageDistances, KeyPolicy};
use beadmap_data::{RegionBundle, discover_regions};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::CliError;

pub(crate) const ARG_DATA_DIR: &str = "data-dir";
pub(crate) const ARG_LICENCE_FILE: &str = "licence-file";
pub(crate) const ARG_OUTPUT_DIR: &str = "output-dir";
pub(crate) const ARG_JOIN_KEY_POLICY: &str = "join-key-policy";
pub(crate) const ARG_NEAR_MILES: &str = "near-miles";
pub(crate) const ARG_FAR_MILES: &str = "far-miles";
pub(crate) const ENV_GENERATE_DATA_DIR: &str = "BEADMAP_CMDS_GENERATE_DATA_DIR";
pub(crate) const ENV_REGIONS_DATA_DIR: &str = "BEADMAP_CMDS_REGIONS_DATA_DIR";

/// CLI arguments for the `generate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Generate one map per region. Regions are sub-directories \
                 of the data directory named after the state they cover. \
                 Paths can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Generate region maps"
)]
#[ortho_config(prefix = "BEADMAP")]
pub(crate) struct GenerateArgs {
    /// Regions to process; every complete region when omitted.
    #[arg(value_name = "region")]
    #[serde(default)]
    pub(crate) regions: Vec<String>,
    /// Directory holding one sub-directory per region.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// Nationwide licence table (XLSX, XLS or CSV).
    #[arg(long = ARG_LICENCE_FILE, value_name = "path")]
    #[serde(default)]
    pub(crate) licence_file: Option<Utf8PathBuf>,
    /// Write every map here instead of each region's `Results` directory.
    #[arg(long = ARG_OUTPUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) output_dir: Option<Utf8PathBuf>,
    /// How licence rows are matched to subdivisions: `exact` or `normalized`.
    #[arg(long = ARG_JOIN_KEY_POLICY, value_name = "policy")]
    #[serde(default)]
    pub(crate) join_key_policy: Option<String>,
    /// Radius of the inner coverage ring in miles.
    #[arg(long = ARG_NEAR_MILES, value_name = "miles")]
    #[serde(default)]
    pub(crate) near_miles: Option<f64>,
    /// Radius of the outer coverage ring in miles.
    #[arg(long = ARG_FAR_MILES, value_name = "miles")]
    #[serde(default)]
    pub(crate) far_miles: Option<f64>,
}

impl GenerateArgs {
    pub(crate) fn into_config(self) -> Result<GenerateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        GenerateConfig::try_from(merged)
    }
}

/// Resolved `generate` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GenerateConfig {
    pub(crate) data_dir: Utf8PathBuf,
    pub(crate) regions: Vec<String>,
    pub(crate) licence_file: Option<Utf8PathBuf>,
    pub(crate) output_dir: Option<Utf8PathBuf>,
    pub(crate) key_policy: KeyPolicy,
    pub(crate) distances: CoverageDistances,
}

impl GenerateConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_directory(&self.data_dir)
    }

    /// The requested regions, or every complete region when none were named.
    pub(crate) fn bundles(&self) -> Result<Vec<RegionBundle>, CliError> {
        if self.regions.is_empty() {
            return Ok(discover_regions(&self.data_dir)?);
        }
        Ok(self
            .regions
            .iter()
            .map(|name| RegionBundle::new(&self.data_dir, name.trim()))
            .collect())
    }
}

impl TryFrom<GenerateArgs> for GenerateConfig {
    type Error = CliError;

    fn try_from(args: GenerateArgs) -> Result<Self, Self::Error> {
        let data_dir = args.data_dir.ok_or(CliError::MissingArgument {
            field: ARG_DATA_DIR,
            env: ENV_GENERATE_DATA_DIR,
        })?;
        let key_policy = args
            .join_key_policy
            .as_deref()
            .map(str::parse::<KeyPolicy>)
            .transpose()?
            .unwrap_or_default();
        let defaults = CoverageDistances::default();
        let distances = CoverageDistances::new(
            args.near_miles.unwrap_or(defaults.near()),
            args.far_miles.unwrap_or(defaults.far()),
        )?;
        Ok(Self {
            data_dir,
            regions: args.regions,
            licence_file: args.licence_file,
            output_dir: args.output_dir,
            key_policy,
            distances,
        })
    }
}

/// CLI arguments for the `regions` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "List complete regions and their optional datasets")]
#[ortho_config(prefix = "BEADMAP")]
pub(crate) struct RegionsArgs {
    /// Directory holding one sub-directory per region.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
}

impl RegionsArgs {
    pub(crate) fn into_data_dir(self) -> Result<Utf8PathBuf, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        let data_dir = merged.data_dir.ok_or(CliError::MissingArgument {
            field: ARG_DATA_DIR,
            env: ENV_REGIONS_DATA_DIR,
        })?;
        require_directory(&data_dir)?;
        Ok(data_dir)
    }
}

fn require_directory(path: &Utf8Path) -> Result<(), CliError> {
    match beadmap_fs::dir_is_dir(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::MissingDataDirectory {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::InspectDataDirectory {
            path: path.to_path_buf(),
            source,
        }),
    }
}
