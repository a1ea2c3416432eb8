//! Error types emitted by the beadmap CLI.
//!
//! Keep these error types reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use beadmap_core::{CoverageDistancesError, UnknownKeyPolicy};
use beadmap_data::LoadError;
use beadmap_fs::ArtifactWriteError;
use beadmap_render::RenderError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors emitted by the beadmap CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The join key policy is not recognised.
    #[error(transparent)]
    InvalidJoinKeyPolicy(#[from] UnknownKeyPolicy),
    /// Coverage distances are not positive and ordered.
    #[error(transparent)]
    InvalidCoverageDistances(#[from] CoverageDistancesError),
    /// The data directory does not exist or is not a directory.
    #[error("data directory {path:?} does not exist or is not a directory")]
    MissingDataDirectory { path: Utf8PathBuf },
    /// The data directory could not be inspected due to an IO error.
    #[error("failed to inspect data directory {path:?}: {source}")]
    InspectDataDirectory {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Listing regions or reading the licence table failed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Installing the interrupt handler failed.
    #[error("failed to install interrupt handler: {0}")]
    InterruptHandler(#[from] ctrlc::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// At least one region failed.
    #[error("{failed} of {total} regions failed")]
    RegionsFailed { failed: usize, total: usize },
    /// The batch was interrupted before every region was processed.
    #[error("interrupted after {processed} of {total} regions")]
    Cancelled { processed: usize, total: usize },
}

/// Errors that fail a single region without stopping the batch.
#[derive(Debug, Error)]
pub enum RegionError {
    /// The region directory does not exist.
    #[error("region directory {path:?} does not exist")]
    MissingRegion { path: Utf8PathBuf },
    /// A dataset could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The boundary yields no polygon to centre the map on.
    #[error("boundary of {region} has no usable geometry")]
    NoBoundaryGeometry { region: String },
    /// The map document could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// The artefact could not be written.
    #[error(transparent)]
    Write(#[from] ArtifactWriteError),
}
