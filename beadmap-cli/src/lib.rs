//! Command-line interface for generating BEAD planning maps.
#![forbid(unsafe_code)]

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use beadmap_data::RegionBundle;
use beadmap_render::LeafletRenderer;
use clap::{Parser, Subcommand};
use log::info;

mod batch;
mod config;
mod error;
mod pipeline;

use batch::BatchRunner;
use config::{GenerateArgs, RegionsArgs};
use pipeline::{RegionContext, generate_region, load_licences};

pub use error::{CliError, RegionError};

/// Run the beadmap CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Generate(args) => {
            let cancel = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&cancel);
            ctrlc::set_handler(move || {
                info!("Interrupt received; finishing the current region");
                flag.store(true, Ordering::SeqCst);
            })?;
            run_generate(args, &cancel, &mut stdout)
        }
        Command::Regions(args) => run_regions(args, &mut stdout),
    }
}

fn run_generate(
    args: GenerateArgs,
    cancel: &Arc<AtomicBool>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let bundles = config.bundles()?;
    info!(
        "Generating {} region maps from {}",
        bundles.len(),
        config.data_dir
    );

    let licences = load_licences(config.licence_file.as_deref())?;
    let renderer = LeafletRenderer::new();
    let context = RegionContext {
        output_dir: config.output_dir.as_deref(),
        key_policy: config.key_policy,
        distances: config.distances,
        licences: &licences,
        renderer: &renderer,
    };
    let summary = BatchRunner::new(Arc::clone(cancel))
        .run(&bundles, |bundle| generate_region(bundle, &context));
    summary.write_report(out).map_err(CliError::WriteOutput)?;
    summary.into_result()
}

fn run_regions(args: RegionsArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let data_dir = args.into_data_dir()?;
    let bundles = beadmap_data::discover_regions(&data_dir)?;
    for bundle in &bundles {
        write_inventory(bundle, out)?;
    }
    Ok(())
}

fn write_inventory(bundle: &RegionBundle, out: &mut dyn Write) -> Result<(), CliError> {
    let inventory = bundle.inventory()?;
    let flag = |present: bool| if present { "yes" } else { "no" };
    let infrastructure = inventory
        .infrastructure
        .as_ref()
        .and_then(|path| path.file_name())
        .unwrap_or("none");
    writeln!(
        out,
        "{}\tround 2: {}\tanchors: {}\tinfrastructure: {}\toperator overlays: {}\tfixed overlays: {}",
        bundle.name(),
        flag(inventory.secondary),
        flag(inventory.anchors),
        infrastructure,
        inventory.operator_overlays,
        inventory.fixed_overlays,
    )
    .map_err(CliError::WriteOutput)
}

#[derive(Debug, Parser)]
#[command(
    name = "beadmap",
    about = "Generate interactive BEAD eligibility maps per region",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate one map per region.
    Generate(GenerateArgs),
    /// List complete regions and their optional datasets.
    Regions(RegionsArgs),
}

#[cfg(test)]
mod tests;
