//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use std::process::ExitCode;

use beadmap_cli::CliError;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match beadmap_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            log::error!("beadmap: {err}");
            ExitCode::FAILURE
        }
    }
}
