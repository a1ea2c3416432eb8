//! Sequential batch runner with failure isolation and cancellation.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use beadmap_data::RegionBundle;
use log::{error, info, warn};

use crate::pipeline::RegionReport;
use crate::{CliError, RegionError};

/// A region that did not produce a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RegionFailure {
    pub(crate) region: String,
    pub(crate) reason: String,
}

/// Tally of one batch run.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BatchSummary {
    pub(crate) succeeded: Vec<RegionReport>,
    pub(crate) failures: Vec<RegionFailure>,
    pub(crate) total: usize,
    pub(crate) elapsed: Duration,
    pub(crate) cancelled: bool,
}

impl BatchSummary {
    /// Regions that ran to completion or failure.
    pub(crate) fn processed(&self) -> usize {
        self.succeeded.len() + self.failures.len()
    }

    /// Mean wall time per processed region; zero when nothing ran.
    pub(crate) fn mean_per_region(&self) -> Duration {
        match u32::try_from(self.processed()) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(count) => self.elapsed / count,
        }
    }

    pub(crate) fn write_report(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Regions processed: {}/{}", self.processed(), self.total)?;
        writeln!(out, "Succeeded: {}", self.succeeded.len())?;
        writeln!(out, "Failed: {}", self.failures.len())?;
        writeln!(out, "Total time: {:.2}s", self.elapsed.as_secs_f64())?;
        writeln!(
            out,
            "Average per map: {:.2}s",
            self.mean_per_region().as_secs_f64()
        )?;
        if self.cancelled {
            writeln!(out, "Cancelled: yes")?;
        }
        for report in &self.succeeded {
            writeln!(out, "  ok   {} -> {}", report.region, report.output)?;
        }
        for failure in &self.failures {
            writeln!(out, "  fail {}: {}", failure.region, failure.reason)?;
        }
        Ok(())
    }

    /// Convert the tally into the process outcome.
    pub(crate) fn into_result(self) -> Result<(), CliError> {
        if self.cancelled {
            return Err(CliError::Cancelled {
                processed: self.processed(),
                total: self.total,
            });
        }
        if !self.failures.is_empty() {
            return Err(CliError::RegionsFailed {
                failed: self.failures.len(),
                total: self.total,
            });
        }
        Ok(())
    }
}

/// Runs regions one after another until done or cancelled.
#[derive(Debug, Clone)]
pub(crate) struct BatchRunner {
    cancel: Arc<AtomicBool>,
}

impl BatchRunner {
    pub(crate) fn new(cancel: Arc<AtomicBool>) -> Self {
        Self { cancel }
    }

    /// Process every bundle with `generate`, checking for cancellation before
    /// each one. A failing region is recorded and the batch moves on.
    pub(crate) fn run<F>(&self, bundles: &[RegionBundle], mut generate: F) -> BatchSummary
    where
        F: FnMut(&RegionBundle) -> Result<RegionReport, RegionError>,
    {
        let started = Instant::now();
        let total = bundles.len();
        let mut summary = BatchSummary {
            succeeded: Vec::new(),
            failures: Vec::new(),
            total,
            elapsed: Duration::ZERO,
            cancelled: false,
        };
        for (index, bundle) in bundles.iter().enumerate() {
            if self.cancel.load(Ordering::SeqCst) {
                warn!(
                    "Interrupted; skipping the remaining {} regions",
                    total - index
                );
                summary.cancelled = true;
                break;
            }
            info!("[{}/{total}] {}", index + 1, bundle.name());
            let region_started = Instant::now();
            match generate(bundle) {
                Ok(report) => {
                    info!(
                        "{} finished in {:.2}s",
                        bundle.name(),
                        region_started.elapsed().as_secs_f64()
                    );
                    summary.succeeded.push(report);
                }
                Err(err) => {
                    error!("{} failed: {err}", bundle.name());
                    summary.failures.push(RegionFailure {
                        region: bundle.name().to_owned(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        summary.elapsed = started.elapsed();
        summary
    }
}
