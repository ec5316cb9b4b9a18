// src/lib.rs

pub mod check;
pub mod cli;
pub mod errors;
pub mod jobfile;
pub mod logging;
pub mod pipes;
pub mod report;
pub mod run;
pub mod signals;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::errors::Result;
use crate::report::Reporter;
use crate::signals::ShutdownFlag;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - jobfile loading
/// - validation (file opening, pipe contract, cascade)
/// - the verbose job table
/// - pipe allocation + child spawning
/// - the supervising poll loop and shutdown signal handling
pub async fn run(args: CliArgs) -> Result<()> {
    let specs = jobfile::load_jobfiles(&args.jobfiles)?;
    debug!(jobs = specs.len(), "jobfiles loaded");

    let mut reporter = Reporter::stderr();
    let jobs = check::check_jobs(specs, &mut reporter)?;

    if args.verbose {
        reporter.job_table(&jobs);
    }

    let shutdown = ShutdownFlag::new();
    signals::install_listeners(&shutdown)?;

    let launched = run::launch_jobs(jobs)?;
    info!(jobs = launched.len(), "launched; supervising until completion");

    run::supervise(launched, shutdown, &mut reporter).await
}
