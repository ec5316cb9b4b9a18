// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};

/// Command-line arguments for `jobflow`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "jobflow",
    version,
    about = "Run jobs wired together by named pipes and files.",
    long_about = None
)]
pub struct CliArgs {
    /// Print a table of the runnable jobs before execution.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `JOBFLOW_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// One or more jobfiles, processed in order.
    #[arg(value_name = "JOBFILE", required = true)]
    pub jobfiles: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Parse the command line, exiting on failure.
///
/// `--help` and `--version` exit 0; any malformed invocation prints the
/// one-line usage string and exits with the reserved usage code.
pub fn parse() -> CliArgs {
    match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            let _ = err.print();
            std::process::exit(0);
        }
        Err(_) => {
            eprintln!("Usage: jobflow [-v] jobfile [jobfile ...]");
            std::process::exit(1);
        }
    }
}
