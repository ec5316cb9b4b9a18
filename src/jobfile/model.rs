// src/jobfile/model.rs

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Where a job's stdin comes from, or where its stdout goes.
///
/// The jobfile forms are:
/// - `-` — inherit the corresponding stream from the orchestrator
/// - `@name` — a named pipe shared with exactly one sibling job
/// - anything else — a file path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoSpec {
    Inherit,
    Pipe(String),
    File(PathBuf),
}

impl IoSpec {
    /// Parse the textual jobfile form.
    pub fn parse(field: &str) -> Self {
        if field == "-" {
            IoSpec::Inherit
        } else if let Some(name) = field.strip_prefix('@') {
            IoSpec::Pipe(name.to_string())
        } else {
            IoSpec::File(PathBuf::from(field))
        }
    }

    /// Pipe name (without the `@`) if this spec references a named pipe.
    pub fn pipe_name(&self) -> Option<&str> {
        match self {
            IoSpec::Pipe(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for IoSpec {
    /// Round-trips back to the jobfile form (used by the verbose table).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoSpec::Inherit => write!(f, "-"),
            IoSpec::Pipe(name) => write!(f, "@{name}"),
            IoSpec::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One parsed job descriptor, in jobfile order.
#[derive(Debug, Clone)]
pub struct JobSpec {
    /// Program to execute, resolved via `PATH` like `execvp` would.
    pub program: String,
    pub input: IoSpec,
    pub output: IoSpec,
    /// Wall-clock timeout; `None` means the job may run forever.
    pub timeout: Option<Duration>,
    /// Extra arguments passed after the program name, verbatim.
    pub args: Vec<String>,
}

impl JobSpec {
    /// Timeout in whole seconds as printed by the verbose table (0 = none).
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.map(|t| t.as_secs()).unwrap_or(0)
    }
}
