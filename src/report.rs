// src/report.rs

//! Status reporting: the observable stderr contract.
//!
//! Everything user-visible about a run flows through [`Reporter`]:
//! validation diagnostics, the `-v` job table, and one completion line per
//! job. Tests capture the output by constructing a reporter over a buffer.

use std::io::{self, Stderr, Write};
use std::path::Path;

use crate::check::CheckedJob;

/// Writes the status-line contract to its sink (stderr in production).
#[derive(Debug)]
pub struct Reporter<W> {
    out: W,
}

impl Reporter<Stderr> {
    pub fn stderr() -> Self {
        Reporter { out: io::stderr() }
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Reporter { out }
    }

    /// Consume the reporter and hand back its sink (used by tests).
    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn unreadable_input(&mut self, path: &Path) {
        let _ = writeln!(
            self.out,
            "Unable to open \"{}\" for reading",
            path.display()
        );
    }

    pub fn unwritable_output(&mut self, path: &Path) {
        let _ = writeln!(
            self.out,
            "Unable to open \"{}\" for writing",
            path.display()
        );
    }

    /// `name` is the pipe name without its `@` prefix.
    pub fn invalid_pipe(&mut self, name: &str) {
        let _ = writeln!(self.out, "Invalid pipe usage \"{name}\"");
    }

    /// One `index:program:input:output:timeout[:arg]...` line per enabled
    /// job, in job order. `index` is 1-based.
    pub fn job_table(&mut self, jobs: &[CheckedJob]) {
        for (idx, job) in jobs.iter().enumerate() {
            if !job.enabled {
                continue;
            }
            let _ = write!(
                self.out,
                "{}:{}:{}:{}:{}",
                idx + 1,
                job.spec.program,
                job.spec.input,
                job.spec.output,
                job.spec.timeout_secs()
            );
            for arg in &job.spec.args {
                let _ = write!(self.out, ":{arg}");
            }
            let _ = writeln!(self.out);
        }
    }

    /// `index` is 1-based.
    pub fn job_exited(&mut self, index: usize, status: i32) {
        let _ = writeln!(self.out, "Job {index} exited with status {status}");
    }

    /// `index` is 1-based.
    pub fn job_signaled(&mut self, index: usize, signal: i32) {
        let _ = writeln!(self.out, "Job {index} terminated with signal {signal}");
    }
}
