// src/check.rs

//! Job validation: can each job actually run, and is every named pipe used
//! by exactly one writer and one reader?
//!
//! Validation has three passes:
//! 1. open plain-file inputs/outputs, disabling jobs whose files fail
//! 2. disable every job referencing a pipe that breaks the
//!    one-writer/one-reader contract
//! 3. cascade: a job linked through a surviving pipe to a disabled partner
//!    is disabled too, transitively
//!
//! Only after all passes: if nothing is left enabled, the run aborts.

use std::fs::File;
use std::io::Write;

use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Bfs;
use tracing::debug;

use crate::errors::{JobflowError, Result};
use crate::jobfile::{IoSpec, JobSpec};
use crate::pipes::PipeTable;
use crate::report::Reporter;

/// A job descriptor plus validation state.
///
/// `enabled`, once cleared, stays cleared for the lifetime of the run; the
/// launcher never spawns a disabled job. File handles opened during
/// validation are carried through to launch, so the descriptors wired into
/// the child are the ones that were validated.
#[derive(Debug)]
pub struct CheckedJob {
    pub spec: JobSpec,
    pub enabled: bool,
    pub stdin_file: Option<File>,
    pub stdout_file: Option<File>,
}

impl CheckedJob {
    /// A fresh, enabled job with no files opened yet.
    pub fn new(spec: JobSpec) -> Self {
        Self {
            spec,
            enabled: true,
            stdin_file: None,
            stdout_file: None,
        }
    }
}

/// Run all validation passes over the parsed job list.
///
/// Emits one diagnostic per failing file and per non-conforming pipe, and
/// returns [`JobflowError::NoRunnableJobs`] if no job survives.
pub fn check_jobs<W: Write>(
    specs: Vec<JobSpec>,
    reporter: &mut Reporter<W>,
) -> Result<Vec<CheckedJob>> {
    let mut jobs: Vec<CheckedJob> = specs.into_iter().map(CheckedJob::new).collect();

    open_job_files(&mut jobs, reporter);

    let table = PipeTable::collect(jobs.iter().map(|j| &j.spec));
    let conforming = apply_pipe_contract(&mut jobs, &table, reporter);
    cascade_disabled(&mut jobs, &table, &conforming);

    let runnable = jobs.iter().filter(|j| j.enabled).count();
    debug!(total = jobs.len(), runnable, "validation finished");

    if runnable == 0 {
        return Err(JobflowError::NoRunnableJobs);
    }
    Ok(jobs)
}

/// Open plain-file inputs (read) and outputs (create/truncate/write).
///
/// A failure disables only the owning job; pipe partners are handled by the
/// cascade pass.
fn open_job_files<W: Write>(jobs: &mut [CheckedJob], reporter: &mut Reporter<W>) {
    for job in jobs.iter_mut() {
        if let IoSpec::File(path) = &job.spec.input {
            match File::open(path) {
                Ok(file) => job.stdin_file = Some(file),
                Err(_) => {
                    reporter.unreadable_input(path);
                    job.enabled = false;
                }
            }
        }
        if let IoSpec::File(path) = &job.spec.output {
            match File::create(path) {
                Ok(file) => job.stdout_file = Some(file),
                Err(_) => {
                    reporter.unwritable_output(path);
                    job.enabled = false;
                }
            }
        }
    }
}

/// Disable every job referencing a pipe with writer-count != 1 or
/// reader-count != 1, reporting each such pipe once.
///
/// Returns a per-entry flag marking the pipes that conform; only those take
/// part in the cascade pass.
pub fn apply_pipe_contract<W: Write>(
    jobs: &mut [CheckedJob],
    table: &PipeTable,
    reporter: &mut Reporter<W>,
) -> Vec<bool> {
    let mut conforming = Vec::with_capacity(table.len());

    for pipe in table.iter() {
        if pipe.conforms() {
            conforming.push(true);
            continue;
        }

        reporter.invalid_pipe(&pipe.name);
        for &job in pipe.writers.iter().chain(pipe.readers.iter()) {
            jobs[job].enabled = false;
        }
        conforming.push(false);
    }

    conforming
}

/// Disable both endpoints of any conforming pipe whose partner is disabled,
/// transitively.
///
/// Jobs and conforming pipes form an undirected link graph; the fixed point
/// of the pairwise rule is exactly "every job reachable from a disabled job
/// is disabled", so one reachability sweep suffices.
pub fn cascade_disabled(jobs: &mut [CheckedJob], table: &PipeTable, conforming: &[bool]) {
    let mut links: UnGraphMap<usize, ()> = UnGraphMap::new();
    for job in 0..jobs.len() {
        links.add_node(job);
    }
    for (pipe, ok) in table.iter().zip(conforming) {
        // A job piping to itself adds nothing to the cascade.
        if *ok && pipe.writers[0] != pipe.readers[0] {
            links.add_edge(pipe.writers[0], pipe.readers[0], ());
        }
    }

    let seeds: Vec<usize> = jobs
        .iter()
        .enumerate()
        .filter(|(_, job)| !job.enabled)
        .map(|(idx, _)| idx)
        .collect();

    for seed in seeds {
        let mut bfs = Bfs::new(&links, seed);
        while let Some(job) = bfs.next(&links) {
            if jobs[job].enabled {
                debug!(job = job + 1, "disabled by cascade from linked job");
                jobs[job].enabled = false;
            }
        }
    }
}
