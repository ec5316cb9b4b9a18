// src/run/launch.rs

//! Pipe allocation and child process spawning.

use std::os::fd::OwnedFd;
use std::process::Stdio;
use std::time::{Duration, Instant};

use anyhow::{Context, anyhow};
use nix::fcntl::OFlag;
use nix::unistd::pipe2;
use tokio::process::Command;
use tracing::{debug, info};

use crate::check::CheckedJob;
use crate::errors::Result;
use crate::jobfile::IoSpec;
use crate::pipes::PipeTable;
use crate::run::supervise::JobState;

/// A job the supervisor is responsible for.
#[derive(Debug)]
pub struct LaunchedJob {
    /// 1-based index in the combined jobfile order, as used in status lines.
    pub index: usize,
    pub timeout: Option<Duration>,
    pub state: JobState,
}

/// One end of a job's standard stream wiring, owned until spawn.
///
/// Owning the descriptor here is what guarantees cleanup: it is either
/// consumed into the child's stdio or dropped (closed) when launching
/// finishes, on every path.
#[derive(Debug)]
enum IoEnd {
    Inherit,
    Owned(OwnedFd),
}

impl IoEnd {
    fn into_stdio(self) -> Stdio {
        match self {
            IoEnd::Inherit => Stdio::inherit(),
            IoEnd::Owned(fd) => Stdio::from(fd),
        }
    }
}

/// An enabled job waiting to be spawned, with its stream wiring.
#[derive(Debug)]
struct PendingJob {
    index: usize,
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
    stdin: Option<IoEnd>,
    stdout: Option<IoEnd>,
}

/// Allocate pipes and spawn a child for every enabled job.
///
/// Each distinct pipe name gets exactly one OS pipe, created close-on-exec:
/// a child only ever inherits the two descriptors duplicated onto its
/// stdin/stdout, and once this function returns the parent holds no pipe
/// descriptor at all — required for readers to see end-of-file when their
/// writer exits. A job whose program cannot be started is recorded as
/// [`JobState::SpawnFailed`] and never affects its siblings.
pub fn launch_jobs(jobs: Vec<CheckedJob>) -> Result<Vec<LaunchedJob>> {
    let mut pending = Vec::new();
    let mut enabled_specs = Vec::new();

    for (index, mut job) in jobs.into_iter().enumerate() {
        if !job.enabled {
            continue;
        }

        let stdin = match &job.spec.input {
            IoSpec::Inherit => Some(IoEnd::Inherit),
            IoSpec::File(_) => job.stdin_file.take().map(|f| IoEnd::Owned(f.into())),
            IoSpec::Pipe(_) => None,
        };
        let stdout = match &job.spec.output {
            IoSpec::Inherit => Some(IoEnd::Inherit),
            IoSpec::File(_) => job.stdout_file.take().map(|f| IoEnd::Owned(f.into())),
            IoSpec::Pipe(_) => None,
        };

        pending.push(PendingJob {
            index,
            program: job.spec.program.clone(),
            args: job.spec.args.clone(),
            timeout: job.spec.timeout,
            stdin,
            stdout,
        });
        enabled_specs.push(job.spec);
    }

    // One OS pipe per distinct surviving channel. Positions in this table
    // are positions within `pending`, since both were built from the same
    // enabled-job iteration.
    let table = PipeTable::collect(enabled_specs.iter());
    for pipe in table.iter() {
        let (&writer, &reader) = match (pipe.writers.as_slice(), pipe.readers.as_slice()) {
            ([w], [r]) => (w, r),
            _ => {
                return Err(anyhow!(
                    "pipe \"@{}\" survived validation without exactly one writer and one reader",
                    pipe.name
                )
                .into());
            }
        };

        let (read_end, write_end) = pipe2(OFlag::O_CLOEXEC)
            .with_context(|| format!("creating pipe \"@{}\"", pipe.name))?;
        pending[reader].stdin = Some(IoEnd::Owned(read_end));
        pending[writer].stdout = Some(IoEnd::Owned(write_end));
        debug!(
            pipe = %pipe.name,
            writer = pending[writer].index + 1,
            reader = pending[reader].index + 1,
            "allocated pipe"
        );
    }

    let mut launched = Vec::with_capacity(pending.len());
    for job in pending {
        let stdin = job
            .stdin
            .ok_or_else(|| anyhow!("job {} has no stdin wiring", job.index + 1))?;
        let stdout = job
            .stdout
            .ok_or_else(|| anyhow!("job {} has no stdout wiring", job.index + 1))?;

        let state = spawn_job(&job.program, &job.args, stdin, stdout, job.index);
        launched.push(LaunchedJob {
            index: job.index + 1,
            timeout: job.timeout,
            state,
        });
    }

    info!(jobs = launched.len(), "all children spawned");
    Ok(launched)
}

/// Spawn one child with its streams wired and stderr discarded.
///
/// The orchestrator's stderr carries orchestration diagnostics only, never
/// job output.
fn spawn_job(
    program: &str,
    args: &[String],
    stdin: IoEnd,
    stdout: IoEnd,
    index: usize,
) -> JobState {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(stdin.into_stdio())
        .stdout(stdout.into_stdio())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    match command.spawn() {
        Ok(child) => {
            debug!(job = index + 1, program = %program, pid = ?child.id(), "child spawned");
            JobState::Running {
                child,
                started: Instant::now(),
                graceful_sent: false,
            }
        }
        Err(err) => {
            debug!(job = index + 1, program = %program, error = %err, "failed to spawn");
            JobState::SpawnFailed
        }
    }
}
