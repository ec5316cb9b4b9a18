// src/run/supervise.rs

//! The supervising poll loop.
//!
//! One coordinating task owns every child: once per second it checks each
//! still-running job without blocking, applies timeout escalation, and
//! reacts to the external shutdown flag. The loop ends only when every
//! launched job has been reaped.

use std::io::Write;
use std::os::unix::process::ExitStatusExt;
use std::time::{Duration, Instant};

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tokio::process::Child;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::report::Reporter;
use crate::run::launch::LaunchedJob;
use crate::signals::ShutdownFlag;

/// How often the supervisor wakes to poll.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Status reported for a job whose program could not be executed.
pub const EXEC_FAILURE_STATUS: i32 = 255;

/// Supervisor-side lifecycle of one launched job.
#[derive(Debug)]
pub enum JobState {
    /// Child process is alive, or not yet observed dead.
    Running {
        child: Child,
        started: Instant,
        /// The graceful timeout signal was already sent; the next poll that
        /// still finds the child alive escalates to SIGKILL.
        graceful_sent: bool,
    },
    /// The program could not be started at all; reported with
    /// [`EXEC_FAILURE_STATUS`] on the next poll, like any other exit.
    SpawnFailed,
    /// Exit observed and reported.
    Terminated,
}

/// Timeout escalation step for a still-running job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escalation {
    Graceful,
    Forced,
}

/// Decide what, if anything, to send a job that is still running.
///
/// Once the graceful signal has gone out, the only remaining step is the
/// unconditional kill, regardless of how much more time has passed.
fn timeout_escalation(
    timeout: Option<Duration>,
    elapsed: Duration,
    graceful_sent: bool,
) -> Option<Escalation> {
    if graceful_sent {
        Some(Escalation::Forced)
    } else if timeout.is_some_and(|limit| elapsed >= limit) {
        Some(Escalation::Graceful)
    } else {
        None
    }
}

/// Drive all launched jobs to termination, emitting one completion line per
/// job in the order completions are observed.
pub async fn supervise<W: Write>(
    mut jobs: Vec<LaunchedJob>,
    shutdown: ShutdownFlag,
    reporter: &mut Reporter<W>,
) -> Result<()> {
    info!(jobs = jobs.len(), "supervisor started");

    let mut ticker = time::interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // An interval's first tick fires immediately; consume it so the first
    // poll happens a full interval after launch.
    ticker.tick().await;

    while jobs
        .iter()
        .any(|job| !matches!(job.state, JobState::Terminated))
    {
        ticker.tick().await;

        if shutdown.is_set() {
            kill_all(&jobs);
        }

        for job in jobs.iter_mut() {
            poll_job(job, reporter);
        }
    }

    info!("all jobs terminated");
    Ok(())
}

/// SIGKILL every job that is still running; idempotent per job.
fn kill_all(jobs: &[LaunchedJob]) {
    debug!("shutdown requested; killing all remaining jobs");
    for job in jobs {
        if let JobState::Running { child, .. } = &job.state {
            send_signal(job.index, child, Signal::SIGKILL);
        }
    }
}

/// One non-blocking status check plus timeout handling for a single job.
fn poll_job<W: Write>(job: &mut LaunchedJob, reporter: &mut Reporter<W>) {
    match &mut job.state {
        JobState::Terminated => {}
        JobState::SpawnFailed => {
            reporter.job_exited(job.index, EXEC_FAILURE_STATUS);
            job.state = JobState::Terminated;
        }
        JobState::Running {
            child,
            started,
            graceful_sent,
        } => match child.try_wait() {
            Ok(Some(status)) => {
                match status.code() {
                    Some(code) => reporter.job_exited(job.index, code),
                    None => {
                        // On Unix the absence of an exit code means the
                        // child was killed by a signal.
                        reporter.job_signaled(job.index, status.signal().unwrap_or(0));
                    }
                }
                job.state = JobState::Terminated;
            }
            Ok(None) => match timeout_escalation(job.timeout, started.elapsed(), *graceful_sent) {
                Some(Escalation::Graceful) => {
                    debug!(job = job.index, "timeout reached; sending SIGABRT");
                    send_signal(job.index, child, Signal::SIGABRT);
                    *graceful_sent = true;
                }
                Some(Escalation::Forced) => {
                    debug!(
                        job = job.index,
                        "still alive after graceful signal; sending SIGKILL"
                    );
                    send_signal(job.index, child, Signal::SIGKILL);
                }
                None => {}
            },
            Err(err) => {
                warn!(job = job.index, error = %err, "status check failed");
            }
        },
    }
}

/// Deliver `signal` to the job's process. Races with exit are expected; the
/// resulting errors are ignored.
fn send_signal(index: usize, child: &Child, signal: Signal) {
    let Some(pid) = child.id() else {
        return;
    };
    if let Err(err) = kill(Pid::from_raw(pid as i32), signal) {
        debug!(job = index, %signal, error = %err, "signal not delivered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_timeout_never_escalates() {
        assert_eq!(
            timeout_escalation(None, Duration::from_secs(3600), false),
            None
        );
    }

    #[test]
    fn graceful_fires_at_or_after_the_limit() {
        let limit = Some(Duration::from_secs(2));
        assert_eq!(timeout_escalation(limit, Duration::from_secs(1), false), None);
        assert_eq!(
            timeout_escalation(limit, Duration::from_secs(2), false),
            Some(Escalation::Graceful)
        );
        assert_eq!(
            timeout_escalation(limit, Duration::from_secs(10), false),
            Some(Escalation::Graceful)
        );
    }

    #[test]
    fn graceful_is_followed_by_forced_on_the_next_check() {
        assert_eq!(
            timeout_escalation(Some(Duration::from_secs(2)), Duration::from_secs(3), true),
            Some(Escalation::Forced)
        );
    }
}
