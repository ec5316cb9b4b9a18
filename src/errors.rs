// src/errors.rs

//! Crate-wide error type carrying the reserved exit codes.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobflowError {
    #[error("jobflow: file \"{0}\" can not be opened")]
    JobfileOpen(String),

    #[error("jobflow: invalid job specification on line {line} of \"{file}\"")]
    JobfileSyntax { line: usize, file: String },

    #[error("jobflow: no runnable jobs")]
    NoRunnableJobs,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl JobflowError {
    /// Exit code surfaced to the caller.
    ///
    /// These codes are reserved and must not be renumbered: callers
    /// distinguish "no runnable jobs" from jobfile problems by them.
    pub fn exit_code(&self) -> i32 {
        match self {
            JobflowError::JobfileOpen(_) => 2,
            JobflowError::JobfileSyntax { .. } => 3,
            JobflowError::NoRunnableJobs => 4,
            JobflowError::Io(_) | JobflowError::Other(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, JobflowError>;
