// src/run/mod.rs

//! Process execution layer: launching validated jobs and supervising them.
//!
//! - [`launch`] allocates the OS pipes and spawns one child per enabled job.
//! - [`supervise`] drives the polling loop until every child is reaped.

pub mod launch;
pub mod supervise;

pub use launch::{LaunchedJob, launch_jobs};
pub use supervise::{JobState, supervise};
