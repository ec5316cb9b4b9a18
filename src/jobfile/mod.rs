// src/jobfile/mod.rs

//! Jobfile loading and parsing.
//!
//! - [`model`] defines the parsed job descriptor types.
//! - [`loader`] reads jobfiles and turns their lines into [`model::JobSpec`]s.

pub mod loader;
pub mod model;

pub use loader::load_jobfiles;
pub use model::{IoSpec, JobSpec};
