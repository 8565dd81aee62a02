// src/batch/mod.rs

//! Tooling around the runner for preparing and submitting many jobs:
//!
//! - [`script`] renders a Slurm batch script from `[scheduler]`.
//! - [`sweep`] lays out one submission directory per temperature/pressure.
//! - [`submit`] calls `sbatch` in every prepared directory.

pub mod script;
pub mod submit;
pub mod sweep;

pub use script::render_batch_script;
pub use submit::{submit_all, SubmitSummary};
pub use sweep::{generate_sweep, SweepPlan};
