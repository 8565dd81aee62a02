// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`launch`] describes a process to start (`LaunchSpec`) and builds the
//!   MPI + container command line for the simulation.
//! - [`backend`] provides the `ProcessBackend` trait and the production
//!   `TokioProcessBackend`; tests substitute a fake that never spawns.

pub mod backend;
pub mod launch;

pub use backend::{ProcessBackend, ProcessExit, TokioProcessBackend};
pub use launch::{sbatch_command, shell_quote, simulation_command, LaunchSpec};
