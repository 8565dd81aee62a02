// src/config/mod.rs

//! Configuration loading and validation for mdjob.
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: reading a config file (or falling back to defaults).
//! - `validate.rs`: checked conversion from the raw model.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{
    ConfigFile, LauncherSection, RawConfigFile, SchedulerSection, SweepSection, WorkspaceSection,
};
