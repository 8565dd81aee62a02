// src/env.rs

//! Scheduler-provided job environment.
//!
//! Slurm injects the job id, task count and submission directory as
//! environment variables. They are read once, up front, into a
//! [`JobEnvironment`] that is passed explicitly to the runner, so the runner
//! never consults the process environment itself.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::errors::{JobError, Result};
use crate::types::JobId;

pub const SLURM_JOB_ID: &str = "SLURM_JOB_ID";
pub const SLURM_NTASKS: &str = "SLURM_NTASKS";
pub const SLURM_SUBMIT_DIR: &str = "SLURM_SUBMIT_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobEnvironment {
    pub job_id: JobId,
    /// MPI process count.
    pub ntasks: u32,
    /// Parent of the results directory.
    pub submit_dir: PathBuf,
    /// Directory whose contents are staged; normally the same as `submit_dir`.
    pub current_dir: PathBuf,
}

/// Explicit values that take precedence over the scheduler's variables.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub job_id: Option<String>,
    pub ntasks: Option<u32>,
    pub submit_dir: Option<PathBuf>,
}

impl JobEnvironment {
    /// Build from the real process environment and working directory.
    pub fn from_process(overrides: &EnvOverrides) -> Result<Self> {
        let current_dir = std::env::current_dir()?;
        Self::from_lookup(|key| std::env::var(key).ok(), current_dir, overrides)
    }

    /// Build from a snapshot map; convenient for tests.
    pub fn from_map(
        vars: &HashMap<String, String>,
        current_dir: PathBuf,
        overrides: &EnvOverrides,
    ) -> Result<Self> {
        Self::from_lookup(|key| vars.get(key).cloned(), current_dir, overrides)
    }

    pub fn from_lookup<F>(lookup: F, current_dir: PathBuf, overrides: &EnvOverrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_id = overrides
            .job_id
            .clone()
            .or_else(|| lookup(SLURM_JOB_ID))
            .ok_or_else(|| missing(SLURM_JOB_ID))?;
        let job_id = raw_id
            .parse::<JobId>()
            .map_err(|e| JobError::Environment(format!("{SLURM_JOB_ID}: {e}")))?;

        let ntasks = match overrides.ntasks {
            Some(n) => n,
            None => {
                let raw = lookup(SLURM_NTASKS).ok_or_else(|| missing(SLURM_NTASKS))?;
                raw.trim().parse::<u32>().map_err(|e| {
                    JobError::Environment(format!("{SLURM_NTASKS}='{raw}' is not a count: {e}"))
                })?
            }
        };
        if ntasks == 0 {
            return Err(JobError::Environment(format!(
                "{SLURM_NTASKS} must be >= 1 (got 0)"
            )));
        }

        let submit_dir = overrides
            .submit_dir
            .clone()
            .or_else(|| lookup(SLURM_SUBMIT_DIR).filter(|s| !s.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| current_dir.clone());

        Ok(Self {
            job_id,
            ntasks,
            submit_dir,
            current_dir,
        })
    }
}

fn missing(var: &str) -> JobError {
    JobError::Environment(format!(
        "{var} is not set (run inside a Slurm job or pass it on the command line)"
    ))
}
