// src/job/mod.rs

//! The job runner: stage → execute → collect → clean up.
//!
//! Each phase returns a `Result` and the first failure ends the run. Since
//! cleanup is last, any failure before it leaves the scratch workspace on
//! disk for inspection, and no results directory exists unless the
//! simulation exited successfully.

pub mod collect;
pub mod paths;
pub mod stage;

use std::sync::Arc;

use tracing::{error, info};

use crate::config::ConfigFile;
use crate::env::JobEnvironment;
use crate::errors::{JobError, Result};
use crate::exec::{simulation_command, LaunchSpec, ProcessBackend, ProcessExit};
use crate::fs::{CopyStats, FileSystem};
use crate::types::Phase;

pub use paths::JobPaths;

/// Summary of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub paths: JobPaths,
    pub staged: CopyStats,
    pub exit: ProcessExit,
    pub collected: CopyStats,
}

pub struct JobRunner<B: ProcessBackend> {
    fs: Arc<dyn FileSystem>,
    backend: B,
    config: ConfigFile,
    env: JobEnvironment,
}

impl<B: ProcessBackend> JobRunner<B> {
    pub fn new(fs: Arc<dyn FileSystem>, backend: B, config: ConfigFile, env: JobEnvironment) -> Self {
        Self {
            fs,
            backend,
            config,
            env,
        }
    }

    /// Resolve the job's paths and the simulation command without side
    /// effects.
    pub fn plan(&self) -> Result<(JobPaths, LaunchSpec)> {
        let paths = JobPaths::resolve(&self.config.workspace, &self.env)?;
        let spec = simulation_command(&self.config.launcher, self.env.ntasks, &paths.workspace);
        Ok((paths, spec))
    }

    pub async fn run(&mut self) -> Result<RunReport> {
        let (paths, spec) = self.plan()?;
        info!(
            job_id = %self.env.job_id,
            ntasks = self.env.ntasks,
            workspace = %paths.workspace.display(),
            results = %paths.results.display(),
            "starting job"
        );

        let result = self.run_phases(paths, spec).await;
        if let Err(ref err) = result {
            let phase = err.phase().map(|p| p.to_string());
            error!(
                job_id = %self.env.job_id,
                phase = phase.as_deref().unwrap_or("setup"),
                error = %err,
                "job failed; scratch workspace left in place"
            );
        }
        result
    }

    async fn run_phases(&mut self, paths: JobPaths, spec: LaunchSpec) -> Result<RunReport> {
        let fs = Arc::clone(&self.fs);

        info!(phase = %Phase::Stage, source = %paths.source.display(), "staging inputs");
        let staged =
            stage::stage(fs.as_ref(), &self.config, &paths).map_err(JobError::Staging)?;

        info!(phase = %Phase::Execute, cmd = %spec, "running simulation");
        let exit = self.backend.launch(spec).await.map_err(|e| match e {
            JobError::Other(inner) => JobError::Launch(inner),
            other => other,
        })?;
        if !exit.success() {
            return Err(JobError::Execution { code: exit.code });
        }

        info!(phase = %Phase::Collect, "collecting results");
        let collected = collect::collect(fs.as_ref(), &paths).map_err(JobError::Collection)?;

        info!(phase = %Phase::Cleanup, "removing workspace");
        collect::cleanup(fs.as_ref(), &paths).map_err(JobError::Cleanup)?;

        info!(
            job_id = %self.env.job_id,
            results = %paths.results.display(),
            "job finished"
        );
        Ok(RunReport {
            paths,
            staged,
            exit,
            collected,
        })
    }
}
