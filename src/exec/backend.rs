// src/exec/backend.rs

//! Pluggable process backend.
//!
//! The runner and the batch submitter talk to a `ProcessBackend` instead of
//! `tokio::process` directly, so tests can record launches and simulate
//! exit codes (and produced files) without MPI, a container runtime or a
//! scheduler on the machine.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::Result;

use super::launch::LaunchSpec;

/// How a launched process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ProcessExit {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Trait abstracting how processes are run.
///
/// `launch` resolves once the process has exited. An `Err` means the
/// process could not be started or waited on at all; a non-zero exit is
/// reported through `ProcessExit`.
pub trait ProcessBackend: Send {
    fn launch(
        &mut self,
        spec: LaunchSpec,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessExit>> + Send + '_>>;
}

/// Production backend on top of `tokio::process::Command`.
///
/// Stdio is inherited so the child's output lands in the scheduler's job
/// log files alongside ours.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessBackend;

impl TokioProcessBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessBackend for TokioProcessBackend {
    fn launch(
        &mut self,
        spec: LaunchSpec,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessExit>> + Send + '_>> {
        Box::pin(async move {
            info!(cmd = %spec, cwd = %spec.cwd.display(), "starting process");

            let mut cmd = Command::new(&spec.program);
            cmd.args(&spec.args)
                .current_dir(&spec.cwd)
                .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .stdin(Stdio::null())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .kill_on_drop(true);

            let mut child = cmd
                .spawn()
                .with_context(|| format!("spawning '{}'", spec.program))?;

            let status = child
                .wait()
                .await
                .with_context(|| format!("waiting for '{}'", spec.program))?;

            let exit = ProcessExit {
                code: status.code(),
            };
            debug!(program = %spec.program, exit_code = ?exit.code, "process exited");
            Ok(exit)
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn reports_exit_code_and_passes_env() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = TokioProcessBackend::new();

        let spec = LaunchSpec::new("sh", dir.path())
            .arg("-c")
            .arg(r#"test "$OMP_NUM_THREADS" = 1 && pwd > where.txt && exit 3"#)
            .env("OMP_NUM_THREADS", "1");
        let exit = backend.launch(spec).await.unwrap();

        assert_eq!(exit.code, Some(3));
        let written = std::fs::read_to_string(dir.path().join("where.txt")).unwrap();
        assert_eq!(
            std::fs::canonicalize(PathBuf::from(written.trim())).unwrap(),
            std::fs::canonicalize(dir.path()).unwrap()
        );
    }

    #[tokio::test]
    async fn missing_program_is_an_error() {
        let mut backend = TokioProcessBackend::new();
        let spec = LaunchSpec::new("mdjob-no-such-program", "/");
        assert!(backend.launch(spec).await.is_err());
    }
}
