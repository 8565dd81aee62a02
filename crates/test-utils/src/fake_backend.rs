use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use mdjob::errors::Result;
use mdjob::exec::{LaunchSpec, ProcessBackend, ProcessExit};

/// A fake process backend that:
/// - records every `LaunchSpec` it receives
/// - writes the configured output files into the launch's working directory
///   (as a simulation would)
/// - exits with the configured code, or fails to start if asked to.
#[derive(Clone, Default)]
pub struct FakeBackend {
    launched: Arc<Mutex<Vec<LaunchSpec>>>,
    outputs: Vec<(PathBuf, String)>,
    exit_codes: Vec<i32>,
    spawn_error: Option<String>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// File (relative to the working directory) to create on each launch.
    pub fn producing(mut self, rel: impl Into<PathBuf>, contents: &str) -> Self {
        self.outputs.push((rel.into(), contents.to_string()));
        self
    }

    /// Exit codes for successive launches; the last one repeats.
    pub fn exiting_with(mut self, codes: &[i32]) -> Self {
        self.exit_codes = codes.to_vec();
        self
    }

    pub fn failing_to_start(mut self, reason: &str) -> Self {
        self.spawn_error = Some(reason.to_string());
        self
    }

    /// Shared handle to the recorded launches.
    pub fn launched(&self) -> Arc<Mutex<Vec<LaunchSpec>>> {
        Arc::clone(&self.launched)
    }
}

impl ProcessBackend for FakeBackend {
    fn launch(
        &mut self,
        spec: LaunchSpec,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessExit>> + Send + '_>> {
        Box::pin(async move {
            let index = {
                let mut guard = self.launched.lock().unwrap();
                guard.push(spec.clone());
                guard.len() - 1
            };

            if let Some(ref reason) = self.spawn_error {
                return Err(anyhow::anyhow!("{reason}").into());
            }

            for (rel, contents) in self.outputs.iter() {
                let path = spec.cwd.join(rel);
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).map_err(anyhow::Error::from)?;
                }
                std::fs::write(&path, contents).map_err(anyhow::Error::from)?;
            }

            let code = self
                .exit_codes
                .get(index)
                .or(self.exit_codes.last())
                .copied()
                .unwrap_or(0);
            Ok(ProcessExit::from_code(code))
        })
    }
}
