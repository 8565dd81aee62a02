// src/batch/submit.rs

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::errors::Result;
use crate::exec::{sbatch_command, ProcessBackend};
use crate::fs::FileSystem;

use super::script::SUBMIT_SCRIPT;

#[derive(Debug, Clone, Default)]
pub struct SubmitSummary {
    pub submitted: Vec<PathBuf>,
    /// Directory and reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl SubmitSummary {
    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Immediate subdirectories of `root` that contain a batch script, sorted.
pub fn submission_dirs(fs: &dyn FileSystem, root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs.read_dir(root)? {
        if fs.is_dir(&entry) && fs.is_file(&entry.join(SUBMIT_SCRIPT)) {
            dirs.push(entry);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Run `sbatch submit.sh` in each submission directory under `root`.
///
/// A failed submission is recorded and the remaining directories are still
/// attempted.
pub async fn submit_all<B: ProcessBackend>(
    fs: &dyn FileSystem,
    backend: &mut B,
    root: &Path,
) -> Result<SubmitSummary> {
    let mut summary = SubmitSummary::default();

    for dir in submission_dirs(fs, root)? {
        info!(dir = %dir.display(), "submitting job");
        let outcome = backend.launch(sbatch_command(&dir, SUBMIT_SCRIPT)).await;

        let failure = match outcome {
            Ok(exit) if exit.success() => None,
            Ok(exit) => Some(match exit.code {
                Some(code) => format!("sbatch exited with code {code}"),
                None => "sbatch terminated by signal".to_string(),
            }),
            Err(e) => Some(e.to_string()),
        };

        match failure {
            None => summary.submitted.push(dir),
            Some(reason) => {
                warn!(dir = %dir.display(), %reason, "submission failed");
                summary.failed.push((dir, reason));
            }
        }
    }

    info!(
        submitted = summary.submitted.len(),
        failed = summary.failed.len(),
        "submission sweep finished"
    );
    Ok(summary)
}
