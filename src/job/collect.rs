// src/job/collect.rs

use anyhow::{Context, Result};
use tracing::info;

use crate::fs::{copy_tree, CopyMode, CopyStats, FileSystem};

use super::paths::JobPaths;

/// Create the results directory and copy the whole workspace into it.
///
/// The results directory must not exist yet; files are copied without
/// clobbering.
pub fn collect(fs: &dyn FileSystem, paths: &JobPaths) -> Result<CopyStats> {
    fs.create_dir(&paths.results)
        .with_context(|| format!("creating results directory {:?}", paths.results))?;

    let stats = copy_tree(
        fs,
        &paths.workspace,
        &paths.results,
        CopyMode::NoClobber,
        None,
    )
    .with_context(|| format!("copying workspace into {:?}", paths.results))?;

    info!(
        files = stats.files,
        results = %paths.results.display(),
        "results collected"
    );
    Ok(stats)
}

pub fn cleanup(fs: &dyn FileSystem, paths: &JobPaths) -> Result<()> {
    fs.remove_dir_all(&paths.workspace)
        .with_context(|| format!("removing workspace {:?}", paths.workspace))?;
    info!(workspace = %paths.workspace.display(), "workspace removed");
    Ok(())
}
