// src/job/stage.rs

use std::path::Path;

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::fs::{copy_tree, CopyMode, CopyStats, FileSystem};

use super::paths::JobPaths;

/// Create the workspace, drop the origin marker and copy the inputs in.
///
/// Errors leave whatever was created so far in place.
pub fn stage(fs: &dyn FileSystem, cfg: &ConfigFile, paths: &JobPaths) -> Result<CopyStats> {
    let ws = &cfg.workspace;

    fs.create_dir_all(&ws.tmp_root)
        .with_context(|| format!("preparing scratch root {:?}", ws.tmp_root))?;
    fs.create_dir(&paths.workspace)
        .with_context(|| format!("creating workspace {:?}", paths.workspace))?;
    debug!(workspace = %paths.workspace.display(), "workspace created");

    write_marker(fs, &paths.workspace.join(&ws.marker_file), &paths.source)?;

    let exclude = build_exclude_set(&ws.exclude)?;
    let stats = copy_tree(
        fs,
        &paths.source,
        &paths.workspace,
        CopyMode::Overwrite,
        exclude.as_ref(),
    )
    .with_context(|| format!("copying {:?} into workspace", paths.source))?;

    let input = paths.workspace.join(&cfg.launcher.input_file);
    if !fs.is_file(&input) {
        bail!(
            "input file '{}' not found in {:?}",
            cfg.launcher.input_file,
            paths.source
        );
    }

    info!(
        files = stats.files,
        dirs = stats.dirs,
        links = stats.links,
        skipped = stats.skipped,
        "inputs staged"
    );
    Ok(stats)
}

/// One line naming the submission directory, for recovering orphaned
/// workspaces.
fn write_marker(fs: &dyn FileSystem, marker: &Path, source: &Path) -> Result<()> {
    let line = format!("{}\n", source.display());
    fs.write(marker, line.as_bytes())
        .with_context(|| format!("writing marker {:?}", marker))
}

fn build_exclude_set(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for p in patterns {
        builder.add(Glob::new(p).with_context(|| format!("invalid exclude glob '{p}'"))?);
    }
    Ok(Some(builder.build()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawConfigFile;
    use crate::fs::mock::MockFileSystem;
    use std::path::PathBuf;

    fn paths() -> JobPaths {
        JobPaths {
            source: PathBuf::from("/home/u/water"),
            workspace: PathBuf::from("/tmp/water_7"),
            results: PathBuf::from("/home/u/water/results_7"),
        }
    }

    fn config(exclude: &[&str]) -> ConfigFile {
        let mut raw = RawConfigFile::default();
        raw.workspace.exclude = exclude.iter().map(|s| s.to_string()).collect();
        ConfigFile::try_from(raw).unwrap()
    }

    #[test]
    fn stages_inputs_and_marker() {
        let fs = MockFileSystem::new();
        fs.add_file("/home/u/water/run.lmp", "run 10");
        fs.add_file("/home/u/water/ff/system.in.settings", "pair_coeff");

        let stats = stage(&fs, &config(&[]), &paths()).unwrap();

        assert_eq!(stats.files, 2);
        assert_eq!(fs.file("/tmp/water_7/run.lmp").unwrap(), b"run 10");
        assert!(fs.is_file(Path::new("/tmp/water_7/ff/system.in.settings")));
        assert_eq!(
            fs.read_to_string(Path::new("/tmp/water_7/origin_dir.txt")).unwrap(),
            "/home/u/water\n"
        );
    }

    #[test]
    fn missing_input_fails_after_copy() {
        let fs = MockFileSystem::new();
        fs.add_file("/home/u/water/system.data", "atoms");

        let err = stage(&fs, &config(&[]), &paths()).unwrap_err();

        assert!(format!("{err:#}").contains("run.lmp"));
        assert!(fs.is_file(Path::new("/tmp/water_7/system.data")));
    }

    #[test]
    fn excluded_input_counts_as_missing() {
        let fs = MockFileSystem::new();
        fs.add_file("/home/u/water/run.lmp", "run 10");

        assert!(stage(&fs, &config(&["*.lmp"]), &paths()).is_err());
    }

    #[test]
    fn existing_workspace_is_not_reused() {
        let fs = MockFileSystem::new();
        fs.add_file("/home/u/water/run.lmp", "run 10");
        fs.add_file("/tmp/water_7/stale", "x");

        let err = stage(&fs, &config(&[]), &paths()).unwrap_err();
        assert!(format!("{err:#}").contains("creating workspace"));
    }
}
