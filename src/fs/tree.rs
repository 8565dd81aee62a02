// src/fs/tree.rs

//! Recursive directory copy on top of [`FileSystem`].

use std::path::Path;

use anyhow::{bail, Context, Result};
use globset::GlobSet;
use tracing::trace;

use super::FileSystem;

/// What to do when a destination file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    Overwrite,
    /// Keep the existing destination file (`cp -n`).
    NoClobber,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub dirs: usize,
    /// Symlinks recreated as links, never followed.
    pub links: usize,
    /// Excluded entries plus files kept under `NoClobber`.
    pub skipped: usize,
}

/// Copy the contents of `src` into the existing directory `dst`.
///
/// `exclude` is matched against paths relative to `src`; a matching
/// directory is skipped with everything below it. If `dst` lies inside
/// `src` it is never descended into. Symlinks are copied as links with
/// their target unchanged (like `cp -r`), so broken or cyclic links are
/// carried over as they are.
pub fn copy_tree(
    fs: &dyn FileSystem,
    src: &Path,
    dst: &Path,
    mode: CopyMode,
    exclude: Option<&GlobSet>,
) -> Result<CopyStats> {
    let mut stats = CopyStats::default();
    copy_dir_contents(fs, src, src, dst, dst, mode, exclude, &mut stats)?;
    Ok(stats)
}

#[allow(clippy::too_many_arguments)]
fn copy_dir_contents(
    fs: &dyn FileSystem,
    root: &Path,
    from: &Path,
    to: &Path,
    dst_root: &Path,
    mode: CopyMode,
    exclude: Option<&GlobSet>,
    stats: &mut CopyStats,
) -> Result<()> {
    for entry in fs.read_dir(from)? {
        if entry == dst_root {
            continue;
        }

        let rel = entry.strip_prefix(root).unwrap_or(&entry);
        if exclude.is_some_and(|set| set.is_match(rel)) {
            trace!(path = %rel.display(), "excluded from copy");
            stats.skipped += 1;
            continue;
        }

        let Some(name) = entry.file_name() else {
            continue;
        };
        let target = to.join(name);

        if fs.is_symlink(&entry) {
            if fs.exists(&target) || fs.is_symlink(&target) {
                if mode == CopyMode::NoClobber {
                    stats.skipped += 1;
                    continue;
                }
                bail!("refusing to replace {:?} with a link", target);
            }
            let link_target = fs.read_link(&entry)?;
            fs.symlink(&link_target, &target)?;
            stats.links += 1;
        } else if fs.is_dir(&entry) {
            if !fs.is_dir(&target) {
                fs.create_dir(&target)
                    .with_context(|| format!("creating {:?}", target))?;
            }
            stats.dirs += 1;
            copy_dir_contents(fs, root, &entry, &target, dst_root, mode, exclude, stats)?;
        } else {
            if mode == CopyMode::NoClobber && (fs.exists(&target) || fs.is_symlink(&target)) {
                stats.skipped += 1;
                continue;
            }
            fs.copy_file(&entry, &target)?;
            stats.files += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use globset::{Glob, GlobSetBuilder};
    use std::path::PathBuf;

    fn sample() -> MockFileSystem {
        let fs = MockFileSystem::new();
        fs.add_file("/src/run.lmp", "run");
        fs.add_file("/src/data/system.data", "atoms");
        fs.add_file("/src/results_1/log.lammps", "old");
        fs.add_dir("/dst");
        fs
    }

    #[test]
    fn copies_nested_contents() {
        let fs = sample();
        let stats =
            copy_tree(&fs, Path::new("/src"), Path::new("/dst"), CopyMode::Overwrite, None)
                .unwrap();

        assert_eq!(stats.files, 3);
        assert_eq!(stats.dirs, 2);
        assert_eq!(fs.file("/dst/data/system.data").unwrap(), b"atoms");
    }

    #[test]
    fn no_clobber_keeps_existing_files() {
        let fs = sample();
        fs.add_file("/dst/run.lmp", "mine");

        let stats =
            copy_tree(&fs, Path::new("/src"), Path::new("/dst"), CopyMode::NoClobber, None)
                .unwrap();

        assert_eq!(fs.file("/dst/run.lmp").unwrap(), b"mine");
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn exclude_skips_whole_directories() {
        let fs = sample();
        let mut builder = GlobSetBuilder::new();
        builder.add(Glob::new("results_*").unwrap());
        let set = builder.build().unwrap();

        copy_tree(
            &fs,
            Path::new("/src"),
            Path::new("/dst"),
            CopyMode::Overwrite,
            Some(&set),
        )
        .unwrap();

        assert!(!fs.exists(Path::new("/dst/results_1")));
        assert!(fs.exists(Path::new("/dst/run.lmp")));
    }

    #[test]
    fn symlinks_are_recreated_not_followed() {
        let fs = sample();
        fs.add_symlink("/src/restart.bin", "/nonexistent/restart.bin");
        fs.add_symlink("/src/data/self", ".");

        let stats =
            copy_tree(&fs, Path::new("/src"), Path::new("/dst"), CopyMode::Overwrite, None)
                .unwrap();

        assert_eq!(stats.links, 2);
        assert_eq!(
            fs.read_link(Path::new("/dst/restart.bin")).unwrap(),
            PathBuf::from("/nonexistent/restart.bin")
        );
        assert_eq!(
            fs.read_link(Path::new("/dst/data/self")).unwrap(),
            PathBuf::from(".")
        );
        assert!(!fs.exists(Path::new("/dst/data/self/system.data")));
    }

    #[test]
    fn no_clobber_keeps_existing_link_destination() {
        let fs = sample();
        fs.add_symlink("/src/latest", "run.lmp");
        fs.add_file("/dst/latest", "kept");

        let stats =
            copy_tree(&fs, Path::new("/src"), Path::new("/dst"), CopyMode::NoClobber, None)
                .unwrap();

        assert_eq!(fs.file("/dst/latest").unwrap(), b"kept");
        assert_eq!(stats.links, 0);
    }

    #[test]
    fn never_descends_into_destination_inside_source() {
        let fs = MockFileSystem::new();
        fs.add_file("/src/in.txt", "x");
        fs.add_dir("/src/scratch");

        copy_tree(
            &fs,
            Path::new("/src"),
            Path::new("/src/scratch"),
            CopyMode::Overwrite,
            None,
        )
        .unwrap();

        assert_eq!(fs.file("/src/scratch/in.txt").unwrap(), b"x");
        assert!(!fs.exists(Path::new("/src/scratch/scratch")));
    }
}
