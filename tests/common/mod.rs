#![allow(dead_code)]

#[allow(unused_imports)]
pub use mdjob_test_utils::builders;
#[allow(unused_imports)]
pub use mdjob_test_utils::fake_backend::FakeBackend;
#[allow(unused_imports)]
pub use mdjob_test_utils::{init_tracing, with_timeout};

use std::fs;
use std::path::{Path, PathBuf};

/// Create `{root}/{name}` holding a typical LAMMPS input set.
pub fn submission_dir(root: &Path, name: &str) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(dir.join("ff")).unwrap();
    fs::write(dir.join("run.lmp"), "include system.in.init\nrun 1000\n").unwrap();
    fs::write(dir.join("system.data"), "3 atoms\n").unwrap();
    fs::write(dir.join("ff/system.in.settings"), "pair_coeff * *\n").unwrap();
    dir
}

/// Relative paths of all files below `root`, sorted, with `/` separators.
///
/// Symlinks are listed as entries and never followed.
pub fn list_files(root: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let entry = entry.unwrap();
            let path = entry.path();
            if entry.file_type().unwrap().is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap();
                out.push(rel.to_string_lossy().replace('\\', "/"));
            }
        }
    }
    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}
