// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, bail, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir,
    Symlink(PathBuf),
}

/// In-memory filesystem keyed by path.
///
/// Paths are taken literally (no normalisation), so tests should use
/// absolute paths consistently. Writes under a path registered with
/// [`MockFileSystem::deny_writes_under`] fail, which lets tests provoke
/// staging or collection failures.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<BTreeMap<PathBuf, MockEntry>>>,
    read_only: Arc<Mutex<HashSet<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let fs = Self::default();
        fs.entries
            .lock()
            .unwrap()
            .insert(PathBuf::from("/"), MockEntry::Dir);
        fs
    }

    /// Insert a file, creating missing parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut entries = self.entries.lock().unwrap();
        if let Some(parent) = path.parent() {
            insert_dirs(&mut entries, parent);
        }
        entries.insert(path.to_path_buf(), MockEntry::File(content.into()));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut entries = self.entries.lock().unwrap();
        insert_dirs(&mut entries, path.as_ref());
    }

    /// Insert a link; the target is not required to exist.
    pub fn add_symlink(&self, path: impl AsRef<Path>, target: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut entries = self.entries.lock().unwrap();
        if let Some(parent) = path.parent() {
            insert_dirs(&mut entries, parent);
        }
        entries.insert(
            path.to_path_buf(),
            MockEntry::Symlink(target.as_ref().to_path_buf()),
        );
    }

    pub fn deny_writes_under(&self, path: impl AsRef<Path>) {
        self.read_only
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf());
    }

    /// Snapshot of file contents, for assertions.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.entries.lock().unwrap().get(path.as_ref()) {
            Some(MockEntry::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    /// All paths at or below `root`, sorted.
    pub fn paths_under(&self, root: impl AsRef<Path>) -> Vec<PathBuf> {
        let root = root.as_ref();
        self.entries
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect()
    }

    fn check_writable(&self, path: &Path) -> Result<()> {
        let denied = self.read_only.lock().unwrap();
        if denied.iter().any(|d| path.starts_with(d)) {
            bail!("permission denied: {:?}", path);
        }
        Ok(())
    }

    fn require_parent_dir(entries: &BTreeMap<PathBuf, MockEntry>, path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => match entries.get(parent) {
                Some(MockEntry::Dir) => Ok(()),
                Some(_) => Err(anyhow!("Not a directory: {:?}", parent)),
                None => Err(anyhow!("No such directory: {:?}", parent)),
            },
            _ => Ok(()),
        }
    }
}

fn insert_dirs(entries: &mut BTreeMap<PathBuf, MockEntry>, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            continue;
        }
        entries
            .entry(ancestor.to_path_buf())
            .or_insert(MockEntry::Dir);
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let entries = self.entries.lock().unwrap();
        match entries.get(path) {
            Some(MockEntry::File(content)) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            Some(MockEntry::Symlink(_)) => Err(anyhow!("Mock does not follow links: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.check_writable(path)?;
        let mut entries = self.entries.lock().unwrap();
        Self::require_parent_dir(&entries, path)?;
        if let Some(MockEntry::Dir) = entries.get(path) {
            bail!("Is a directory: {:?}", path);
        }
        entries.insert(path.to_path_buf(), MockEntry::File(contents.to_vec()));
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.entries.lock().unwrap().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(
            self.entries.lock().unwrap().get(path),
            Some(MockEntry::File(_))
        )
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.entries.lock().unwrap().get(path), Some(MockEntry::Dir))
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        self.check_writable(path)?;
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(path) {
            bail!("File exists: {:?}", path);
        }
        Self::require_parent_dir(&entries, path)?;
        entries.insert(path.to_path_buf(), MockEntry::Dir);
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.check_writable(path)?;
        let mut entries = self.entries.lock().unwrap();
        if let Some(MockEntry::File(_) | MockEntry::Symlink(_)) = entries.get(path) {
            bail!("File exists: {:?}", path);
        }
        insert_dirs(&mut entries, path);
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        let content = match self.entries.lock().unwrap().get(from) {
            Some(MockEntry::File(content)) => content.clone(),
            Some(MockEntry::Dir) => bail!("Is a directory: {:?}", from),
            Some(MockEntry::Symlink(_)) => bail!("Mock does not follow links: {:?}", from),
            None => bail!("File not found: {:?}", from),
        };
        self.write(to, &content)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        self.check_writable(path)?;
        let mut entries = self.entries.lock().unwrap();
        if !matches!(entries.get(path), Some(MockEntry::Dir)) {
            bail!("Not a directory or not found: {:?}", path);
        }
        entries.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let entries = self.entries.lock().unwrap();
        if !matches!(entries.get(path), Some(MockEntry::Dir)) {
            bail!("Not a directory or not found: {:?}", path);
        }
        Ok(entries
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect())
    }

    fn is_symlink(&self, path: &Path) -> bool {
        matches!(
            self.entries.lock().unwrap().get(path),
            Some(MockEntry::Symlink(_))
        )
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf> {
        match self.entries.lock().unwrap().get(path) {
            Some(MockEntry::Symlink(target)) => Ok(target.clone()),
            _ => Err(anyhow!("Not a symlink: {:?}", path)),
        }
    }

    fn symlink(&self, target: &Path, link: &Path) -> Result<()> {
        self.check_writable(link)?;
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(link) {
            bail!("File exists: {:?}", link);
        }
        Self::require_parent_dir(&entries, link)?;
        entries.insert(link.to_path_buf(), MockEntry::Symlink(target.to_path_buf()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dir_requires_parent_and_absence() {
        let fs = MockFileSystem::new();
        assert!(fs.create_dir(Path::new("/a/b")).is_err());
        fs.create_dir(Path::new("/a")).unwrap();
        assert!(fs.create_dir(Path::new("/a")).is_err());
    }

    #[test]
    fn remove_dir_all_drops_descendants_only() {
        let fs = MockFileSystem::new();
        fs.add_file("/a/b/c.txt", "x");
        fs.add_file("/ab/keep.txt", "y");

        fs.remove_dir_all(Path::new("/a")).unwrap();

        assert!(!fs.exists(Path::new("/a/b/c.txt")));
        assert!(fs.exists(Path::new("/ab/keep.txt")));
    }

    #[test]
    fn denied_prefix_blocks_writes() {
        let fs = MockFileSystem::new();
        fs.add_dir("/ro");
        fs.deny_writes_under("/ro");
        assert!(fs.write(Path::new("/ro/f"), b"x").is_err());
        assert!(fs.create_dir(Path::new("/ro/d")).is_err());
    }

    #[test]
    fn read_dir_lists_direct_children() {
        let fs = MockFileSystem::new();
        fs.add_file("/d/one", "1");
        fs.add_file("/d/sub/two", "2");

        let children = fs.read_dir(Path::new("/d")).unwrap();
        assert_eq!(
            children,
            vec![PathBuf::from("/d/one"), PathBuf::from("/d/sub")]
        );
    }
}
