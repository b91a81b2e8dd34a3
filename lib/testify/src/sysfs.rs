use std::path::{Path, PathBuf};

use crate::temp::{TempDir, temp_dir};

/// Builds a fake sysfs hierarchy in a temporary directory.
///
/// ```
/// let tree = testify::SysfsTree::new()
///     .file("intel-rapl/intel-rapl:0/name", "package-0\n")
///     .file("intel-rapl/intel-rapl:0/energy_uj", "1000\n")
///     .dir("intel-rapl/power");
///
/// assert!(tree.root().join("intel-rapl/power").is_dir());
/// ```
#[derive(Debug)]
pub struct SysfsTree {
    dir: TempDir,
}

impl SysfsTree {
    pub fn new() -> Self {
        Self { dir: temp_dir() }
    }

    /// Create a file, and all missing parents, relative to the root.
    pub fn file(self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) -> Self {
        let path = self.dir.path().join(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();

        self
    }

    /// Create a directory, and all missing parents, relative to the root.
    pub fn dir(self, path: impl AsRef<Path>) -> Self {
        std::fs::create_dir_all(self.dir.path().join(path)).unwrap();

        self
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = self.dir.path().join(path);
        if path.is_dir() {
            std::fs::remove_dir_all(path).unwrap();
        } else {
            std::fs::remove_file(path).unwrap();
        }
    }

    pub fn write(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) {
        std::fs::write(self.dir.path().join(path), content).unwrap();
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(path)
    }
}

impl Default for SysfsTree {
    fn default() -> Self {
        Self::new()
    }
}
