use std::path::{Path, PathBuf};

use crate::random::random_string;

/// A directory under the system temp dir, removed with everything in it
/// when dropped.
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AsRef<Path> for TempDir {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

pub fn temp_dir() -> TempDir {
    let path = std::env::temp_dir().join(format!("testify-{}", random_string(16)));
    std::fs::create_dir_all(&path).unwrap();

    TempDir { path }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_on_drop() {
        let dir = temp_dir();
        let path = dir.path().to_path_buf();
        std::fs::write(path.join("file"), "content").unwrap();
        assert!(path.is_dir());

        drop(dir);
        assert!(!path.exists());
    }
}
