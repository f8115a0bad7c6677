//! Read-only sources for the engine's reference data.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// A hierarchical, read-only provider of named resource files.
pub trait AssetSource: std::fmt::Debug {
    /// Reads the resource at `name`, a `/`-separated path relative to the root.
    fn read(&self, name: &str) -> io::Result<Vec<u8>>;
}

/// Assets stored under a directory on disk.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    /// Creates a source rooted at `root`. The directory is not touched until read.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this source.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirAssets {
    #[instrument(skip(self), fields(root = %self.root().display()))]
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        if name.split('/').any(|part| part == ".." || part.is_empty()) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid asset name '{}'", name),
            ));
        }
        let path = self.root.join(name);
        debug!(path = %path.display(), "Reading asset");
        std::fs::read(path)
    }
}

/// Assets held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file.
    pub fn with_file(mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.files.insert(name.into(), contents.into());
        self
    }
}

impl AssetSource for MemoryAssets {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        self.files.get(name).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no asset named '{}'", name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_assets_reject_parent_and_empty_segments() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("contact.toml"), "version = 1").unwrap();
        let assets = DirAssets::new(dir.path());

        for name in ["../contact.toml", "sub/../contact.toml", "/contact.toml", "a//b", ""] {
            let err = assets.read(name).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "name {:?}", name);
        }
        assert_eq!(assets.read("contact.toml").unwrap(), b"version = 1");
    }

    #[test]
    fn dir_assets_report_absent_file_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = DirAssets::new(dir.path()).read("race.toml").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn memory_assets_return_added_files() {
        let assets = MemoryAssets::new().with_file("gammon.toml", "x");
        assert_eq!(assets.read("gammon.toml").unwrap(), b"x");
        assert_eq!(
            assets.read("race.toml").unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }
}
