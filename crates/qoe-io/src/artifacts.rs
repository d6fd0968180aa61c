//! Output directory layout for figures and tables.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::IoError;

/// `root/`, `root/figures/` and `root/tables/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    root: PathBuf,
}

impl ArtifactLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn figures(&self) -> PathBuf {
        self.root.join("figures")
    }

    #[must_use]
    pub fn tables(&self) -> PathBuf {
        self.root.join("tables")
    }

    /// Create any directory that does not exist yet. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if a directory cannot be created.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn create(&self) -> Result<&Self, IoError> {
        for dir in [self.root.clone(), self.figures(), self.tables()] {
            std::fs::create_dir_all(&dir).map_err(|e| IoError::OutputDirCreate {
                path: dir.clone(),
                source: e,
            })?;
        }
        debug!("artifact directories ready");
        Ok(self)
    }
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self::new("artifacts")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArtifactLayout::new(dir.path().join("artifacts"));
        layout.create().unwrap();
        std::fs::write(layout.tables().join("keep.csv"), "x").unwrap();
        layout.create().unwrap();
        assert!(layout.figures().is_dir());
        assert!(layout.tables().join("keep.csv").is_file());
    }

    #[test]
    fn file_in_the_way_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("artifacts");
        std::fs::write(&root, "not a dir").unwrap();
        let err = ArtifactLayout::new(root).create().unwrap_err();
        assert!(matches!(err, IoError::OutputDirCreate { .. }));
    }
}
