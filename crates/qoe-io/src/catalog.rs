//! Window-size → dataset file mapping.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Directory the window exports are written to.
pub const DEFAULT_DATA_DIR: &str = "output";

const DEFAULT_WINDOWS: [(u32, &str); 4] = [
    (3, "window_3_1756030271.csv"),
    (5, "window_5_1756032959.csv"),
    (10, "window_10_1754904064.csv"),
    (15, "window_15_1756035248.csv"),
];

/// Dataset files keyed by window size in seconds, iterated in ascending size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowCatalog {
    files: BTreeMap<u32, PathBuf>,
}

impl WindowCatalog {
    /// The standard four windows under `data_dir`.
    #[must_use]
    pub fn rooted_at(data_dir: &Path) -> Self {
        Self {
            files: DEFAULT_WINDOWS
                .iter()
                .map(|&(size, name)| (size, data_dir.join(name)))
                .collect(),
        }
    }

    /// A catalog with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            files: BTreeMap::new(),
        }
    }

    /// Add or replace the file for a window size.
    #[must_use]
    pub fn with_window(mut self, size_secs: u32, path: PathBuf) -> Self {
        self.files.insert(size_secs, path);
        self
    }

    #[must_use]
    pub fn path_for(&self, size_secs: u32) -> Option<&Path> {
        self.files.get(&size_secs).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Path)> {
        self.files.iter().map(|(&size, path)| (size, path.as_path()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Default for WindowCatalog {
    fn default() -> Self {
        Self::rooted_at(Path::new(DEFAULT_DATA_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_lists_four_windows() {
        let catalog = WindowCatalog::default();
        let sizes: Vec<u32> = catalog.iter().map(|(s, _)| s).collect();
        assert_eq!(sizes, vec![3, 5, 10, 15]);
        assert_eq!(
            catalog.path_for(10),
            Some(Path::new("output/window_10_1754904064.csv"))
        );
        assert_eq!(catalog.path_for(7), None);
    }

    #[test]
    fn rooted_catalog_uses_data_dir() {
        let catalog = WindowCatalog::rooted_at(Path::new("/data/qoe"));
        assert_eq!(
            catalog.path_for(3),
            Some(Path::new("/data/qoe/window_3_1756030271.csv"))
        );
    }

    #[test]
    fn custom_entries() {
        let catalog = WindowCatalog::empty().with_window(30, PathBuf::from("w30.csv"));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.path_for(30), Some(Path::new("w30.csv")));
    }
}
