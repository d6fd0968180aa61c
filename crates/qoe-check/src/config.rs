use std::path::{Path, PathBuf};

use qoe_io::{WindowCatalog, DEFAULT_DATA_DIR};

use crate::environment::{default_requirements, Requirement};

/// Window whose file the structure check inspects by default.
const STRUCTURE_WINDOW_SECS: u32 = 10;

/// Inputs for [`crate::run_all_validations`].
///
/// # Defaults
///
/// | Parameter        | Default                                 |
/// |------------------|-----------------------------------------|
/// | `data_dir`       | `output`                                |
/// | `structure_file` | the 10 s window file under `data_dir`   |
/// | `n_classes`      | 3                                       |
/// | `seed`           | 42                                      |
/// | `requirements`   | [`default_requirements`]                |
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    data_dir: PathBuf,
    structure_file: Option<PathBuf>,
    n_classes: usize,
    seed: u64,
    requirements: Vec<Requirement>,
}

impl ValidationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    #[must_use]
    pub fn with_structure_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.structure_file = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_n_classes(mut self, n_classes: usize) -> Self {
        self.n_classes = n_classes;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_requirements(mut self, requirements: Vec<Requirement>) -> Self {
        self.requirements = requirements;
        self
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[must_use]
    pub fn catalog(&self) -> WindowCatalog {
        WindowCatalog::rooted_at(&self.data_dir)
    }

    /// The explicit structure file, else the 10 s window file.
    #[must_use]
    pub fn structure_file(&self) -> PathBuf {
        self.structure_file.clone().unwrap_or_else(|| {
            let catalog = self.catalog();
            catalog
                .path_for(STRUCTURE_WINDOW_SECS)
                .map_or_else(|| self.data_dir.clone(), Path::to_path_buf)
        })
    }

    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            structure_file: None,
            n_classes: 3,
            seed: 42,
            requirements: default_requirements(),
        }
    }
}
