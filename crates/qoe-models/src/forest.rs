//! Random forest and extra-trees ensembles.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::classifier::{Classifier, ModelKind};
use crate::split::{SplitCriterion, SplitMethod};
use crate::tree::{DecisionTreeConfig, FittedTree};
use crate::validate::{argmax, check_prediction_data, check_training_data, to_columns};
use crate::ModelError;

/// Number of features examined at each split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaxFeatures {
    /// `ceil(sqrt(n_features))`.
    Sqrt,
    /// `ceil(log2(n_features))`, at least 1.
    Log2,
    /// `ceil(n_features * fraction)`.
    Fraction(f64),
    /// A fixed count.
    Fixed(usize),
    /// Every feature.
    All,
}

impl MaxFeatures {
    pub(crate) fn resolve(self, n_features: usize) -> Result<usize, ModelError> {
        let n = n_features as f64;
        let resolved = match self {
            MaxFeatures::Sqrt => n.sqrt().ceil() as usize,
            MaxFeatures::Log2 => n.log2().ceil().max(1.0) as usize,
            MaxFeatures::Fraction(f) => (n * f).ceil() as usize,
            MaxFeatures::Fixed(k) => k,
            MaxFeatures::All => n_features,
        };
        if resolved == 0 || resolved > n_features {
            return Err(ModelError::InvalidMaxFeatures {
                max_features: resolved,
                n_features,
            });
        }
        Ok(resolved)
    }
}

/// Configuration for a tree ensemble.
///
/// Construct via [`RandomForestConfig::new`] (or `default()` for 100 trees),
/// then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter           | Default   |
/// |---------------------|-----------|
/// | `max_features`      | `Sqrt`    |
/// | `max_depth`         | `None`    |
/// | `min_samples_split` | 2         |
/// | `min_samples_leaf`  | 1         |
/// | `criterion`         | `Gini`    |
/// | `split_method`      | `Best`    |
/// | `bootstrap`         | `true`    |
/// | `seed`              | 42        |
#[derive(Debug, Clone)]
pub struct RandomForestConfig {
    n_trees: usize,
    max_features: MaxFeatures,
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
    criterion: SplitCriterion,
    split_method: SplitMethod,
    bootstrap: bool,
    seed: u64,
}

impl RandomForestConfig {
    /// Create a config with `n_trees` trees.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidTreeCount`] if `n_trees` is zero.
    pub fn new(n_trees: usize) -> Result<Self, ModelError> {
        if n_trees == 0 {
            return Err(ModelError::InvalidTreeCount { n_trees });
        }
        Ok(Self {
            n_trees,
            ..Self::default()
        })
    }

    /// Set the per-split feature subsampling strategy.
    #[must_use]
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Limit each tree's depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the minimum node size eligible for splitting.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Set the minimum number of samples per leaf.
    #[must_use]
    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Set the impurity criterion.
    #[must_use]
    pub fn with_criterion(mut self, criterion: SplitCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Set the threshold search strategy.
    #[must_use]
    pub fn with_split_method(mut self, split_method: SplitMethod) -> Self {
        self.split_method = split_method;
        self
    }

    /// Draw a bootstrap sample per tree (`true`) or train every tree on all rows.
    #[must_use]
    pub fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// Set the master seed from which per-tree seeds are drawn.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Return the master seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn tree_config(&self, max_features: usize, seed: u64) -> DecisionTreeConfig {
        DecisionTreeConfig::new()
            .with_criterion(self.criterion)
            .with_split_method(self.split_method)
            .with_max_depth(self.max_depth)
            .with_min_samples_split(self.min_samples_split)
            .with_min_samples_leaf(self.min_samples_leaf)
            .with_max_features(Some(max_features))
            .with_seed(seed)
    }
}

impl Default for RandomForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_features: MaxFeatures::Sqrt,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            criterion: SplitCriterion::Gini,
            split_method: SplitMethod::Best,
            bootstrap: true,
            seed: 42,
        }
    }
}

/// A tree ensemble classifier: random forest or extra trees.
///
/// Predictions average the leaf class distributions of all trees.
#[derive(Debug, Clone)]
pub struct RandomForest {
    kind: ModelKind,
    config: RandomForestConfig,
    n_classes: usize,
    trees: Vec<FittedTree>,
    n_features: usize,
}

impl RandomForest {
    /// Create an untrained random forest.
    #[must_use]
    pub fn new(config: RandomForestConfig, n_classes: usize) -> Self {
        Self {
            kind: ModelKind::RandomForest,
            config,
            n_classes,
            trees: Vec::new(),
            n_features: 0,
        }
    }

    /// Create an untrained extra-trees ensemble.
    ///
    /// Overrides the config to use random thresholds without bootstrap.
    #[must_use]
    pub fn extra_trees(config: RandomForestConfig, n_classes: usize) -> Self {
        let config = config
            .with_split_method(SplitMethod::Random)
            .with_bootstrap(false);
        Self {
            kind: ModelKind::ExtraTrees,
            ..Self::new(config, n_classes)
        }
    }

    /// Return the number of fitted trees (0 before fitting).
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Averaged class distribution for each row, computed in parallel.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Classifier::predict`].
    pub fn predict_proba(&self, features: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted {
                model: self.type_name(),
            });
        }
        check_prediction_data(features, self.n_features)?;
        let n_trees = self.trees.len() as f64;
        Ok(features
            .par_iter()
            .map(|row| {
                let mut avg = vec![0.0; self.n_classes];
                for tree in &self.trees {
                    for (acc, p) in avg.iter_mut().zip(tree.proba(row)) {
                        *acc += p;
                    }
                }
                avg.iter_mut().for_each(|v| *v /= n_trees);
                avg
            })
            .collect())
    }
}

/// Draw `n` row indices with replacement.
fn bootstrap(n: usize, rng: &mut impl Rng) -> Vec<usize> {
    (0..n).map(|_| rng.gen_range(0..n)).collect()
}

impl Classifier for RandomForest {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn type_name(&self) -> &'static str {
        match self.kind {
            ModelKind::ExtraTrees => "ExtraTreesClassifier",
            _ => "RandomForestClassifier",
        }
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    #[instrument(skip_all, fields(kind = %self.kind, n_trees = self.config.n_trees, n_samples = features.len()))]
    fn fit(&mut self, features: &[Vec<f64>], labels: &[usize]) -> Result<(), ModelError> {
        let n_features = check_training_data(features, labels, self.n_classes)?;
        let max_features = self.config.max_features.resolve(n_features)?;
        let n_samples = features.len();

        let mut master = ChaCha8Rng::seed_from_u64(self.config.seed);
        let seeds: Vec<u64> = (0..self.config.n_trees).map(|_| master.r#gen()).collect();

        // Structural checks once, before fanning out.
        self.config.tree_config(max_features, 0).check()?;

        info!(n_samples, n_features, max_features, "training tree ensemble");

        let columns = to_columns(features, n_features);
        let all_rows: Vec<usize> = (0..n_samples).collect();
        let config = &self.config;
        let n_classes = self.n_classes;
        let trees: Vec<FittedTree> = seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let rows = if config.bootstrap {
                    bootstrap(n_samples, &mut rng)
                } else {
                    all_rows.clone()
                };
                config
                    .tree_config(max_features, rng.r#gen())
                    .grow(&columns, labels, &rows, n_classes, max_features)
            })
            .collect();

        debug!(
            n_trees = trees.len(),
            mean_nodes = trees.iter().map(FittedTree::n_nodes).sum::<usize>() / trees.len().max(1),
            "tree ensemble trained"
        );
        self.trees = trees;
        self.n_features = n_features;
        Ok(())
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<usize>, ModelError> {
        Ok(self
            .predict_proba(features)?
            .iter()
            .map(|p| argmax(p))
            .collect())
    }
}
