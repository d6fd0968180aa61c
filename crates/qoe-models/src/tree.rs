//! CART decision tree classifier.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::classifier::{Classifier, ModelKind};
use crate::node::{NodeArena, NodeIndex};
use crate::split::{SplitCriterion, SplitMethod, SplitSearch};
use crate::validate::{argmax, check_prediction_data, check_training_data, to_columns};
use crate::ModelError;

/// Configuration for a single decision tree.
///
/// # Defaults
///
/// | Parameter           | Default               |
/// |---------------------|-----------------------|
/// | `criterion`         | `Gini`                |
/// | `split_method`      | `Best`                |
/// | `max_depth`         | `None` (unlimited)    |
/// | `min_samples_split` | 2                     |
/// | `min_samples_leaf`  | 1                     |
/// | `max_features`      | `None` (all features) |
/// | `seed`              | 42                    |
#[derive(Debug, Clone)]
pub struct DecisionTreeConfig {
    pub(crate) criterion: SplitCriterion,
    pub(crate) split_method: SplitMethod,
    pub(crate) max_depth: Option<usize>,
    pub(crate) min_samples_split: usize,
    pub(crate) min_samples_leaf: usize,
    pub(crate) max_features: Option<usize>,
    pub(crate) seed: u64,
}

impl DecisionTreeConfig {
    /// Create a config with the default values above.
    #[must_use]
    pub fn new() -> Self {
        Self {
            criterion: SplitCriterion::Gini,
            split_method: SplitMethod::Best,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
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

    /// Limit tree depth (root is depth 0). `None` grows until leaves are pure.
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

    /// Set the minimum number of samples in each child.
    #[must_use]
    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Number of features examined per split. `None` means all of them.
    #[must_use]
    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    /// Set the seed used for feature subsampling and random thresholds.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the structural parameters that do not depend on the data.
    pub(crate) fn check(&self) -> Result<(), ModelError> {
        if self.max_depth == Some(0) {
            return Err(ModelError::InvalidMaxDepth { max_depth: 0 });
        }
        if self.min_samples_split < 2 {
            return Err(ModelError::InvalidMinSamplesSplit {
                min_samples_split: self.min_samples_split,
            });
        }
        if self.min_samples_leaf == 0 {
            return Err(ModelError::InvalidMinSamplesLeaf { min_samples_leaf: 0 });
        }
        Ok(())
    }

    /// Grow a tree over `samples` (indices into `columns`, repeats allowed).
    ///
    /// Inputs must already be validated; this cannot fail.
    pub(crate) fn grow(
        &self,
        columns: &[Vec<f64>],
        labels: &[usize],
        samples: &[usize],
        n_classes: usize,
        max_features: usize,
    ) -> FittedTree {
        let mut grower = Grower {
            config: self,
            columns,
            labels,
            search: SplitSearch {
                criterion: self.criterion,
                method: self.split_method,
                max_features,
                min_samples_leaf: self.min_samples_leaf,
                n_classes,
            },
            rng: ChaCha8Rng::seed_from_u64(self.seed),
            arena: NodeArena::new(),
        };
        grower.grow(samples, 0);
        FittedTree {
            arena: grower.arena,
            n_features: columns.len(),
        }
    }
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

struct Grower<'a> {
    config: &'a DecisionTreeConfig,
    columns: &'a [Vec<f64>],
    labels: &'a [usize],
    search: SplitSearch,
    rng: ChaCha8Rng,
    arena: NodeArena<Vec<f64>>,
}

impl Grower<'_> {
    fn grow(&mut self, samples: &[usize], depth: usize) -> NodeIndex {
        let n_classes = self.search.n_classes;
        let mut counts = vec![0usize; n_classes];
        for &s in samples {
            counts[self.labels[s]] += 1;
        }
        let total = samples.len() as f64;
        let distribution: Vec<f64> = counts.iter().map(|&c| c as f64 / total).collect();

        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let too_small = samples.len() < self.config.min_samples_split;
        let too_deep = self.config.max_depth.is_some_and(|max| depth >= max);
        if pure || too_small || too_deep {
            return self.arena.push_leaf(distribution);
        }

        let Some(split) = self.search.find(self.columns, self.labels, samples, &mut self.rng)
        else {
            return self.arena.push_leaf(distribution);
        };

        let at = self.arena.reserve(Vec::new());
        let left = self.grow(&split.left, depth + 1);
        let right = self.grow(&split.right, depth + 1);
        self.arena.set_split(at, split.feature, split.threshold, left, right);
        at
    }
}

/// A grown tree: leaves hold normalized class distributions.
#[derive(Debug, Clone)]
pub(crate) struct FittedTree {
    arena: NodeArena<Vec<f64>>,
    n_features: usize,
}

impl FittedTree {
    pub(crate) fn proba(&self, row: &[f64]) -> &[f64] {
        self.arena.leaf_for(row)
    }

    pub(crate) fn n_nodes(&self) -> usize {
        self.arena.len()
    }

    pub(crate) fn depth(&self) -> usize {
        self.arena.depth()
    }
}

/// A single CART classifier.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    config: DecisionTreeConfig,
    n_classes: usize,
    fitted: Option<FittedTree>,
}

impl DecisionTree {
    /// Create an untrained tree for `n_classes` classes.
    #[must_use]
    pub fn new(config: DecisionTreeConfig, n_classes: usize) -> Self {
        Self {
            config,
            n_classes,
            fitted: None,
        }
    }

    /// Number of nodes in the fitted tree (0 before fitting).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.fitted.as_ref().map_or(0, FittedTree::n_nodes)
    }

    /// Depth of the fitted tree (0 before fitting).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.fitted.as_ref().map_or(0, FittedTree::depth)
    }

    /// Class probability distribution for each row.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Classifier::predict`].
    pub fn predict_proba(&self, features: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ModelError> {
        let tree = self.fitted.as_ref().ok_or(ModelError::NotFitted {
            model: self.type_name(),
        })?;
        check_prediction_data(features, tree.n_features)?;
        Ok(features.iter().map(|row| tree.proba(row).to_vec()).collect())
    }
}

impl Classifier for DecisionTree {
    fn kind(&self) -> ModelKind {
        ModelKind::DecisionTree
    }

    fn type_name(&self) -> &'static str {
        "DecisionTreeClassifier"
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    #[instrument(skip_all, fields(n_samples = features.len()))]
    fn fit(&mut self, features: &[Vec<f64>], labels: &[usize]) -> Result<(), ModelError> {
        self.config.check()?;
        let n_features = check_training_data(features, labels, self.n_classes)?;
        let max_features = self.config.max_features.unwrap_or(n_features);
        if max_features == 0 || max_features > n_features {
            return Err(ModelError::InvalidMaxFeatures {
                max_features,
                n_features,
            });
        }

        let columns = to_columns(features, n_features);
        let samples: Vec<usize> = (0..features.len()).collect();
        let tree = self
            .config
            .grow(&columns, labels, &samples, self.n_classes, max_features);
        debug!(n_nodes = tree.n_nodes(), depth = tree.depth(), "decision tree grown");
        self.fitted = Some(tree);
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
