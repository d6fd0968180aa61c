//! Multiclass gradient boosting with softmax loss.
//!
//! Each round fits one shallow regression tree per class to the softmax
//! residuals and applies a one-step Newton leaf value, scaled by the
//! learning rate.

use tracing::{debug, instrument};

use crate::classifier::{Classifier, ModelKind};
use crate::node::{NodeArena, NodeIndex};
use crate::validate::{argmax, check_prediction_data, check_training_data, to_columns};
use crate::ModelError;

/// Configuration for gradient boosting.
///
/// # Defaults
///
/// | Parameter          | Default |
/// |--------------------|---------|
/// | `n_rounds`         | 100     |
/// | `learning_rate`    | 0.1     |
/// | `max_depth`        | 3       |
/// | `min_samples_leaf` | 1       |
#[derive(Debug, Clone)]
pub struct GradientBoostingConfig {
    n_rounds: usize,
    learning_rate: f64,
    max_depth: usize,
    min_samples_leaf: usize,
}

impl GradientBoostingConfig {
    /// Create a config with `n_rounds` boosting rounds.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidRoundCount`] if `n_rounds` is zero.
    pub fn new(n_rounds: usize) -> Result<Self, ModelError> {
        if n_rounds == 0 {
            return Err(ModelError::InvalidRoundCount { n_rounds });
        }
        Ok(Self {
            n_rounds,
            ..Self::default()
        })
    }

    /// Set the shrinkage applied to every tree.
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the depth of each regression tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the minimum number of samples per leaf.
    #[must_use]
    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }

    fn check(&self) -> Result<(), ModelError> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(ModelError::InvalidLearningRate {
                learning_rate: self.learning_rate,
            });
        }
        if self.max_depth == 0 {
            return Err(ModelError::InvalidMaxDepth { max_depth: 0 });
        }
        if self.min_samples_leaf == 0 {
            return Err(ModelError::InvalidMinSamplesLeaf { min_samples_leaf: 0 });
        }
        Ok(())
    }
}

impl Default for GradientBoostingConfig {
    fn default() -> Self {
        Self {
            n_rounds: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_leaf: 1,
        }
    }
}

/// Regression tree fitted to residuals; leaves hold raw score increments.
#[derive(Debug, Clone)]
struct ScoreTree {
    arena: NodeArena<f64>,
}

struct ScoreTreeBuilder<'a> {
    columns: &'a [Vec<f64>],
    residuals: &'a [f64],
    max_depth: usize,
    min_samples_leaf: usize,
    /// `(K - 1) / K` factor of the multiclass Newton step.
    newton_scale: f64,
    arena: NodeArena<f64>,
}

impl ScoreTreeBuilder<'_> {
    fn build(&mut self, samples: &[usize], depth: usize) -> NodeIndex {
        if depth < self.max_depth
            && let Some((feature, threshold)) = self.best_split(samples)
        {
            let (left, right): (Vec<usize>, Vec<usize>) = samples
                .iter()
                .copied()
                .partition(|&s| self.columns[feature][s] <= threshold);
            let at = self.arena.reserve(0.0);
            let l = self.build(&left, depth + 1);
            let r = self.build(&right, depth + 1);
            self.arena.set_split(at, feature, threshold, l, r);
            return at;
        }
        let value = self.leaf_value(samples);
        self.arena.push_leaf(value)
    }

    fn leaf_value(&self, samples: &[usize]) -> f64 {
        let (num, den) = samples.iter().fold((0.0, 0.0), |(num, den), &s| {
            let r = self.residuals[s];
            (num + r, den + r.abs() * (1.0 - r.abs()))
        });
        if den < 1e-12 {
            0.0
        } else {
            self.newton_scale * num / den
        }
    }

    /// Exact variance-reduction split over all features.
    fn best_split(&self, samples: &[usize]) -> Option<(usize, f64)> {
        let n = samples.len();
        if n < 2 * self.min_samples_leaf {
            return None;
        }
        let total: f64 = samples.iter().map(|&s| self.residuals[s]).sum();
        let base = total * total / n as f64;

        let mut best: Option<(f64, usize, f64)> = None;
        for (feature, column) in self.columns.iter().enumerate() {
            let mut sorted: Vec<(f64, f64)> = samples
                .iter()
                .map(|&s| (column[s], self.residuals[s]))
                .collect();
            sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            for i in 0..n - 1 {
                left_sum += sorted[i].1;
                let n_left = i + 1;
                let n_right = n - n_left;
                if sorted[i].0 == sorted[i + 1].0
                    || n_left < self.min_samples_leaf
                    || n_right < self.min_samples_leaf
                {
                    continue;
                }
                let right_sum = total - left_sum;
                let gain = left_sum * left_sum / n_left as f64
                    + right_sum * right_sum / n_right as f64
                    - base;
                if gain > 1e-12 && best.is_none_or(|(g, _, _)| gain > g) {
                    best = Some((gain, feature, (sorted[i].0 + sorted[i + 1].0) / 2.0));
                }
            }
        }
        best.map(|(_, feature, threshold)| (feature, threshold))
    }
}

/// Softmax gradient boosting classifier.
#[derive(Debug, Clone)]
pub struct GradientBoosting {
    config: GradientBoostingConfig,
    n_classes: usize,
    n_features: usize,
    /// Initial log-prior score per class.
    prior: Vec<f64>,
    /// `rounds[round][class]`.
    rounds: Vec<Vec<ScoreTree>>,
}

impl GradientBoosting {
    /// Create an untrained model.
    #[must_use]
    pub fn new(config: GradientBoostingConfig, n_classes: usize) -> Self {
        Self {
            config,
            n_classes,
            n_features: 0,
            prior: Vec::new(),
            rounds: Vec::new(),
        }
    }

    fn raw_scores(&self, row: &[f64]) -> Vec<f64> {
        let mut scores = self.prior.clone();
        for trees in &self.rounds {
            for (score, tree) in scores.iter_mut().zip(trees) {
                *score += self.config.learning_rate * tree.arena.leaf_for(row);
            }
        }
        scores
    }

    /// Softmax class probabilities for each row.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Classifier::predict`].
    pub fn predict_proba(&self, features: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ModelError> {
        if !self.is_fitted() {
            return Err(ModelError::NotFitted {
                model: self.type_name(),
            });
        }
        check_prediction_data(features, self.n_features)?;
        Ok(features.iter().map(|row| softmax(&self.raw_scores(row))).collect())
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exp.iter().sum();
    exp.into_iter().map(|e| e / sum).collect()
}

impl Classifier for GradientBoosting {
    fn kind(&self) -> ModelKind {
        ModelKind::GradientBoosting
    }

    fn type_name(&self) -> &'static str {
        "GradientBoostingClassifier"
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn is_fitted(&self) -> bool {
        !self.prior.is_empty()
    }

    #[instrument(skip_all, fields(n_rounds = self.config.n_rounds, n_samples = features.len()))]
    fn fit(&mut self, features: &[Vec<f64>], labels: &[usize]) -> Result<(), ModelError> {
        self.config.check()?;
        let n_features = check_training_data(features, labels, self.n_classes)?;
        let n = features.len();
        let k = self.n_classes;
        let columns = to_columns(features, n_features);

        // Smoothed log priors keep absent classes finite.
        let mut counts = vec![0usize; k];
        for &label in labels {
            counts[label] += 1;
        }
        let prior: Vec<f64> = counts
            .iter()
            .map(|&c| ((c as f64 + 1.0) / (n + k) as f64).ln())
            .collect();

        let mut scores: Vec<Vec<f64>> = vec![prior.clone(); n];
        let samples: Vec<usize> = (0..n).collect();
        let mut rounds = Vec::with_capacity(self.config.n_rounds);

        for _ in 0..self.config.n_rounds {
            let probs: Vec<Vec<f64>> = scores.iter().map(|s| softmax(s)).collect();
            let mut trees = Vec::with_capacity(k);
            for class in 0..k {
                let residuals: Vec<f64> = (0..n)
                    .map(|i| f64::from(u8::from(labels[i] == class)) - probs[i][class])
                    .collect();
                let mut builder = ScoreTreeBuilder {
                    columns: &columns,
                    residuals: &residuals,
                    max_depth: self.config.max_depth,
                    min_samples_leaf: self.config.min_samples_leaf,
                    newton_scale: (k - 1) as f64 / k as f64,
                    arena: NodeArena::new(),
                };
                builder.build(&samples, 0);
                let tree = ScoreTree {
                    arena: builder.arena,
                };
                for (i, row) in features.iter().enumerate() {
                    scores[i][class] += self.config.learning_rate * tree.arena.leaf_for(row);
                }
                trees.push(tree);
            }
            rounds.push(trees);
        }

        debug!(n_rounds = rounds.len(), "gradient boosting trained");
        self.prior = prior;
        self.rounds = rounds;
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
