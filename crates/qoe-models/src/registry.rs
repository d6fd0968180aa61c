//! Typed model registry: `ModelKind` → builder of an untrained classifier.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::classifier::{Classifier, ModelKind};
use crate::forest::{RandomForest, RandomForestConfig};
use crate::tree::{DecisionTree, DecisionTreeConfig};
use crate::ModelError;

type Builder = Box<dyn Fn(usize, u64) -> Box<dyn Classifier> + Send + Sync>;

/// One named, untrained model produced by the registry.
#[derive(Debug)]
pub struct ModelEntry {
    pub kind: ModelKind,
    pub model: Box<dyn Classifier>,
}

/// Builders for every compiled model kind, ordered by [`ModelKind`].
pub struct ModelRegistry {
    n_classes: usize,
    seed: u64,
    builders: BTreeMap<ModelKind, Builder>,
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("n_classes", &self.n_classes)
            .field("seed", &self.seed)
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl ModelRegistry {
    /// Registry for `n_classes`-way classification with seed 42.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidClassCount`] if `n_classes < 2`.
    pub fn new(n_classes: usize) -> Result<Self, ModelError> {
        if n_classes < 2 {
            return Err(ModelError::InvalidClassCount { n_classes });
        }
        let mut builders: BTreeMap<ModelKind, Builder> = BTreeMap::new();
        builders.insert(
            ModelKind::DecisionTree,
            Box::new(|k: usize, seed: u64| -> Box<dyn Classifier> {
                Box::new(DecisionTree::new(DecisionTreeConfig::new().with_seed(seed), k))
            }),
        );
        builders.insert(
            ModelKind::RandomForest,
            Box::new(|k: usize, seed: u64| -> Box<dyn Classifier> {
                Box::new(RandomForest::new(
                    RandomForestConfig::default().with_seed(seed),
                    k,
                ))
            }),
        );
        builders.insert(
            ModelKind::ExtraTrees,
            Box::new(|k: usize, seed: u64| -> Box<dyn Classifier> {
                Box::new(RandomForest::extra_trees(
                    RandomForestConfig::default().with_seed(seed),
                    k,
                ))
            }),
        );
        #[cfg(feature = "boosting")]
        builders.insert(
            ModelKind::GradientBoosting,
            Box::new(|k: usize, _: u64| -> Box<dyn Classifier> {
                Box::new(crate::GradientBoosting::new(
                    crate::GradientBoostingConfig::default(),
                    k,
                ))
            }),
        );
        #[cfg(feature = "neighbors")]
        builders.insert(
            ModelKind::KNearest,
            Box::new(|k: usize, _: u64| -> Box<dyn Classifier> {
                Box::new(crate::KNearest::new(crate::KNearestConfig::default(), k))
            }),
        );

        Ok(Self {
            n_classes,
            seed: 42,
            builders,
        })
    }

    /// Seed handed to every randomized model.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Drop `kind` from the registry.
    #[must_use]
    pub fn without(mut self, kind: ModelKind) -> Self {
        self.builders.remove(&kind);
        self
    }

    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Registered kinds in registry order.
    #[must_use]
    pub fn kinds(&self) -> Vec<ModelKind> {
        self.builders.keys().copied().collect()
    }

    #[must_use]
    pub fn contains(&self, kind: ModelKind) -> bool {
        self.builders.contains_key(&kind)
    }

    /// Build a fresh untrained model of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ModelUnavailable`] if `kind` was not compiled in.
    pub fn build(&self, kind: ModelKind) -> Result<Box<dyn Classifier>, ModelError> {
        let builder = self
            .builders
            .get(&kind)
            .ok_or(ModelError::ModelUnavailable { kind })?;
        debug!(%kind, "building model");
        Ok(builder(self.n_classes, self.seed))
    }

    /// Build one untrained model per registered kind.
    #[must_use]
    pub fn build_all(&self) -> Vec<ModelEntry> {
        self.builders
            .iter()
            .map(|(&kind, builder)| ModelEntry {
                kind,
                model: builder(self.n_classes, self.seed),
            })
            .collect()
    }
}

/// Ordered untrained models for `n_classes`-way classification.
///
/// # Errors
///
/// Returns [`ModelError::InvalidClassCount`] if `n_classes < 2`.
pub fn make_models(n_classes: usize) -> Result<Vec<ModelEntry>, ModelError> {
    Ok(ModelRegistry::new(n_classes)?.build_all())
}
